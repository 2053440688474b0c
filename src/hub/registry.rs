//! Topic registry
//!
//! Maps each topic to the connections currently subscribed to it, keyed by
//! connection id so duplicate registration is a no-op. The registry is a
//! plain data structure with no synchronization of its own; only the hub's
//! control loop touches it.
//!
//! Empty topic entries are pruned as soon as their last subscriber leaves,
//! so the map never outgrows the set of topics with live subscribers.

use std::collections::HashMap;

use crate::connection::{Connection, ConnectionId};
use crate::hub::topic::Topic;

#[derive(Debug, Default)]
pub struct TopicRegistry {
    topics: HashMap<Topic, HashMap<ConnectionId, Connection>>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `connection` under its bound topic. Returns `false` if it was
    /// already registered.
    pub fn insert(&mut self, connection: Connection) -> bool {
        self.topics
            .entry(connection.topic().clone())
            .or_default()
            .insert(connection.id(), connection)
            .is_none()
    }

    /// Remove a connection from `topic`. Returns `false` if it was not there.
    pub fn remove(&mut self, topic: &Topic, id: &ConnectionId) -> bool {
        let Some(subscribers) = self.topics.get_mut(topic) else {
            return false;
        };
        let removed = subscribers.remove(id).is_some();
        if subscribers.is_empty() {
            self.topics.remove(topic);
        }
        removed
    }

    /// Current subscribers of `topic`; empty when nobody is listening.
    pub fn subscribers(&self, topic: &Topic) -> impl Iterator<Item = &Connection> {
        self.topics.get(topic).into_iter().flat_map(|s| s.values())
    }

    pub fn contains(&self, topic: &Topic, id: &ConnectionId) -> bool {
        self.topics
            .get(topic)
            .is_some_and(|subscribers| subscribers.contains_key(id))
    }

    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.topics.get(topic).map_or(0, HashMap::len)
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}
