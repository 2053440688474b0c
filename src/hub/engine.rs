//! Broadcast hub engine
//!
//! The hub is a single-writer actor. Every operation (register, unregister,
//! broadcast, and the subscriber-count query) travels as a `Command` over one
//! bounded channel and is applied by `Hub::run`, one at a time, in arrival
//! order. The `TopicRegistry` is owned by that loop and nothing else, so
//! there are no locks and a broadcast always sees a fully applied set.
//!
//! Concurrency and usage notes:
//! - `HubHandle` is cheap to clone and is what ingress handlers and
//!   publishers hold. When the command queue is full, callers wait.
//! - The loop exits once every handle has been dropped.
//! - Delivery writes into each connection's outbox. A closed outbox means the
//!   connection's writer is gone; the connection is dropped from the registry
//!   and the rest of the broadcast continues.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::connection::{Connection, ConnectionId};
use crate::hub::event::Event;
use crate::hub::registry::TopicRegistry;
use crate::hub::topic::Topic;
use crate::utils::error::HubError;

#[derive(Debug)]
pub(crate) enum Command {
    Register(Connection),
    Unregister { topic: Topic, id: ConnectionId },
    Broadcast(Event),
    SubscriberCount {
        topic: Topic,
        reply: oneshot::Sender<usize>,
    },
}

#[derive(Debug)]
pub struct Hub {
    pub(crate) registry: TopicRegistry,
    commands: mpsc::Receiver<Command>,
}

/// Submission side of the hub. All methods enqueue a command and return once
/// it is accepted; they never wait for fan-out to finish.
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: mpsc::Sender<Command>,
}

impl Hub {
    /// Create a hub whose command queue holds at most `buffer` commands.
    pub fn new(buffer: usize) -> (Hub, HubHandle) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let hub = Hub {
            registry: TopicRegistry::new(),
            commands: rx,
        };
        (hub, HubHandle { commands: tx })
    }

    /// Create a hub and run its control loop on the current runtime.
    pub fn spawn(buffer: usize) -> HubHandle {
        let (hub, handle) = Hub::new(buffer);
        tokio::spawn(hub.run());
        handle
    }

    pub async fn run(mut self) {
        info!("broadcast hub running");
        while let Some(command) = self.commands.recv().await {
            self.apply(command);
        }
        info!(
            topics = self.registry.topic_count(),
            "broadcast hub stopped"
        );
    }

    pub(crate) fn apply(&mut self, command: Command) {
        match command {
            Command::Register(connection) => {
                let id = connection.id();
                let topic = connection.topic().clone();
                if self.registry.insert(connection) {
                    debug!(connection_id = %id, %topic, "registered");
                }
            }
            Command::Unregister { topic, id } => {
                if self.registry.remove(&topic, &id) {
                    debug!(connection_id = %id, %topic, "unregistered");
                }
            }
            Command::Broadcast(event) => self.broadcast(&event),
            Command::SubscriberCount { topic, reply } => {
                let _ = reply.send(self.registry.subscriber_count(&topic));
            }
        }
    }

    fn broadcast(&mut self, event: &Event) {
        let topic = event.topic();
        if self.registry.subscriber_count(topic) == 0 {
            return;
        }

        let frame = match event.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!(%topic, error = %e, "failed to serialize event");
                return;
            }
        };

        let mut delivered = 0usize;
        let mut dead = Vec::new();
        for connection in self.registry.subscribers(topic) {
            match connection.deliver(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    warn!(connection_id = %connection.id(), %topic, "delivery failed");
                    dead.push(connection.id());
                }
            }
        }

        // the ingress handler still unregisters these; that becomes a no-op
        for id in dead {
            self.registry.remove(topic, &id);
        }

        debug!(%topic, delivered, "broadcast");
    }
}

impl HubHandle {
    pub async fn register(&self, connection: Connection) {
        self.submit(Command::Register(connection)).await;
    }

    pub async fn unregister(&self, connection: &Connection) {
        self.submit(Command::Unregister {
            topic: connection.topic().clone(),
            id: connection.id(),
        })
        .await;
    }

    /// Fan `event` out to every current subscriber of its topic.
    ///
    /// Publishers call this only after the change it describes has committed.
    pub async fn broadcast(&self, event: Event) {
        self.submit(Command::Broadcast(event)).await;
    }

    /// Number of connections subscribed to `topic`, as seen by the hub after
    /// every previously submitted command has been applied.
    pub async fn subscriber_count(&self, topic: &Topic) -> Result<usize, HubError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::SubscriberCount {
                topic: topic.clone(),
                reply,
            })
            .await
            .map_err(|_| HubError::Closed)?;
        response.await.map_err(|_| HubError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn submit(&self, command: Command) {
        if self.commands.send(command).await.is_err() {
            // only happens during shutdown; nothing left to keep consistent
            debug!("broadcast hub stopped, command dropped");
        }
    }
}
