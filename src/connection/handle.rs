//! Connection representation
//!
//! `Connection` models one accepted WebSocket subscriber: a unique id, the
//! topic it is bound to for its whole life, the authenticated caller, and the
//! sending side of its outbox. The ingress handler that accepted the socket
//! owns the receiving side and the socket itself; the registry only keeps a
//! clone of this value while the connection is subscribed.

use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::hub::topic::Topic;

pub type ConnectionId = Uuid;

#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    topic: Topic,
    subscriber: String,
    outbox: UnboundedSender<WsMessage>,
}

impl Connection {
    /// Create a connection bound to `topic` that writes into `outbox`.
    pub fn new(
        topic: Topic,
        subscriber: impl Into<String>,
        outbox: UnboundedSender<WsMessage>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic,
            subscriber: subscriber.into(),
            outbox,
        }
    }

    /// Create a connection together with the receiving end of its outbox.
    pub fn channel(
        topic: Topic,
        subscriber: impl Into<String>,
    ) -> (Self, UnboundedReceiver<WsMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(topic, subscriber, tx), rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn subscriber(&self) -> &str {
        &self.subscriber
    }

    /// Queue a frame for the connection's writer. Fails once the writer has
    /// gone away.
    pub fn deliver(&self, frame: WsMessage) -> Result<(), SendError<WsMessage>> {
        self.outbox.send(frame)
    }

    pub fn is_closed(&self) -> bool {
        self.outbox.is_closed()
    }
}
