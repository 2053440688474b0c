//! Event definitions for the hub
//!
//! An `Event` is what publishers hand to the hub and what subscribers receive
//! on the wire:
//!
//! ```json
//! { "topic": "post:42", "data": { "type": "created", "comment_id": 7 } }
//! ```
//!
//! `data` is opaque to the hub and passed through verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tungstenite::protocol::Message as WsMessage;

use crate::hub::topic::Topic;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    topic: Topic,
    data: Value,
}

impl Event {
    pub fn new(topic: Topic, data: Value) -> Self {
        Self { topic, data }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Serialize into the text frame written to every subscriber.
    pub fn to_frame(&self) -> Result<WsMessage, serde_json::Error> {
        serde_json::to_string(self).map(WsMessage::text)
    }
}
