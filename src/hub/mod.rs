//! The hub owns the topic registry and performs all comment-event fan-out.
//!
//! - `engine`: the serialized control loop (`Hub`) and its submission handle.
//! - `registry`: topic → subscribed connections.
//! - `event`: the value broadcast to subscribers.
//! - `topic`: topic and post identifiers.

pub mod engine;
pub mod event;
pub mod registry;
pub mod topic;

pub use engine::{Hub, HubHandle};
pub use event::Event;
pub use registry::TopicRegistry;
pub use topic::{PostId, Topic};
