//! The `transport` module is the ingress side of the hub: it accepts
//! WebSocket upgrades, admits or rejects them, and supervises each admitted
//! connection until the peer goes away.

pub mod upgrade;
pub mod websocket;

#[cfg(test)]
mod tests;

pub use upgrade::{Admission, admit, comments_path, comments_url};
pub use websocket::{serve, start_websocket_server};
