//! The `connection` module defines one live subscriber as the hub sees it.

pub mod handle;
pub use handle::{Connection, ConnectionId};

#[cfg(test)]
mod tests;
