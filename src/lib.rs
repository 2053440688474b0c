//! # comment-hub
//!
//! `comment-hub` pushes comment changes to clients in real time. Each client
//! opens a WebSocket for one post and receives every comment event published
//! for that post while it stays connected. Delivery is best-effort and
//! in-memory only; nothing is replayed.
//!
//! ## Core Modules
//!
//! - `hub`: the single-writer broadcast hub and its topic registry.
//! - `connection`: one live subscriber as the hub sees it.
//! - `transport`: the WebSocket upgrade endpoint and per-connection supervision.
//! - `auth`: token verification for upgrades.
//! - `publisher`: comment-change events submitted after a mutation commits.
//! - `config`: layered configuration loading.
//! - `utils`: error types and logging setup.

pub mod auth;
pub mod config;
pub mod connection;
pub mod hub;
pub mod publisher;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;
