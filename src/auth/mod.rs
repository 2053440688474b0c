//! Token verification for the upgrade endpoint.
//!
//! The ingress handler only needs "token in, caller identity out". That seam
//! is the `TokenVerifier` trait; `JwtVerifier` is the HS256 implementation
//! the server runs with.

pub mod jwt;

pub use jwt::{Claims, JwtVerifier, lifetime_hours};

use crate::utils::error::AuthError;

/// The authenticated caller behind a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub id: String,
}

pub trait TokenVerifier: Send + Sync + 'static {
    fn verify(&self, token: &str) -> Result<Subscriber, AuthError>;
}
