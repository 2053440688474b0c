//! Error types shared across the hub.
//!
//! Upgrade rejections are the only errors a client ever sees; they become
//! the HTTP response of a failed handshake. Everything else is either logged
//! and absorbed locally or, for startup failures, returned from the binary.

use thiserror::Error;
use tungstenite::handshake::server::ErrorResponse;
use tungstenite::http::StatusCode;

/// Failure to turn a bearer token into a subscriber identity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// Reasons an upgrade request is refused before any hub interaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpgradeRejection {
    #[error("no such endpoint: {0}")]
    UnknownRoute(String),
    #[error("malformed post id: {0:?}")]
    MalformedPostId(String),
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),
}

impl UpgradeRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            UpgradeRejection::UnknownRoute(_) => StatusCode::NOT_FOUND,
            UpgradeRejection::MalformedPostId(_) => StatusCode::BAD_REQUEST,
            UpgradeRejection::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Handshake response sent back instead of `101 Switching Protocols`.
    pub fn into_response(self) -> ErrorResponse {
        let status = self.status();
        let mut response = ErrorResponse::new(Some(self.to_string()));
        *response.status_mut() = status;
        response
    }
}

/// Failure to mint a token.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("token lifetime out of range")]
    LifetimeOutOfRange,
    #[error(transparent)]
    Encode(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HubError {
    #[error("broadcast hub is no longer running")]
    Closed,
}

/// Fatal errors surfaced by the binary's top-level commands.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to issue token: {0}")]
    Token(#[from] IssueError),
    #[error("post id must be positive, got {0}")]
    InvalidPostId(u64),
    #[error("websocket client error: {0}")]
    Client(#[from] tungstenite::Error),
    #[error("malformed event frame: {0}")]
    Frame(#[from] serde_json::Error),
}
