use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::{Subscriber, TokenVerifier};
use crate::utils::error::{AuthError, IssueError};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// HS256 tokens signed with a shared secret.
pub struct JwtVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

/// Token lifetime of `hours`, rejecting values chrono cannot represent.
pub fn lifetime_hours(hours: i64) -> Result<Duration, IssueError> {
    Duration::try_hours(hours).ok_or(IssueError::LifetimeOutOfRange)
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Mint a token for `sub` that expires after `ttl`.
    pub fn issue(&self, sub: &str, ttl: Duration) -> Result<String, IssueError> {
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or(IssueError::LifetimeOutOfRange)?;
        let exp = usize::try_from(expires_at.timestamp())
            .map_err(|_| IssueError::LifetimeOutOfRange)?;
        let claims = Claims {
            sub: sub.to_string(),
            exp,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Subscriber, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(Subscriber {
            id: data.claims.sub,
        })
    }
}
