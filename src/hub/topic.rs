//! Topic naming
//!
//! A `Topic` scopes one subscription group. Comment streams use one topic
//! per post, named `post:<id>`. Topics are never created or destroyed
//! explicitly; they exist while the registry holds subscribers for them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::error::UpgradeRejection;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The topic carrying comment events for `post`.
    pub fn for_post(post: PostId) -> Self {
        Self(format!("post:{post}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a post, as carried in the upgrade path.
///
/// Only positive decimal integers are accepted; anything else is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(u64);

impl PostId {
    pub fn new(id: u64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = UpgradeRejection;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        // u64::from_str accepts a leading '+', which is not a valid id here
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UpgradeRejection::MalformedPostId(raw.to_string()));
        }
        raw.parse::<u64>()
            .ok()
            .and_then(PostId::new)
            .ok_or_else(|| UpgradeRejection::MalformedPostId(raw.to_string()))
    }
}
