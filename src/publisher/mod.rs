//! Publisher side of the comment stream.
//!
//! Comment and like mutations live elsewhere; once one of them commits it
//! reports the change here and `CommentPublisher` turns it into a broadcast
//! on the post's topic. Never publish before the mutation is durable:
//! subscribers would see a change that may still roll back.

use serde::{Deserialize, Serialize};

use crate::hub::{Event, HubHandle, PostId, Topic};

/// A committed change to a post's comments, sent as the event `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommentChange {
    Created {
        comment_id: u64,
        author_id: String,
        body: String,
        created_at: i64,
    },
    Updated {
        comment_id: u64,
        body: String,
    },
    Deleted {
        comment_id: u64,
    },
    Liked {
        comment_id: u64,
        user_id: String,
        likes: u64,
    },
    Unliked {
        comment_id: u64,
        user_id: String,
        likes: u64,
    },
}

impl CommentChange {
    pub fn comment_id(&self) -> u64 {
        match self {
            CommentChange::Created { comment_id, .. }
            | CommentChange::Updated { comment_id, .. }
            | CommentChange::Deleted { comment_id }
            | CommentChange::Liked { comment_id, .. }
            | CommentChange::Unliked { comment_id, .. } => *comment_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentPublisher {
    hub: HubHandle,
}

impl CommentPublisher {
    pub fn new(hub: HubHandle) -> Self {
        Self { hub }
    }

    /// Fire-and-forget broadcast of `change` to everyone watching `post`.
    pub async fn publish(
        &self,
        post: PostId,
        change: &CommentChange,
    ) -> Result<(), serde_json::Error> {
        let data = serde_json::to_value(change)?;
        self.hub
            .broadcast(Event::new(Topic::for_post(post), data))
            .await;
        Ok(())
    }
}
