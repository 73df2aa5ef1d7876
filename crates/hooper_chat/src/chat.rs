//! The durable, persisted form of a conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    id::{ChatId, UserId},
    message::Message,
    state::ChatState,
};

/// A persisted transcript, owned by exactly one user.
///
/// `user_id` and `created_at` are set at first persistence and never change.
/// `share_path`, once set, makes the transcript readable by anyone holding
/// the path, but still only mutable by the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub title: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_path: Option<String>,
}

impl Chat {
    /// The anonymous-read path a shared transcript is published under.
    #[must_use]
    pub fn share_path_for(id: ChatId) -> String {
        format!("/share/{id}")
    }

    /// Rebuild the in-progress state from this transcript, e.g. when a
    /// session is reloaded from storage.
    #[must_use]
    pub fn into_state(self) -> ChatState {
        ChatState::with_messages(self.id, self.messages)
    }
}
