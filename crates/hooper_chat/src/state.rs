//! The in-progress, append-only representation of one chat session.

use serde_json::Value;

use crate::{
    id::ChatId,
    message::{Message, ToolCallRequest, ToolCallResult},
};

/// Transcript titles are derived from the first user message, truncated to
/// this many characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// The mutable state of one conversation.
///
/// Messages are append-only: a message is never edited or reordered once
/// pushed. The state is threaded through the turn orchestrator as an
/// input/output pair; there is no shared ambient copy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatState {
    id: ChatId,
    messages: Vec<Message>,
}

impl ChatState {
    /// Start an empty conversation with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the state of a previously persisted conversation.
    #[must_use]
    pub fn with_messages(id: ChatId, messages: Vec<Message>) -> Self {
        Self { id, messages }
    }

    #[must_use]
    pub const fn id(&self) -> ChatId {
        self.id
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append the user's submitted text as a new message.
    pub fn push_user(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::user(content))
    }

    /// Append the assistant's completed text reply.
    pub fn push_assistant(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::assistant(content))
    }

    /// Append a tool invocation and its result as an adjacent pair.
    ///
    /// The result message reuses the request's id and name, so the pair is
    /// adjacent and id-matched by construction.
    pub fn push_tool_exchange(&mut self, request: ToolCallRequest, result: Result<Value, String>) {
        let response = ToolCallResult {
            id: request.id,
            name: request.name,
            result,
        };

        self.push(Message::tool_call(request));
        self.push(Message::tool_result(response));
    }

    /// Derive the transcript title: the first user message's content,
    /// truncated to [`TITLE_MAX_CHARS`] characters.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.messages
            .iter()
            .find_map(Message::as_user_text)
            .map(|content| content.chars().take(TITLE_MAX_CHARS).collect())
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        self.messages.last().expect("just pushed")
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
