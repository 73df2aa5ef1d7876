//! The outcome surface of one submitted turn.

use hooper_chat::ToolName;
use hooper_espn::{News, Scoreboard};

/// Interim notifications emitted while a turn is in flight.
///
/// A text completion yields one [`Progress::ContentDelta`] per streamed
/// chunk; a tool invocation yields exactly one [`Progress::ToolPending`]
/// before the provider is called.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    ContentDelta(String),
    ToolPending(ToolName),
}

/// The renderable result of a successful turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The assistant's accumulated text.
    Message(String),

    /// Articles returned by the news tool.
    News(News),

    /// Events returned by the scores tool.
    Scores(Scoreboard),
}

/// A turn that did not produce a renderable payload.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// Admission was rejected; the conversation state was not touched and
    /// nothing was persisted.
    #[error("rate limited, try again later")]
    RateLimited,

    /// A tool invocation failed; the failure is recorded in the transcript
    /// as an error-marked exchange.
    #[error("failed to get {}", topic(.0))]
    Tool(ToolName),

    /// The completion stream itself failed; nothing beyond the user
    /// message was appended and nothing was persisted.
    #[error("completion failed: {0}")]
    Completion(String),
}

const fn topic(name: &ToolName) -> &'static str {
    match name {
        ToolName::GetNews => "news",
        ToolName::GetScores => "scores",
    }
}
