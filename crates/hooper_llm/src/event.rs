//! Events produced while streaming a completion.

use serde_json::Value;

/// An incremental event from the model stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A chunk of assistant response text.
    Content(String),

    /// A fully accumulated tool invocation.
    ///
    /// Emitted once the stream finishes, after all argument fragments have
    /// arrived.
    ToolCall(ToolCallEvent),

    /// The stream has ended.
    Finished(FinishReason),
}

/// A tool invocation as the provider reported it.
///
/// The provider-assigned call id is not carried; the orchestrator mints its
/// own id when it records the invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallEvent {
    /// The tool name as supplied by the model. Not yet validated against
    /// the declared tool set.
    pub name: String,

    /// The parsed argument object.
    pub arguments: Value,
}

/// The reason the assistant stopped generating tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The assistant completed its reply.
    Stop,

    /// The assistant finished requesting tool call execution.
    ToolCalls,

    /// The maximum number of tokens was reached.
    Length,

    /// Content was withheld by a provider-side filter.
    ContentFilter,

    /// Undefined/unknown finish reason.
    ///
    /// A provider-reported generation error surfaces as a stream error,
    /// not a finish reason.
    Unknown,
}
