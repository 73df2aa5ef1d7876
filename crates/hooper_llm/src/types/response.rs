use serde::Deserialize;

/// One server-sent chunk of a streamed chat completion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionChunk {
    pub id: String,
    pub choices: Vec<StreamingChoice>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamingChoice {
    pub delta: StreamingDelta,

    /// `None` until the stream is finished.
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StreamingDelta {
    pub role: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCallDelta>,
}

/// A fragment of a tool invocation.
///
/// The name arrives with the first fragment for a given `index`; the
/// argument string is spread over subsequent fragments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: usize,
    pub id: Option<String>,
    pub function: Option<FunctionDelta>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FunctionDelta {
    pub name: Option<String>,
    pub arguments: Option<String>,
}

/// The reason why the assistant stopped generating tokens.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The assistant has finished requesting a tool call execution.
    ToolCalls,

    /// The assistant has stopped generating tokens.
    Stop,

    /// The assistant has reached the maximum length of accepted tokens.
    Length,

    /// Content was filtered out by the provider.
    ContentFilter,

    /// Undefined/unknown finish reason.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionError {
    pub error: ErrorResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
