use serde::Serialize;
use serde_json::Value;

/// Chat completion request matching the OpenAI API schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletion {
    pub model: String,

    pub messages: Vec<RequestMessage>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,

    pub temperature: f32,

    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "role")]
pub enum RequestMessage {
    System {
        content: String,
    },

    User {
        content: String,
    },

    Assistant {
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },

    Tool {
        content: String,
        tool_call_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Tool {
    Function { function: ToolFunction },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolFunction {
    pub name: String,
    pub description: String,

    /// See: <https://platform.openai.com/docs/guides/function-calling>
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ToolCall {
    Function { id: String, function: FunctionCall },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub name: String,

    /// JSON-encoded argument object.
    pub arguments: String,
}
