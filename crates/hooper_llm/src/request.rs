//! The provider-agnostic completion request.

use hooper_chat::{Message, ToolName};
use serde_json::Value;

/// Everything needed to request one streamed completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// The model to query.
    pub model: String,

    /// The system instruction, sent ahead of the conversation history.
    pub system: String,

    /// Prior conversation history, oldest first.
    pub messages: Vec<Message>,

    /// The tools the model may elect to invoke.
    pub tools: Vec<ToolDefinition>,

    pub temperature: f32,
}

impl ChatRequest {
    #[must_use]
    pub fn new(model: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            messages: vec![],
            tools: vec![],
            temperature: 0.0,
        }
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// The declaration of a tool, as advertised to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: ToolName,
    pub description: String,

    /// JSON schema for the tool's arguments.
    pub parameters: Value,
}

impl ToolDefinition {
    #[must_use]
    pub fn new(name: ToolName, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name,
            description: description.into(),
            parameters,
        }
    }
}
