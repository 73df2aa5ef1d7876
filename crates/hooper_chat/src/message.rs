//! Role-tagged conversation messages.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeStruct as _};
use serde_json::Value;

use crate::{
    error::Error,
    id::{MessageId, ToolCallId},
};

/// One unit of conversation history.
///
/// Messages are immutable once appended to a [`ChatState`]; they are only
/// ever appended, never edited or reordered.
///
/// [`ChatState`]: crate::ChatState
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique within the conversation.
    pub id: MessageId,

    /// The role-discriminated content.
    #[serde(flatten)]
    pub kind: MessageKind,
}

impl Message {
    /// Create a user message with a fresh id.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            kind: MessageKind::User {
                content: content.into(),
            },
        }
    }

    /// Create an assistant text message with a fresh id.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            kind: MessageKind::Assistant {
                content: AssistantContent::Text(content.into()),
            },
        }
    }

    /// Create an assistant message recording a tool invocation.
    #[must_use]
    pub fn tool_call(request: ToolCallRequest) -> Self {
        Self {
            id: MessageId::new(),
            kind: MessageKind::Assistant {
                content: AssistantContent::ToolCalls(vec![request]),
            },
        }
    }

    /// Create a tool message recording one or more results.
    #[must_use]
    pub fn tool_result(result: ToolCallResult) -> Self {
        Self {
            id: MessageId::new(),
            kind: MessageKind::Tool {
                content: vec![result],
            },
        }
    }

    /// The role tag of the message.
    #[must_use]
    pub const fn role(&self) -> &'static str {
        match self.kind {
            MessageKind::User { .. } => "user",
            MessageKind::Assistant { .. } => "assistant",
            MessageKind::Tool { .. } => "tool",
        }
    }

    /// Returns the content of a user message, if applicable.
    #[must_use]
    pub fn as_user_text(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::User { content } => Some(content),
            _ => None,
        }
    }

    /// Returns the text of an assistant message, if applicable.
    #[must_use]
    pub fn as_assistant_text(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::Assistant {
                content: AssistantContent::Text(text),
            } => Some(text),
            _ => None,
        }
    }

    /// Returns the tool invocations of an assistant message, if applicable.
    #[must_use]
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match &self.kind {
            MessageKind::Assistant {
                content: AssistantContent::ToolCalls(calls),
            } => calls,
            _ => &[],
        }
    }

    /// Returns the tool results of a tool message, if applicable.
    #[must_use]
    pub fn tool_results(&self) -> &[ToolCallResult] {
        match &self.kind {
            MessageKind::Tool { content } => content,
            _ => &[],
        }
    }
}

/// Message content, discriminated by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum MessageKind {
    /// Text submitted by the user.
    User { content: String },

    /// Either the assistant's text reply, or the tool invocations it chose
    /// to make instead.
    Assistant { content: AssistantContent },

    /// Results paired with a preceding assistant tool invocation.
    Tool { content: Vec<ToolCallResult> },
}

/// An assistant message is either plain text or a set of tool invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssistantContent {
    Text(String),
    ToolCalls(Vec<ToolCallRequest>),
}

/// A request to execute a tool, recorded on the assistant's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Pairs this invocation with its [`ToolCallResult`].
    pub id: ToolCallId,

    /// The tool to execute.
    pub name: ToolName,

    /// Arguments supplied by the model.
    pub arguments: Value,
}

/// The result of executing a tool.
///
/// MUST directly follow the [`ToolCallRequest`] it responds to, with a
/// matching `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    /// Id matching the corresponding [`ToolCallRequest`].
    pub id: ToolCallId,

    /// The tool that was executed.
    pub name: ToolName,

    /// `Ok(payload)` on success, `Err(marker)` on failure.
    pub result: Result<Value, String>,
}

impl ToolCallResult {
    /// Returns `true` if the result carries an error marker.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.result.is_err()
    }
}

impl Serialize for ToolCallResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ToolCallResult", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;

        match &self.result {
            Ok(payload) => state.serialize_field("result", payload)?,
            Err(marker) => state.serialize_field("error", marker)?,
        }

        state.end()
    }
}

impl<'de> Deserialize<'de> for ToolCallResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper {
            id: ToolCallId,
            name: ToolName,
            #[serde(default)]
            result: Option<Value>,
            #[serde(default)]
            error: Option<String>,
        }

        let helper = Helper::deserialize(deserializer)?;
        let result = match (helper.result, helper.error) {
            (_, Some(error)) => Err(error),
            (Some(result), None) => Ok(result),
            (None, None) => {
                return Err(serde::de::Error::missing_field("result"));
            }
        };

        Ok(Self {
            id: helper.id,
            name: helper.name,
            result,
        })
    }
}

/// The enumerated fact-provider tools the assistant may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolName {
    #[serde(rename = "getNews")]
    GetNews,

    #[serde(rename = "getScores")]
    GetScores,
}

impl ToolName {
    /// The wire name of the tool.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GetNews => "getNews",
            Self::GetScores => "getScores",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "getNews" => Ok(Self::GetNews),
            "getScores" => Ok(Self::GetScores),
            _ => Err(Error::UnknownTool(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
