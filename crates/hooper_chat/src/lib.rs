pub mod chat;
pub mod error;
pub mod id;
pub mod message;
pub mod state;

pub use chat::Chat;
pub use error::Error;
pub use id::{ChatId, MessageId, ToolCallId, UserId};
pub use message::{
    AssistantContent, Message, MessageKind, ToolCallRequest, ToolCallResult, ToolName,
};
pub use state::ChatState;
