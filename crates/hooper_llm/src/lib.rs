mod client;
mod completion;
mod error;
pub mod event;
pub mod request;
pub mod types;

pub use client::Client;
pub use completion::{Completion, EventStream};
pub use error::Error;
pub use event::{FinishReason, StreamEvent, ToolCallEvent};
pub use request::{ChatRequest, ToolDefinition};
