use std::{fmt, pin::Pin};

use async_trait::async_trait;
use futures::Stream;

use crate::{error::Result, event::StreamEvent, request::ChatRequest};

pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// The seam between the turn orchestrator and a completion provider.
#[async_trait]
pub trait Completion: fmt::Debug + Send + Sync {
    /// Perform a streaming chat completion.
    async fn chat_completion_stream(&self, request: ChatRequest) -> Result<EventStream>;
}
