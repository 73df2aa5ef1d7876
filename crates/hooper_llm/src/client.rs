use std::{collections::BTreeMap, io, time::Duration};

use async_stream::stream;
use async_trait::async_trait;
use backoff::{ExponentialBackoff, future::retry_notify};
use futures::{Stream, StreamExt as _, TryStreamExt as _};
use hooper_chat::{AssistantContent, Message, MessageKind};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Map, Value};
use tokio_util::{
    codec::{FramedRead, LinesCodec},
    io::StreamReader,
};
use tracing::{error, trace, warn};

use crate::{
    completion::{Completion, EventStream},
    error::{Error, Result},
    event::{FinishReason, StreamEvent, ToolCallEvent},
    request::ChatRequest,
    types::{
        request::{self, RequestMessage, Tool, ToolFunction},
        response::{ChatCompletionError, CompletionChunk},
    },
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Client for an OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct Client {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl Client {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http_client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build HTTP headers required for making API calls.
    /// Returns an error if any header value cannot be constructed.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", self.api_key)
                .parse()
                .map_err(|e| Error::Config(format!("Invalid API key header format: {e}")))?,
        );

        Ok(headers)
    }

    async fn chunk_stream(
        &self,
        request: request::ChatCompletion,
    ) -> Result<impl Stream<Item = Result<CompletionChunk>>> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let headers = self.build_headers()?;

        trace!(%url, model = request.model, "Triggering request.");
        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await?;

        trace!(
            status = response.status().as_u16(),
            content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .map(|v| v.to_str().unwrap_or_default()),
            "Received response."
        );

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let status = status.as_u16();
            let message = response.text().await?;

            error!(status, message, "Unexpected response.");

            return Err(Error::Api { status, message });
        }

        let byte_stream = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
        let lines = FramedRead::new(StreamReader::new(byte_stream), LinesCodec::new());

        // Transform the lines stream into a completion chunk stream
        let chunk_stream = lines
            .map_err(|e| Error::Stream(format!("Stream error: {e}")))
            .filter_map(|line_result| async move {
                match line_result {
                    Ok(line) => {
                        if line.trim().is_empty() {
                            return None;
                        }

                        if !line.starts_with("data:") {
                            return None;
                        }

                        // Each data line starts with "data:".
                        let data_part = line.trim_start_matches("data:").trim();

                        // Marks the end of the SSE stream.
                        //
                        // See: <https://platform.openai.com/docs/api-reference/chat-streaming>
                        if data_part == "[DONE]" {
                            return None;
                        }

                        Some(parse_chunk(data_part))
                    }
                    Err(e) => Some(Err(e)),
                }
            });

        Ok(chunk_stream)
    }
}

#[async_trait]
impl Completion for Client {
    async fn chat_completion_stream(&self, request: ChatRequest) -> Result<EventStream> {
        let client = self.clone();
        let wire_request = build_request(&request)?;

        let backoff = ExponentialBackoff {
            initial_interval: Duration::from_millis(10),
            max_interval: Duration::from_secs(5),
            max_elapsed_time: Some(Duration::from_secs(10)),
            ..Default::default()
        };

        let event_stream = stream! {
            let operation = || async {
                match client.chunk_stream(wire_request.clone()).await {
                    Ok(stream) => Ok(stream),
                    Err(error) if error.is_transient() => Err(backoff::Error::transient(error)),
                    Err(error) => Err(backoff::Error::permanent(error)),
                }
            };

            let notify = |error, backoff| warn!(?error, ?backoff, "Request failed. Retrying.");

            let chunks = match retry_notify(backoff, operation, notify).await {
                Ok(chunks) => chunks,
                Err(error) => {
                    yield Err(error);
                    return;
                }
            };

            let mut calls = ToolCallAccumulator::default();
            let mut finished = None;

            tokio::pin!(chunks);
            while let Some(chunk) = chunks.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(error) => {
                        yield Err(error);
                        return;
                    }
                };

                for choice in chunk.choices {
                    if let Some(content) = choice.delta.content {
                        if !content.is_empty() {
                            yield Ok(StreamEvent::Content(content));
                        }
                    }

                    for delta in choice.delta.tool_calls {
                        calls.push(delta);
                    }

                    if let Some(reason) = choice.finish_reason {
                        finished = Some(reason);
                    }
                }
            }

            // Tool invocations are only complete once the stream ends; emit
            // them ahead of the terminal event.
            for call in calls.finish() {
                match call {
                    Ok(call) => yield Ok(StreamEvent::ToolCall(call)),
                    Err(error) => {
                        yield Err(error);
                        return;
                    }
                }
            }

            yield Ok(StreamEvent::Finished(
                finished.map_or(FinishReason::Unknown, Into::into),
            ));
        };

        Ok(Box::pin(event_stream))
    }
}

fn parse_chunk(chunk: &str) -> Result<CompletionChunk> {
    let json_error = match serde_json::from_str(chunk) {
        Ok(response) => return Ok(response),
        Err(error) => error,
    };

    let Ok(ChatCompletionError { error }) = serde_json::from_str::<ChatCompletionError>(chunk)
    else {
        return Err(Error::Json(json_error));
    };

    Err(Error::Stream(format!(
        "provider error{}: {}",
        error
            .kind
            .map(|kind| format!(" ({kind})"))
            .unwrap_or_default(),
        error.message
    )))
}

/// Project the domain request into the provider's message format.
///
/// Tool exchanges are flattened per the provider contract: the recorded
/// invocation becomes an `assistant` message with `tool_calls`, and each
/// result becomes a `tool` message carrying the matching call id.
fn build_request(request: &ChatRequest) -> Result<request::ChatCompletion> {
    let mut messages = vec![RequestMessage::System {
        content: request.system.clone(),
    }];

    for message in &request.messages {
        messages.extend(project_message(message)?);
    }

    let tools = request
        .tools
        .iter()
        .map(|tool| Tool::Function {
            function: ToolFunction {
                name: tool.name.as_str().to_owned(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        })
        .collect();

    Ok(request::ChatCompletion {
        model: request.model.clone(),
        messages,
        tools,
        temperature: request.temperature,
        stream: true,
    })
}

fn project_message(message: &Message) -> Result<Vec<RequestMessage>> {
    let projected = match &message.kind {
        MessageKind::User { content } => vec![RequestMessage::User {
            content: content.clone(),
        }],
        MessageKind::Assistant {
            content: AssistantContent::Text(text),
        } => vec![RequestMessage::Assistant {
            content: Some(text.clone()),
            tool_calls: vec![],
        }],
        MessageKind::Assistant {
            content: AssistantContent::ToolCalls(calls),
        } => {
            let tool_calls = calls
                .iter()
                .map(|call| {
                    Ok(request::ToolCall::Function {
                        id: call.id.to_string(),
                        function: request::FunctionCall {
                            name: call.name.as_str().to_owned(),
                            arguments: serde_json::to_string(&call.arguments)?,
                        },
                    })
                })
                .collect::<Result<_>>()?;

            vec![RequestMessage::Assistant {
                content: None,
                tool_calls,
            }]
        }
        MessageKind::Tool { content } => content
            .iter()
            .map(|result| {
                let content = match &result.result {
                    Ok(payload) => serde_json::to_string(payload)?,
                    Err(marker) => marker.clone(),
                };

                Ok(RequestMessage::Tool {
                    content,
                    tool_call_id: result.id.to_string(),
                })
            })
            .collect::<Result<_>>()?,
    };

    Ok(projected)
}

/// Reassembles tool invocations from their streamed fragments.
#[derive(Debug, Default)]
struct ToolCallAccumulator {
    pending: BTreeMap<usize, PendingToolCall>,
}

#[derive(Debug, Default)]
struct PendingToolCall {
    name: String,
    arguments: String,
}

impl ToolCallAccumulator {
    fn push(&mut self, delta: crate::types::response::ToolCallDelta) {
        let pending = self.pending.entry(delta.index).or_default();

        if let Some(function) = delta.function {
            if let Some(name) = function.name {
                pending.name = name;
            }
            if let Some(arguments) = function.arguments {
                pending.arguments.push_str(&arguments);
            }
        }
    }

    fn finish(self) -> Vec<Result<ToolCallEvent>> {
        self.pending
            .into_values()
            .map(|pending| {
                if pending.name.is_empty() {
                    return Err(Error::Stream("tool call without a name".to_owned()));
                }

                let arguments = if pending.arguments.is_empty() {
                    Value::Object(Map::new())
                } else {
                    serde_json::from_str(&pending.arguments)?
                };

                Ok(ToolCallEvent {
                    name: pending.name,
                    arguments,
                })
            })
            .collect()
    }
}

impl From<crate::types::response::FinishReason> for FinishReason {
    fn from(reason: crate::types::response::FinishReason) -> Self {
        use crate::types::response::FinishReason as Wire;

        match reason {
            Wire::Stop => Self::Stop,
            Wire::ToolCalls => Self::ToolCalls,
            Wire::Length => Self::Length,
            Wire::ContentFilter => Self::ContentFilter,
            Wire::Unknown => Self::Unknown,
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
