use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt as _;
use hooper_chat::{Chat, ChatId, ChatState, ToolCallId, ToolCallRequest, ToolName};
use hooper_llm::{ChatRequest, Completion, StreamEvent};
use hooper_ratelimit::RateLimiter;
use hooper_store::ChatStore;
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::{
    error::{Error, Result},
    prompt,
    session::Session,
    tools::{self, NewsArgs, ScoresArgs},
    turn::{Progress, Reply, TurnError},
};

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// The turn orchestrator.
///
/// Owns the admission check, the completion stream, tool dispatch and the
/// persistence reconciler. One [`ChatState`] value must not be submitted
/// concurrently: `submit_turn` consumes the state and returns the updated
/// copy, so a single owner processes turns sequentially by construction.
#[derive(Debug)]
pub struct Agent {
    completion: Arc<dyn Completion>,
    espn: hooper_espn::Client,
    store: ChatStore,
    limiter: RateLimiter,
    model: String,
}

impl Agent {
    #[must_use]
    pub fn new(
        completion: Arc<dyn Completion>,
        espn: hooper_espn::Client,
        store: ChatStore,
    ) -> Self {
        Self {
            completion,
            espn,
            store,
            limiter: RateLimiter::new(),
            model: DEFAULT_MODEL.to_owned(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    /// Process one user message against the given conversation state.
    ///
    /// Returns the updated state and either a renderable reply or a typed
    /// turn error. On rate-limit rejection the state is returned untouched.
    /// A completed turn (including one whose tool call failed) is committed
    /// to storage for authenticated sessions; anonymous sessions are never
    /// persisted.
    pub async fn submit_turn(
        &self,
        state: ChatState,
        text: impl Into<String>,
        session: &Session,
        mut progress: impl FnMut(Progress),
    ) -> (ChatState, std::result::Result<Reply, TurnError>) {
        if !self.limiter.check(&session.rate_limit_identity()) {
            debug!(chat = %state.id(), "Turn rejected by rate limiter.");
            return (state, Err(TurnError::RateLimited));
        }

        let mut state = state;
        state.push_user(text);

        let request = ChatRequest::new(&self.model, prompt::system(Utc::now().date_naive()))
            .with_messages(state.messages().to_vec())
            .with_tools(tools::definitions());

        let mut stream = match self.completion.chat_completion_stream(request).await {
            Ok(stream) => stream,
            Err(error) => {
                warn!(%error, "Completion request failed.");
                return (state, Err(TurnError::Completion(error.to_string())));
            }
        };

        let mut content = String::new();
        let mut outcome: Option<std::result::Result<Reply, TurnError>> = None;

        while let Some(event) = stream.next().await {
            match event {
                Ok(StreamEvent::Content(delta)) => {
                    content.push_str(&delta);
                    progress(Progress::ContentDelta(delta));
                }
                Ok(StreamEvent::ToolCall(call)) => {
                    if outcome.is_some() {
                        warn!(tool = call.name, "Ignoring extra tool call in the same turn.");
                        continue;
                    }

                    // An undeclared tool aborts the turn like any other
                    // completion failure: no entries, no persistence.
                    let Ok(name) = call.name.parse::<ToolName>() else {
                        warn!(tool = call.name, "Model selected an undeclared tool.");
                        return (
                            state,
                            Err(TurnError::Completion(format!(
                                "unknown tool: {}",
                                call.name
                            ))),
                        );
                    };

                    outcome = Some(
                        self.dispatch_tool(&mut state, name, call.arguments, &mut progress)
                            .await,
                    );
                }
                Ok(StreamEvent::Finished(reason)) => {
                    trace!(?reason, "Completion stream finished.");
                    break;
                }
                Err(error) if outcome.is_some() => {
                    // The tool exchange is already recorded; a trailing
                    // stream failure must not discard it.
                    warn!(%error, "Completion stream failed after tool dispatch.");
                    break;
                }
                Err(error) => {
                    warn!(%error, "Completion stream failed.");
                    return (state, Err(TurnError::Completion(error.to_string())));
                }
            }
        }

        let result = match outcome {
            Some(result) => result,
            None => {
                state.push_assistant(content.clone());
                Ok(Reply::Message(content))
            }
        };

        if let Some(owner) = session.user_id() {
            if let Err(error) = self.store.save(&state, owner) {
                // Storage is last-writer-wins and best-effort; a failed
                // write must not turn a delivered reply into an error.
                warn!(%error, chat = %state.id(), "Failed to persist chat.");
            }
        }

        (state, result)
    }

    async fn dispatch_tool(
        &self,
        state: &mut ChatState,
        name: ToolName,
        arguments: Value,
        progress: &mut impl FnMut(Progress),
    ) -> std::result::Result<Reply, TurnError> {
        // Interim notification, emitted exactly once before the provider
        // call.
        progress(Progress::ToolPending(name));

        let request = ToolCallRequest {
            id: ToolCallId::new(),
            name,
            arguments: arguments.clone(),
        };

        info!(tool = %name, arguments = %arguments, "Calling tool.");
        match self.execute_tool(name, &arguments).await {
            Ok((payload, reply)) => {
                state.push_tool_exchange(request, Ok(payload));
                Ok(reply)
            }
            Err(marker) => {
                warn!(tool = %name, error = marker, "Tool call failed.");
                state.push_tool_exchange(request, Err(marker));
                Err(TurnError::Tool(name))
            }
        }
    }

    async fn execute_tool(
        &self,
        name: ToolName,
        arguments: &Value,
    ) -> std::result::Result<(Value, Reply), String> {
        match name {
            ToolName::GetNews => {
                let args: NewsArgs = tools::parse_args(arguments)?;
                if let Some(query) = &args.query {
                    // The upstream endpoint takes no query; accepted for
                    // schema compatibility only.
                    debug!(query, "News query accepted but not forwarded.");
                }

                let news = self.espn.news().await.map_err(|e| e.to_string())?;
                let payload = serde_json::to_value(&news).map_err(|e| e.to_string())?;
                Ok((payload, Reply::News(news)))
            }
            ToolName::GetScores => {
                let args: ScoresArgs = tools::parse_args(arguments)?;
                let scoreboard = self
                    .espn
                    .scoreboard(args.date)
                    .await
                    .map_err(|e| e.to_string())?;
                let payload = serde_json::to_value(&scoreboard).map_err(|e| e.to_string())?;
                Ok((payload, Reply::Scores(scoreboard)))
            }
        }
    }

    /// List the session user's transcripts, newest first.
    pub fn history(&self, session: &Session) -> Result<Vec<Chat>> {
        let owner = session.user_id().ok_or(Error::Unauthorized)?;
        Ok(self.store.list(owner)?)
    }

    /// Reload a stored conversation for further turns.
    pub fn load_chat(&self, id: ChatId, session: &Session) -> Result<ChatState> {
        let owner = session.user_id().ok_or(Error::Unauthorized)?;
        Ok(self.store.resume(id, owner)?)
    }

    /// Fetch one of the session user's transcripts.
    pub fn get_chat(&self, id: ChatId, session: &Session) -> Result<Chat> {
        let owner = session.user_id().ok_or(Error::Unauthorized)?;
        Ok(self.store.get(id, owner)?)
    }

    /// Publish a transcript under its share path and return the path.
    pub fn share_chat(&self, id: ChatId, session: &Session) -> Result<String> {
        let owner = session.user_id().ok_or(Error::Unauthorized)?;
        Ok(self.store.share(id, owner)?)
    }

    /// Fetch a shared transcript anonymously by its share path.
    pub fn shared_chat(&self, share_path: &str) -> Result<Chat> {
        Ok(self.store.get_shared(share_path)?)
    }

    /// Delete one of the session user's transcripts.
    pub fn remove_chat(&self, id: ChatId, session: &Session) -> Result<()> {
        let owner = session.user_id().ok_or(Error::Unauthorized)?;
        Ok(self.store.remove(id, owner)?)
    }

    /// Delete all of the session user's transcripts.
    pub fn clear_chats(&self, session: &Session) -> Result<()> {
        let owner = session.user_id().ok_or(Error::Unauthorized)?;
        Ok(self.store.clear(owner)?)
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
