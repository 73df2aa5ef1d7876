use futures::StreamExt as _;
use hooper_chat::{ToolCallId, ToolCallRequest, ToolName};
use httpmock::prelude::*;
use serde_json::json;

use super::*;
use crate::request::ToolDefinition;

fn sse_body(lines: &[serde_json::Value]) -> String {
    let mut body = String::new();
    for line in lines {
        body.push_str(&format!("data: {line}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

async fn collect_events(client: &Client, request: ChatRequest) -> Vec<Result<StreamEvent>> {
    let mut stream = client.chat_completion_stream(request).await.unwrap();
    let mut events = vec![];
    while let Some(event) = stream.next().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_streams_content_deltas() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer test-key");
            then.status(200).body(sse_body(&[
                json!({"id": "chatcmpl-1", "choices": [{"delta": {"role": "assistant", "content": "Hello"}, "finish_reason": null}]}),
                json!({"id": "chatcmpl-1", "choices": [{"delta": {"content": " world"}, "finish_reason": null}]}),
                json!({"id": "chatcmpl-1", "choices": [{"delta": {}, "finish_reason": "stop"}]}),
            ]));
        })
        .await;

    let client = Client::new("test-key").with_base_url(server.base_url());
    let events = collect_events(&client, ChatRequest::new("gpt-3.5-turbo", "be brief")).await;

    mock.assert_async().await;
    let events: Vec<_> = events.into_iter().map(Result::unwrap).collect();
    assert_eq!(
        events,
        vec![
            StreamEvent::Content("Hello".to_owned()),
            StreamEvent::Content(" world".to_owned()),
            StreamEvent::Finished(FinishReason::Stop),
        ]
    );
}

#[tokio::test]
async fn test_accumulates_tool_call_fragments() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body(sse_body(&[
                json!({"id": "chatcmpl-2", "choices": [{"delta": {"tool_calls": [
                    {"index": 0, "id": "call_abc", "function": {"name": "getScores", "arguments": ""}},
                ]}, "finish_reason": null}]}),
                json!({"id": "chatcmpl-2", "choices": [{"delta": {"tool_calls": [
                    {"index": 0, "function": {"arguments": "{\"date\":"}},
                ]}, "finish_reason": null}]}),
                json!({"id": "chatcmpl-2", "choices": [{"delta": {"tool_calls": [
                    {"index": 0, "function": {"arguments": "\"2024-03-05\"}"}},
                ]}, "finish_reason": null}]}),
                json!({"id": "chatcmpl-2", "choices": [{"delta": {}, "finish_reason": "tool_calls"}]}),
            ]));
        })
        .await;

    let client = Client::new("test-key").with_base_url(server.base_url());
    let events = collect_events(&client, ChatRequest::new("gpt-3.5-turbo", "persona")).await;

    let events: Vec<_> = events.into_iter().map(Result::unwrap).collect();
    assert_eq!(
        events,
        vec![
            StreamEvent::ToolCall(ToolCallEvent {
                name: "getScores".to_owned(),
                arguments: json!({ "date": "2024-03-05" }),
            }),
            StreamEvent::Finished(FinishReason::ToolCalls),
        ]
    );
}

#[tokio::test]
async fn test_api_error_is_permanent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401).body("invalid key");
        })
        .await;

    let client = Client::new("bad-key").with_base_url(server.base_url());
    let events = collect_events(&client, ChatRequest::new("gpt-3.5-turbo", "persona")).await;

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Err(Error::Api { status: 401, .. })));
    // A 401 must not be retried.
    mock.assert_async().await;
}

#[tokio::test]
async fn test_inline_provider_error_surfaces() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body(
                "data: {\"error\": {\"message\": \"model overloaded\", \"type\": \"server_error\"}}\n\n",
            );
        })
        .await;

    let client = Client::new("test-key").with_base_url(server.base_url());
    let mut stream = client
        .chat_completion_stream(ChatRequest::new("gpt-3.5-turbo", "persona"))
        .await
        .unwrap();

    let event = stream.next().await.unwrap();
    match event {
        Err(Error::Stream(message)) => assert!(message.contains("model overloaded")),
        other => panic!("expected stream error, got {other:?}"),
    }
}

#[test]
fn test_transient_classification() {
    assert!(
        Error::Api {
            status: 429,
            message: String::new()
        }
        .is_transient()
    );
    assert!(
        Error::Api {
            status: 503,
            message: String::new()
        }
        .is_transient()
    );
    assert!(
        !Error::Api {
            status: 400,
            message: String::new()
        }
        .is_transient()
    );
    assert!(!Error::Config("bad header".to_owned()).is_transient());
}

#[test]
fn test_request_projection_flattens_tool_exchange() {
    let call_id = ToolCallId::new();
    let mut state = hooper_chat::ChatState::new();
    state.push_user("scores for yesterday?");
    state.push_tool_exchange(
        ToolCallRequest {
            id: call_id,
            name: ToolName::GetScores,
            arguments: json!({ "date": "2024-03-04" }),
        },
        Ok(json!({ "events": [] })),
    );
    state.push_assistant("Here you go.");

    let request = ChatRequest::new("gpt-3.5-turbo", "persona")
        .with_messages(state.messages().to_vec())
        .with_tools(vec![ToolDefinition::new(
            ToolName::GetScores,
            "Get the latest NBA scores for a given day",
            json!({ "type": "object" }),
        )]);

    let wire = build_request(&request).unwrap();
    let value = serde_json::to_value(&wire).unwrap();

    assert_eq!(
        value["messages"],
        json!([
            { "role": "system", "content": "persona" },
            { "role": "user", "content": "scores for yesterday?" },
            { "role": "assistant", "tool_calls": [{
                "type": "function",
                "id": call_id.to_string(),
                "function": { "name": "getScores", "arguments": "{\"date\":\"2024-03-04\"}" },
            }] },
            { "role": "tool", "content": "{\"events\":[]}", "tool_call_id": call_id.to_string() },
            { "role": "assistant", "content": "Here you go." },
        ])
    );
    assert_eq!(value["stream"], json!(true));
    assert_eq!(value["tools"][0]["function"]["name"], "getScores");
}

#[test]
fn test_tool_error_marker_projects_as_tool_content() {
    let call_id = ToolCallId::new();
    let mut state = hooper_chat::ChatState::new();
    state.push_user("news?");
    state.push_tool_exchange(
        ToolCallRequest {
            id: call_id,
            name: ToolName::GetNews,
            arguments: json!({}),
        },
        Err("request timed out".to_owned()),
    );

    let request =
        ChatRequest::new("gpt-3.5-turbo", "persona").with_messages(state.messages().to_vec());
    let wire = build_request(&request).unwrap();
    let value = serde_json::to_value(&wire).unwrap();

    assert_eq!(value["messages"][3]["role"], "tool");
    assert_eq!(value["messages"][3]["content"], "request timed out");
}
