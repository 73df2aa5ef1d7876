use serde_json::json;

use super::*;

#[test]
fn test_user_message_shape() {
    let message = Message::user("Who won last night?");
    let value = serde_json::to_value(&message).unwrap();

    assert_eq!(
        value,
        json!({
            "id": message.id.to_string(),
            "role": "user",
            "content": "Who won last night?",
        })
    );
}

#[test]
fn test_assistant_text_message_shape() {
    let message = Message::assistant("The Celtics won.");
    let value = serde_json::to_value(&message).unwrap();

    assert_eq!(value["role"], "assistant");
    assert_eq!(value["content"], "The Celtics won.");
}

#[test]
fn test_tool_call_message_shape() {
    let request = ToolCallRequest {
        id: ToolCallId::new(),
        name: ToolName::GetScores,
        arguments: json!({ "date": "2024-03-05" }),
    };
    let message = Message::tool_call(request.clone());
    let value = serde_json::to_value(&message).unwrap();

    assert_eq!(value["role"], "assistant");
    assert_eq!(
        value["content"],
        json!([{
            "id": request.id.to_string(),
            "name": "getScores",
            "arguments": { "date": "2024-03-05" },
        }])
    );
}

#[test]
fn test_tool_result_success_shape() {
    let result = ToolCallResult {
        id: ToolCallId::new(),
        name: ToolName::GetNews,
        result: Ok(json!({ "articles": [] })),
    };
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["result"], json!({ "articles": [] }));
    assert!(value.get("error").is_none());
}

#[test]
fn test_tool_result_error_shape() {
    let result = ToolCallResult {
        id: ToolCallId::new(),
        name: ToolName::GetScores,
        result: Err("request timed out".to_owned()),
    };
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["error"], "request timed out");
    assert!(value.get("result").is_none());
}

#[test]
fn test_tool_result_roundtrip() {
    let result = ToolCallResult {
        id: ToolCallId::new(),
        name: ToolName::GetNews,
        result: Err("boom".to_owned()),
    };

    let json = serde_json::to_string(&result).unwrap();
    let parsed: ToolCallResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);
}

#[test]
fn test_message_roundtrip_preserves_kind() {
    let messages = vec![
        Message::user("hello"),
        Message::assistant("hi"),
        Message::tool_result(ToolCallResult {
            id: ToolCallId::new(),
            name: ToolName::GetNews,
            result: Ok(json!([])),
        }),
    ];

    let json = serde_json::to_string(&messages).unwrap();
    let parsed: Vec<Message> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, messages);
}

#[test]
fn test_tool_name_parsing() {
    assert_eq!("getNews".parse::<ToolName>().unwrap(), ToolName::GetNews);
    assert_eq!(
        "getScores".parse::<ToolName>().unwrap(),
        ToolName::GetScores
    );
    assert!("getStandings".parse::<ToolName>().is_err());
}
