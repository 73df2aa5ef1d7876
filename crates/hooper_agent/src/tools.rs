//! The declared fact-provider tools and their argument shapes.

use chrono::NaiveDate;
use hooper_chat::ToolName;
use hooper_llm::ToolDefinition;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

/// The tool set advertised to the model on every turn.
pub(crate) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            ToolName::GetNews,
            "Get the latest NBA news",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query",
                    },
                },
            }),
        ),
        ToolDefinition::new(
            ToolName::GetScores,
            "Get the latest NBA scores for a given day",
            json!({
                "type": "object",
                "required": ["date"],
                "properties": {
                    "date": {
                        "type": "string",
                        "description": "The date to get scores for in YYYY-MM-DD format.",
                    },
                },
            }),
        ),
    ]
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewsArgs {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoresArgs {
    /// `YYYY-MM-DD`, per the declared schema.
    pub date: NaiveDate,
}

/// Validate model-supplied arguments against a tool's declared shape.
///
/// Invalid arguments short-circuit to an error marker without calling the
/// provider.
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: &Value) -> Result<T, String> {
    serde_json::from_value(arguments.clone()).map_err(|e| format!("invalid arguments: {e}"))
}
