use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Deserialize, Debug)]
pub struct DatabaseProperty {
    pub id: String,
    #[serde(rename = "type")]
    pub typ: String,
}

/// Database object as returned by create/retrieve endpoints.
#[derive(Deserialize, Debug)]
pub struct DatabaseObject {
    pub id: String,
    #[serde(default)]
    pub title: Vec<Value>,
    #[serde(default)]
    pub properties: HashMap<String, DatabaseProperty>,
}

impl DatabaseObject {
    /// Plain-text title assembled from Notion's rich-text fragments.
    pub fn plain_title(&self) -> String {
        let text: String = self
            .title
            .iter()
            .filter_map(|t| t.get("plain_text").and_then(Value::as_str))
            .collect();
        if text.is_empty() {
            "(Untitled)".to_string()
        } else {
            text
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct PageRef {
    pub id: String,
}

/// Envelope for `POST /v1/databases/{id}/query`.
#[derive(Deserialize, Debug)]
pub struct QueryDatabaseResp {
    #[serde(default)]
    pub results: Vec<PageRef>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Envelope for `POST /v1/search`.
#[derive(Deserialize, Debug)]
pub struct SearchResp {
    #[serde(default)]
    pub results: Vec<DatabaseObject>,
}
