use crate::domain::model::RawEntry;
use crate::domain::ports::ProfileSource;
use crate::sources::{get_text, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Source reading raw entries from a JSON endpoint, e.g. an exporter or a
/// hosted Scholar proxy. `{author_id}` in the endpoint is substituted.
pub struct JsonFeedSource {
    client: Client,
    endpoint: String,
}

impl JsonFeedSource {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint_for(&self, author_id: &str) -> String {
        self.endpoint.replace("{author_id}", author_id)
    }
}

#[async_trait]
impl ProfileSource for JsonFeedSource {
    fn name(&self) -> &str {
        "json-feed"
    }

    async fn fetch_profile(&self, author_id: &str) -> Result<Vec<RawEntry>, SourceError> {
        let url = self.endpoint_for(author_id);
        let body = get_text(&self.client, &url).await.map_err(|e| match e {
            SourceError::UnexpectedStatus { status: 404, .. } => SourceError::ProfileNotFound {
                author_id: author_id.to_string(),
            },
            other => other,
        })?;

        let document: Value = serde_json::from_str(&body).map_err(|e| SourceError::Malformed {
            url: url.clone(),
            message: e.to_string(),
        })?;

        // 只接受陣列；非物件元素略過
        match document {
            Value::Array(items) => {
                let total = items.len();
                let entries: Vec<RawEntry> = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(obj) => Some(RawEntry::new(obj)),
                        _ => None,
                    })
                    .collect();
                if entries.len() < total {
                    tracing::warn!(
                        "Skipped {} non-object entries from {}",
                        total - entries.len(),
                        url
                    );
                }
                Ok(entries)
            }
            other => Err(SourceError::Malformed {
                url,
                message: format!("expected a JSON array, got {}", json_type(&other)),
            }),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
