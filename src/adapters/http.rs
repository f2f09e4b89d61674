use crate::config::toml_config::SourceConfig;
use crate::utils::error::{Result, SyncError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;

/// Shared client for source requests. No retry or backoff is layered on top.
pub fn build_client(config: &SourceConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    for (key, value) in &config.headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            SyncError::InvalidConfigValueError {
                field: "source.headers".to_string(),
                value: key.clone(),
                reason: e.to_string(),
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| SyncError::InvalidConfigValueError {
            field: format!("source.headers.{}", key),
            value: value.clone(),
            reason: e.to_string(),
        })?;
        headers.insert(name, value);
    }

    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers);

    if let Some(timeout) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(timeout));
    }

    Ok(builder.build()?)
}
