//! Fetcher: author-profile sources and the fetch step that collapses every
//! source failure into an empty [`FetchOutcome`].

pub mod html;
pub mod json_feed;
pub mod scholar;

use crate::config::toml_config::{DetailFailurePolicy, SourceConfig, SourceKind};
use crate::domain::model::{FetchOutcome, RawEntry};
use crate::domain::ports::ProfileSource;
use crate::utils::error::Result;
use reqwest::{Client, StatusCode};
use thiserror::Error;

pub use json_feed::JsonFeedSource;
pub use scholar::ScholarSource;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("source unreachable at {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("source blocked the request to {url}: {reason}")]
    Blocked { url: String, reason: String },

    #[error("no author profile found for '{author_id}'")]
    ProfileNotFound { author_id: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("malformed response from {url}: {message}")]
    Malformed { url: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub fetch_details: bool,
    pub on_detail_failure: DetailFailurePolicy,
}

impl FetchPolicy {
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            fetch_details: config.fetch_details,
            on_detail_failure: config.on_detail_failure,
        }
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            fetch_details: true,
            on_detail_failure: DetailFailurePolicy::Abort,
        }
    }
}

/// 依設定建立 source
pub fn build_source(config: &SourceConfig, client: Client) -> Result<Box<dyn ProfileSource>> {
    let source: Box<dyn ProfileSource> = match config.kind {
        SourceKind::Scholar => Box::new(ScholarSource::new(
            client,
            &config.base_url,
            &config.language,
            config.page_size,
        )?),
        SourceKind::Json => {
            let endpoint = crate::utils::validation::validate_required_field(
                "source.endpoint",
                &config.endpoint,
            )?;
            Box::new(JsonFeedSource::new(client, endpoint.clone()))
        }
    };
    Ok(source)
}

/// Profile lookup followed by one detail lookup per publication, sequentially.
///
/// Never fails: any [`SourceError`] is logged and returned as
/// [`FetchOutcome::Failed`], which carries no entries.
pub async fn fetch_publications(
    source: &dyn ProfileSource,
    author_id: &str,
    policy: &FetchPolicy,
) -> FetchOutcome {
    match try_fetch(source, author_id, policy).await {
        Ok(entries) => {
            tracing::info!(
                "📚 Fetched {} publications from {} for author {}",
                entries.len(),
                source.name(),
                author_id
            );
            FetchOutcome::Succeeded(entries)
        }
        Err(e) => {
            tracing::error!("❌ Error fetching from {}: {}", source.name(), e);
            FetchOutcome::Failed(e)
        }
    }
}

async fn try_fetch(
    source: &dyn ProfileSource,
    author_id: &str,
    policy: &FetchPolicy,
) -> std::result::Result<Vec<RawEntry>, SourceError> {
    let listed = source.fetch_profile(author_id).await?;
    tracing::debug!("Profile lists {} publications", listed.len());

    if !policy.fetch_details {
        return Ok(listed);
    }

    let mut filled = Vec::with_capacity(listed.len());
    for (index, entry) in listed.into_iter().enumerate() {
        let summary = match policy.on_detail_failure {
            DetailFailurePolicy::UseSummary => Some(entry.clone()),
            DetailFailurePolicy::Abort => None,
        };

        match source.fill_publication(entry).await {
            Ok(detailed) => filled.push(detailed),
            // 被封鎖時後續請求也會失敗，直接中止
            Err(e @ SourceError::Blocked { .. }) => return Err(e),
            Err(e) => match summary {
                Some(summary) => {
                    tracing::warn!(
                        "⚠️ Detail lookup for publication #{} failed, keeping summary: {}",
                        index + 1,
                        e
                    );
                    filled.push(summary);
                }
                None => return Err(e),
            },
        }
    }

    Ok(filled)
}

/// GET `url` and return the body, mapping transport errors and refusal statuses.
pub(crate) async fn get_text(client: &Client, url: &str) -> std::result::Result<String, SourceError> {
    tracing::debug!("GET {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SourceError::Unreachable {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SourceError::Blocked {
            url: url.to_string(),
            reason: format!("HTTP {}", status.as_u16()),
        });
    }
    if !status.is_success() {
        return Err(SourceError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| SourceError::Unreachable {
        url: url.to_string(),
        message: e.to_string(),
    })
}
