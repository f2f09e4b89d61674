use crate::core::normalizer::normalize_all;
use crate::core::serializer::to_json_document;
use crate::core::{FetchOutcome, Pipeline, ProfileSource, RawEntry, Storage, TransformResult};
use crate::sources::{fetch_publications, FetchPolicy};
use crate::utils::error::Result;

/// Fetcher → Normalizer → Serializer over one author profile.
pub struct PublicationPipeline<S: Storage> {
    pub(crate) storage: S,
    pub(crate) source: Box<dyn ProfileSource>,
    pub(crate) author_id: String,
    pub(crate) policy: FetchPolicy,
    pub(crate) file_name: String,
}

impl<S: Storage> PublicationPipeline<S> {
    pub fn new(
        storage: S,
        source: Box<dyn ProfileSource>,
        author_id: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            source,
            author_id: author_id.into(),
            policy: FetchPolicy::default(),
            file_name: file_name.into(),
        }
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for PublicationPipeline<S> {
    async fn extract(&self) -> FetchOutcome {
        tracing::info!(
            "🔎 Fetching publications for {} from {}",
            self.author_id,
            self.source.name()
        );
        fetch_publications(self.source.as_ref(), &self.author_id, &self.policy).await
    }

    async fn transform(&self, data: Vec<RawEntry>) -> TransformResult {
        normalize_all(data)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let document = to_json_document(&result.publications)?;
        tracing::debug!("Writing {} bytes to {}", document.len(), self.file_name);
        self.storage
            .write_file(&self.file_name, document.as_bytes())
            .await?;
        Ok(self.storage.location(&self.file_name))
    }
}
