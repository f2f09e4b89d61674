use crate::domain::model::{FetchOutcome, RawEntry, TransformResult};
use crate::sources::SourceError;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Truncates and rewrites `path`; no backup of the previous content is kept.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Filesystem location `path` resolves to, for logs and the publish step.
    fn location(&self, path: &str) -> String;
}

/// External author-profile source.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    fn name(&self) -> &str;

    /// Profile lookup: every publication listed on the author's profile, in page order.
    async fn fetch_profile(&self, author_id: &str) -> std::result::Result<Vec<RawEntry>, SourceError>;

    /// Per-publication detail lookup. Sources without a detail view return the entry as-is.
    async fn fill_publication(&self, entry: RawEntry) -> std::result::Result<RawEntry, SourceError> {
        Ok(entry)
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> FetchOutcome;
    async fn transform(&self, data: Vec<RawEntry>) -> TransformResult;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
