use crate::domain::model::FetchOutcome;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub output_path: String,
    pub fetch_succeeded: bool,
    /// Failure message when the fetch degraded to an empty list.
    pub fetch_error: Option<String>,
    pub publications: usize,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract → transform → load. A failed extract still loads an empty list.
    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("🚀 Starting publication refresh");

        // Extract
        let outcome = self.pipeline.extract().await;
        let fetch_succeeded = outcome.is_success();
        let fetch_error = match &outcome {
            FetchOutcome::Failed(e) => Some(e.to_string()),
            FetchOutcome::Succeeded(_) => None,
        };
        let raw = outcome.into_entries();
        tracing::info!("📥 Extracted {} raw entries", raw.len());

        // Transform
        let transformed = self.pipeline.transform(raw).await;
        let publications = transformed.publications.len();
        tracing::info!(
            "🔧 Normalized {} publications ({} null fields)",
            publications,
            transformed.missing_fields
        );

        // Load
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("💾 Wrote {} publications to {}", publications, output_path);

        Ok(RunReport {
            output_path,
            fetch_succeeded,
            fetch_error,
            publications,
        })
    }
}
