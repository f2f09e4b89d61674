use crate::adapters::http::build_client;
use crate::adapters::LocalStorage;
use crate::app::pipelines::PublicationPipeline;
use crate::config::AppConfig;
use crate::core::etl::{EtlEngine, RunReport};
use crate::domain::ports::{ProfileSource, Storage};
use crate::presenter::{render_page, AssetLocation, Presenter};
use crate::publish::{GitPublisher, PublishOutcome};
use crate::sources::{build_source, FetchPolicy};
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub report: RunReport,
    pub publish: PublishOutcome,
}

/// One full refresh: pipeline, then relocate and commit.
pub async fn run_once(config: &AppConfig) -> Result<RunSummary> {
    let client = build_client(&config.source)?;
    let source = build_source(&config.source, client)?;
    run_with_source(config, source).await
}

pub async fn run_with_source(
    config: &AppConfig,
    source: Box<dyn ProfileSource>,
) -> Result<RunSummary> {
    let storage = LocalStorage::new(config.output.path.clone());
    let pipeline = PublicationPipeline::new(
        storage,
        source,
        config.profile.author_id.clone(),
        config.output.file_name.clone(),
    )
    .with_policy(FetchPolicy::from_config(&config.source));

    // 抓取失敗也會寫出 [] 並繼續 publish
    let report = EtlEngine::new(pipeline).run().await?;
    if let Some(error) = &report.fetch_error {
        tracing::warn!("⚠️ Fetch failed, published list is empty: {}", error);
    }

    let publish = if config.publish.enabled {
        GitPublisher::new(&config.publish)
            .publish(&config.output_file())
            .await?
    } else {
        tracing::info!("Publishing disabled, leaving {}", report.output_path);
        PublishOutcome::Skipped
    };

    Ok(RunSummary { report, publish })
}

/// Pre-renders `index.html` into the static dir from the current asset.
pub async fn render_static(config: &AppConfig) -> Result<String> {
    let static_dir = config.static_dir();
    let location = AssetLocation::resolve(&static_dir, &config.site.publications_path);
    let presenter = Presenter::load(&location, &reqwest::Client::new()).await;

    let html = render_page(&config.site, &config.scholar_profile_url(), &presenter)?;
    let storage = LocalStorage::new(static_dir.to_string_lossy().to_string());
    storage.write_file("index.html", html.as_bytes()).await?;

    let written = storage.location("index.html");
    tracing::info!(
        "🖨️ Rendered {} ({})",
        written,
        presenter.state().name()
    );
    Ok(written)
}
