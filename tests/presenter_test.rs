use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use scholar_sync::server::{router, SiteState};
use scholar_sync::AppConfig;
use tempfile::TempDir;
use tower::ServiceExt;

fn site_config(root: &TempDir) -> Result<AppConfig> {
    let root_path = root.path().to_str().unwrap().replace('\\', "/");
    let toml_content = format!(
        r#"
[profile]
author_id = "abc123"

[publish]
repository = "{}"
static_dir = "public"

[site]
owner = "Dr. Test Author"
"#,
        root_path
    );
    Ok(AppConfig::from_toml_str(&toml_content)?)
}

async fn get(config: AppConfig, uri: &str) -> Result<(StatusCode, String)> {
    let response = router(SiteState::new(config))
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, String::from_utf8(bytes.to_vec())?))
}

#[tokio::test]
async fn test_missing_asset_renders_failure_message() -> Result<()> {
    let root = TempDir::new()?;
    let (status, html) = get(site_config(&root)?, "/").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Failed to load publications."));
    assert!(html.contains("Dr. Test Author"));
    Ok(())
}

#[tokio::test]
async fn test_empty_asset_renders_no_publications() -> Result<()> {
    let root = TempDir::new()?;
    std::fs::create_dir_all(root.path().join("public"))?;
    std::fs::write(root.path().join("public").join("publications.json"), "[]\n")?;

    let (status, html) = get(site_config(&root)?, "/").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No publications found."));
    Ok(())
}

#[tokio::test]
async fn test_each_view_reloads_the_asset() -> Result<()> {
    let root = TempDir::new()?;
    let public = root.path().join("public");
    std::fs::create_dir_all(&public)?;
    let asset = public.join("publications.json");
    let config = site_config(&root)?;

    std::fs::write(&asset, "[]\n")?;
    let (_, before) = get(config.clone(), "/").await?;
    assert!(before.contains("No publications found."));

    std::fs::write(
        &asset,
        r#"[{"title": "Fresh Result", "authors": ["A Smith", "B Jones"], "venue": "Nature", "year": 2024, "url": null}]"#,
    )?;
    let (_, after) = get(config, "/index.html").await?;
    assert!(after.contains("Fresh Result"));
    assert!(after.contains("A Smith, B Jones — <em>Nature</em> (2024)"));
    assert!(after.contains("href=\"#\""));
    Ok(())
}

#[tokio::test]
async fn test_invalid_asset_renders_failure_message() -> Result<()> {
    let root = TempDir::new()?;
    std::fs::create_dir_all(root.path().join("public"))?;
    std::fs::write(root.path().join("public").join("publications.json"), "not json")?;

    let (status, html) = get(site_config(&root)?, "/").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Failed to load publications."));
    Ok(())
}

#[tokio::test]
async fn test_static_files_are_served() -> Result<()> {
    let root = TempDir::new()?;
    std::fs::create_dir_all(root.path().join("public"))?;
    std::fs::write(root.path().join("public").join("publications.json"), "[]\n")?;

    let (status, body) = get(site_config(&root)?, "/publications.json").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]\n");

    let (status, _) = get(site_config(&root)?, "/missing.png").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_render_static_writes_index() -> Result<()> {
    let root = TempDir::new()?;
    std::fs::create_dir_all(root.path().join("public"))?;
    std::fs::write(root.path().join("public").join("publications.json"), "[]\n")?;

    let written = scholar_sync::app::runner::render_static(&site_config(&root)?).await?;
    assert!(written.ends_with("index.html"));

    let html = std::fs::read_to_string(root.path().join("public").join("index.html"))?;
    assert!(html.contains("No publications found."));
    assert!(html.contains("data-state=\"loaded-empty\""));
    Ok(())
}
