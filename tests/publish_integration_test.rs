use anyhow::Result;
use async_trait::async_trait;
use scholar_sync::domain::ports::ProfileSource;
use scholar_sync::publish::PublishOutcome;
use scholar_sync::sources::SourceError;
use scholar_sync::{run_with_source, AppConfig, RawEntry};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

struct StaticSource(Vec<RawEntry>);

#[async_trait]
impl ProfileSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_profile(&self, _author_id: &str) -> Result<Vec<RawEntry>, SourceError> {
        Ok(self.0.clone())
    }
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(repo: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").arg("-C").arg(repo).args(args).output()?;
    anyhow::ensure!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn config_for(repo: &TempDir) -> Result<AppConfig> {
    let repo_path = repo.path().to_str().unwrap().replace('\\', "/");
    let toml_content = format!(
        r#"
[profile]
author_id = "abc123"

[output]
path = "{repo}/build"

[publish]
repository = "{repo}"
static_dir = "public"
commit_message = "Update publications.json from Google Scholar"
"#,
        repo = repo_path
    );
    Ok(AppConfig::from_toml_str(&toml_content)?)
}

fn source(titles: &[&str]) -> Box<dyn ProfileSource> {
    let entries = titles
        .iter()
        .map(|t| serde_json::from_value(serde_json::json!({"bib": {"title": t}})).unwrap())
        .collect();
    Box::new(StaticSource(entries))
}

/// 第一次 commit，第二次內容相同則不 commit
#[tokio::test]
async fn test_publish_commits_then_reports_no_changes() -> Result<()> {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return Ok(());
    }

    let repo = TempDir::new()?;
    git(repo.path(), &["init", "--quiet"])?;
    let config = config_for(&repo)?;

    let first = run_with_source(&config, source(&["Paper One"])).await?;
    let commit = match first.publish {
        PublishOutcome::Committed(commit) => commit,
        other => anyhow::bail!("expected a commit, got {:?}", other),
    };

    let published = repo.path().join("public").join("publications.json");
    assert!(published.exists());
    assert!(!repo.path().join("build").join("publications.json").exists());
    assert_eq!(git(repo.path(), &["rev-parse", "HEAD"])?, commit);
    assert_eq!(
        git(repo.path(), &["log", "-1", "--format=%an <%ae>|%s"])?,
        "github-actions[bot] <41898282+github-actions[bot]@users.noreply.github.com>|Update publications.json from Google Scholar"
    );

    let second = run_with_source(&config, source(&["Paper One"])).await?;
    assert_eq!(second.publish, PublishOutcome::NoChanges);
    assert_eq!(git(repo.path(), &["rev-parse", "HEAD"])?, commit);

    let third = run_with_source(&config, source(&["Paper One", "Paper Two"])).await?;
    assert!(matches!(third.publish, PublishOutcome::Committed(_)));
    let content = std::fs::read_to_string(&published)?;
    assert!(content.contains("Paper Two"));
    Ok(())
}

#[tokio::test]
async fn test_publish_outside_repository_is_an_error() -> Result<()> {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return Ok(());
    }

    let not_a_repo = TempDir::new()?;
    let config = config_for(&not_a_repo)?;

    let err = run_with_source(&config, source(&["Paper One"]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        scholar_sync::SyncError::PublishError { ref step, .. } if step == "add"
    ));
    Ok(())
}
