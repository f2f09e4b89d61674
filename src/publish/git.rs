use crate::config::toml_config::PublishConfig;
use crate::utils::error::{Result, SyncError};
use std::path::{Path, PathBuf};
use tokio::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Committed the refreshed file; carries the new commit id.
    Committed(String),
    /// The file matches what is already committed.
    NoChanges,
    /// Publishing is disabled for this run.
    Skipped,
}

/// Moves the produced file into the static dir and commits it as the bot identity.
pub struct GitPublisher {
    repository: PathBuf,
    static_dir: PathBuf,
    commit_message: String,
    author_name: String,
    author_email: String,
    push: bool,
}

impl GitPublisher {
    pub fn new(config: &PublishConfig) -> Self {
        Self {
            repository: PathBuf::from(&config.repository),
            static_dir: PathBuf::from(&config.static_dir),
            commit_message: config.commit_message.clone(),
            author_name: config.author_name.clone(),
            author_email: config.author_email.clone(),
            push: config.push,
        }
    }

    pub async fn publish(&self, produced: &Path) -> Result<PublishOutcome> {
        let file_name = produced.file_name().ok_or_else(|| SyncError::PublishError {
            step: "relocate".to_string(),
            message: format!("{} has no file name", produced.display()),
        })?;
        let relative = self.static_dir.join(file_name);
        let destination = self.repository.join(&relative);

        relocate(produced, &destination).await?;
        tracing::info!("📦 Moved {} to {}", produced.display(), destination.display());

        let relative = relative.to_string_lossy().to_string();
        self.git("add", &["add", "--", &relative]).await?;

        let staged = Command::new("git")
            .arg("-C")
            .arg(&self.repository)
            .args(["diff", "--cached", "--quiet", "--", &relative])
            .status()
            .await
            .map_err(|e| publish_error("diff", e.to_string()))?;

        if staged.success() {
            tracing::info!("No changes to {}, nothing to commit", relative);
            return Ok(PublishOutcome::NoChanges);
        }

        let name = format!("user.name={}", self.author_name);
        let email = format!("user.email={}", self.author_email);
        self.git(
            "commit",
            &["-c", &name, "-c", &email, "commit", "-m", &self.commit_message, "--", &relative],
        )
        .await?;
        let commit = self.git("rev-parse", &["rev-parse", "HEAD"]).await?;
        tracing::info!("✅ Committed {} as {}", relative, commit);

        if self.push {
            self.git("push", &["push"]).await?;
            tracing::info!("🚀 Pushed {}", commit);
        }

        Ok(PublishOutcome::Committed(commit))
    }

    async fn git(&self, step: &str, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repository)
            .args(args)
            .output()
            .await
            .map_err(|e| publish_error(step, e.to_string()))?;

        if !output.status.success() {
            return Err(publish_error(
                step,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn publish_error(step: &str, message: String) -> SyncError {
    SyncError::PublishError {
        step: step.to_string(),
        message,
    }
}

/// Rename into place, copying when source and destination are on different devices.
async fn relocate(from: &Path, to: &Path) -> Result<()> {
    if from == to {
        return Ok(());
    }
    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    if tokio::fs::rename(from, to).await.is_err() {
        tokio::fs::copy(from, to).await?;
        tokio::fs::remove_file(from).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_relocate_moves_file() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("publications.json");
        let to = dir.path().join("public").join("publications.json");
        std::fs::write(&from, "[]\n").unwrap();

        relocate(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read_to_string(&to).unwrap(), "[]\n");
    }

    #[tokio::test]
    async fn test_relocate_same_path_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("publications.json");
        std::fs::write(&path, "[]\n").unwrap();

        relocate(&path, &path).await.unwrap();
        assert!(path.exists());
    }
}
