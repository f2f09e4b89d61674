use crate::config::toml_config::AppConfig;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "scholar-sync")]
#[command(about = "Refresh publications.json from Google Scholar and render the profile page")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = "scholar-sync.toml")]
    pub config: String,

    /// Override [profile] author_id
    #[arg(long, global = true)]
    pub author_id: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch, normalize and write publications once, then publish
    Run {
        /// Write the file but do not move or commit it
        #[arg(long)]
        skip_publish: bool,
    },
    /// Run every week at the configured weekday and time (UTC)
    Schedule {
        /// Also run once immediately
        #[arg(long)]
        now: bool,
    },
    /// Pre-render index.html into the static directory
    Render,
    /// Serve the profile page, loading publications on every view
    Serve {
        /// Override [site] bind
        #[arg(long)]
        bind: Option<String>,
    },
    /// Validate configuration and show what a run would do
    Check,
}

impl Cli {
    /// 命令列覆蓋設定
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(author_id) = &self.author_id {
            tracing::info!("🔧 author_id overridden to: {}", author_id);
            config.profile.author_id = author_id.clone();
        }
        if let Command::Run { skip_publish: true } = self.command {
            config.publish.enabled = false;
        }
        if let Command::Serve { bind: Some(bind) } = &self.command {
            config.site.bind = bind.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::parse_from([
            "scholar-sync",
            "--config",
            "site.toml",
            "run",
            "--skip-publish",
            "--author-id",
            "xyz",
        ]);
        assert_eq!(cli.config, "site.toml");
        assert!(matches!(cli.command, Command::Run { skip_publish: true }));

        let mut config = AppConfig::from_toml_str("[profile]\nauthor_id = \"abc\"\n").unwrap();
        cli.apply_overrides(&mut config);
        assert_eq!(config.profile.author_id, "xyz");
        assert!(!config.publish.enabled);
    }

    #[test]
    fn test_parse_serve_bind() {
        let cli = Cli::parse_from(["scholar-sync", "serve", "--bind", "0.0.0.0:3000"]);
        let mut config = AppConfig::from_toml_str("[profile]\nauthor_id = \"abc\"\n").unwrap();
        cli.apply_overrides(&mut config);
        assert_eq!(config.site.bind, "0.0.0.0:3000");
        assert_eq!(cli.log_format, LogFormat::Compact);
    }
}
