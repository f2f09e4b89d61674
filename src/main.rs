use clap::Parser;
use scholar_sync::app::runner::{render_static, run_once, RunSummary};
use scholar_sync::app::schedule::{run_weekly, WeeklyTrigger};
use scholar_sync::config::{AppConfig, Cli, Command, LogFormat};
use scholar_sync::publish::PublishOutcome;
use scholar_sync::utils::error::{ErrorSeverity, SyncError};
use scholar_sync::utils::{logger, validation::Validate};
use scholar_sync::{server, Result};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("🚀 Starting scholar-sync {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("📁 Loading configuration from: {}", cli.config);

    let mut config = match AppConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = match cli.command {
        Command::Run { .. } => run_once(&config).await.map(|summary| print_summary(&summary)),
        Command::Schedule { now } => schedule(config, now).await,
        Command::Render => render_static(&config).await.map(|path| {
            println!("🖨️ Rendered {}", path);
        }),
        Command::Serve { .. } => server::serve(config).await,
        Command::Check => {
            display_config_summary(&config);
            Ok(())
        }
    };

    if let Err(e) = result {
        exit_with(e);
    }

    Ok(())
}

async fn schedule(config: AppConfig, now: bool) -> Result<()> {
    let trigger = WeeklyTrigger::from_config(&config.schedule)?;

    if now {
        print_summary(&run_once(&config).await?);
    }

    let config = &config;
    run_weekly(trigger, move || async move {
        let summary = run_once(config).await?;
        print_summary(&summary);
        Ok(())
    })
    .await
}

fn print_summary(summary: &RunSummary) {
    let report = &summary.report;
    if let Some(error) = &report.fetch_error {
        println!("⚠️ Error fetching: {}", error);
    }
    println!("✅ Wrote {} publications", report.publications);
    println!("📁 Output saved to: {}", report.output_path);

    match &summary.publish {
        PublishOutcome::Committed(commit) => println!("📦 Committed {}", commit),
        PublishOutcome::NoChanges => println!("📦 No changes"),
        PublishOutcome::Skipped => println!("📦 Publish skipped"),
    }
}

fn exit_with(e: SyncError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ scholar-sync failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn display_config_summary(config: &AppConfig) {
    println!("📋 Configuration Summary:");
    println!("  Author: {}", config.profile.author_id);
    println!("  Source: {:?} ({})", config.source.kind, config.source.base_url);
    if let Some(endpoint) = &config.source.endpoint {
        println!("  Endpoint: {}", endpoint);
    }
    println!(
        "  Detail lookups: {} (on failure: {:?})",
        config.source.fetch_details, config.source.on_detail_failure
    );
    match config.source.timeout_seconds {
        Some(timeout) => println!("  Timeout: {}s", timeout),
        None => println!("  Timeout: none"),
    }
    println!("  Output: {}", config.output_file().display());

    if config.publish.enabled {
        println!("  Publish to: {}", config.published_file().display());
        println!(
            "  Commit as: {} <{}>",
            config.publish.author_name, config.publish.author_email
        );
        println!("  Push: {}", config.publish.push);
    } else {
        println!("  Publish: disabled");
    }

    println!(
        "  Schedule: every {} at {:02}:{:02} UTC",
        config.schedule.weekday, config.schedule.hour, config.schedule.minute
    );
    println!("  Page asset: {}", config.site.publications_path);
    println!("  Serve on: {}", config.site.bind);
    println!();
    println!("✅ Configuration is valid.");
}
