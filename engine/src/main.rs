// IT Helpdesk Agent
// Main entry point for the helpdesk binary

use clap::Parser;
use helpdesk_engine::cli::{Cli, Command};
use helpdesk_engine::config::Config;
use helpdesk_engine::handlers::{
    handle_ask, handle_chat, handle_doctor, handle_index, handle_web,
};
use helpdesk_engine::telemetry::init_telemetry_with_level;
use sdk::errors::{EngineError, HelpdeskErrorExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration (or use custom path if provided)
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };
    let mut config = if cli.config.is_some() {
        Config::load_or_default(&config_path)?
    } else {
        Config::load_or_create()?
    };

    if let Some(level) = &cli.log {
        config.set_log_level(level)?;
    }

    // RUST_LOG still takes precedence over both
    init_telemetry_with_level(&config.core.log_level);

    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let timestamp = env!("BUILD_TIMESTAMP");

    tracing::info!("IT Helpdesk v{} ({} - {})", version, commit, timestamp);
    if !config_path.exists() {
        tracing::warn!(
            "Config file {} not found, using defaults",
            config_path.display()
        );
    }

    let result = match cli.command() {
        Command::Chat => handle_chat(&config).await,
        Command::Web { host, port } => handle_web(&config, host, port).await,
        Command::Ask { question } => handle_ask(&config, &question.join(" ")).await,
        Command::Index { rebuild } => handle_index(&config, rebuild).await,
        Command::Doctor => handle_doctor(&config, &config_path).await,
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
        if let Some(engine_error) = e.downcast_ref::<EngineError>() {
            eprintln!("Hint: {}", engine_error.user_hint());
        }
    }

    result
}
