//! Main entry point for the Brix translator service

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brix_translator::cli::commands::{self, Commands};
use brix_translator::ServiceConfig;

/// Brix Keyboard AI translation service
#[derive(Parser, Debug)]
#[command(name = "brix-translator", version, about, long_about = None)]
struct Args {
    /// API key for Gemini (optional, defaults to GEMINI_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Configuration file (YAML, TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let debug = args.verbose || matches!(args.command, Some(Commands::Server { debug: true, .. }));
    let log_level = if debug { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("brix_translator={},tower_http={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = ServiceConfig::load(args.config.as_deref())?;

    // Override config with CLI args if provided
    if let Some(api_key) = args.api_key {
        config.api_key = Some(api_key);
    }

    match args.command {
        Some(Commands::Server { host, port, .. }) => {
            commands::handle_server(config, host, port).await?;
        }
        Some(Commands::Translate { text }) => {
            commands::handle_translate(config, text).await?;
        }
        Some(Commands::Models) => {
            commands::handle_models(config).await?;
        }
        Some(Commands::Probe { text }) => {
            commands::handle_probe(config, text).await?;
        }
        Some(Commands::Config) => {
            commands::handle_config(&config)?;
        }
        None => {
            commands::handle_server(config, None, None).await?;
        }
    }

    Ok(())
}
