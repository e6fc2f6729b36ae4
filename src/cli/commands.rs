//! CLI command definitions and handlers

use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::info;

use crate::core::client::{model_id, GeminiClient};
use crate::core::config::ServiceConfig;
use crate::core::handler::TranslationHandler;
use crate::core::models::ProbeResult;
use crate::core::provider::ModelCandidate;

/// Commands for the Brix translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP API server
    Server {
        /// Bind address (default: from config, 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (default: from config, 8000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug mode
        #[arg(long)]
        debug: bool,
    },

    /// Translate a single piece of text and print the result
    Translate {
        /// Singlish text
        text: String,
    },

    /// List remote models that support generateContent
    Models,

    /// Try every configured model once and report which ones answer
    Probe {
        /// Text sent to each model
        #[arg(short, long, default_value = "amma")]
        text: String,
    },

    /// Print the effective configuration
    Config,
}

/// Handle server command
pub async fn handle_server(
    mut config: ServiceConfig,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    use crate::server::api::run_server;

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    info!("Starting HTTP server on {}:{}", config.host, config.port);
    println!("🚀 Server starting on http://{}:{}", config.host, config.port);
    println!("📄 OpenAPI document: http://{}:{}/openapi.json", config.host, config.port);

    run_server(config).await
}

/// Handle translate command
pub async fn handle_translate(config: ServiceConfig, text: String) -> anyhow::Result<()> {
    let handler = TranslationHandler::from_config(&config)?;
    let start_time = Instant::now();

    let outcome = handler.translate(&text).await?;

    println!("{}", outcome.translated_text);
    info!(
        "Translated via {} in {:?}",
        outcome.source,
        start_time.elapsed()
    );

    Ok(())
}

/// Handle models command
pub async fn handle_models(config: ServiceConfig) -> anyhow::Result<()> {
    let client = GeminiClient::new(&config)?;
    let models = client.list_models().await?;

    println!("Available models:");
    for model in models.iter().filter(|m| m.supports_generate_content()) {
        match &model.display_name {
            Some(display) => println!("- {} ({})", model_id(&model.name), display),
            None => println!("- {}", model_id(&model.name)),
        }
    }

    Ok(())
}

/// Handle probe command
pub async fn handle_probe(config: ServiceConfig, text: String) -> anyhow::Result<()> {
    let handler = TranslationHandler::from_config(&config)?;
    if !handler.credential_configured() {
        anyhow::bail!("GEMINI_API_KEY not found");
    }

    let candidates = handler.candidates();
    if candidates.is_empty() {
        anyhow::bail!("No models configured");
    }

    let pb = ProgressBar::new(candidates.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        pb.set_message(format!("Trying: {}", candidate.name()));
        results.push(probe_candidate(candidate.as_ref(), &text, handler.instruction()).await);
        pb.inc(1);
    }

    pb.finish_with_message("Completed");

    let working = results.iter().filter(|r| r.success).count();
    println!("\nProbe results for '{}':", text);
    for result in &results {
        println!("   {}", result);
    }
    println!("\n✅ {}/{} models answered", working, results.len());

    Ok(())
}

/// Run one candidate without any fallback and record what happened
pub async fn probe_candidate(
    candidate: &dyn ModelCandidate,
    text: &str,
    instruction: &str,
) -> ProbeResult {
    let start_time = Instant::now();
    let (success, output) = match candidate.generate(text, instruction).await {
        Ok(output) if !output.trim().is_empty() => (true, output.trim().to_string()),
        Ok(_) => (false, "empty response".to_string()),
        Err(e) => (false, e.to_string()),
    };

    ProbeResult {
        model: candidate.name().to_string(),
        success,
        output,
        latency_ms: start_time.elapsed().as_millis(),
        checked_at: chrono::Utc::now(),
    }
}

/// Handle config command
pub fn handle_config(config: &ServiceConfig) -> anyhow::Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::handler::tests::StubCandidate;

    #[tokio::test]
    async fn test_probe_candidate_success() {
        let stub = StubCandidate::ok("gemini-2.0-flash", " Mother \n");
        let result = probe_candidate(stub.as_ref(), "amma", "instruction").await;

        assert!(result.success);
        assert_eq!(result.model, "gemini-2.0-flash");
        assert_eq!(result.output, "Mother");
        assert!(result.to_string().starts_with("SUCCESS gemini-2.0-flash"));
    }

    #[tokio::test]
    async fn test_probe_candidate_failure() {
        let stub = StubCandidate::failing("gemini-1.5-pro", "model not found");
        let result = probe_candidate(stub.as_ref(), "amma", "instruction").await;

        assert!(!result.success);
        assert!(result.output.contains("model not found"));
        assert!(result.to_string().starts_with("FAILED gemini-1.5-pro"));
    }

    #[tokio::test]
    async fn test_translate_command_without_key_fails() {
        let result = handle_translate(ServiceConfig::default(), "oya kohomada".to_string()).await;
        assert!(result.is_err());
    }
}
