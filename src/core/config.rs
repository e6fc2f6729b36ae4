//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

const DEFAULT_API_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model candidates, tried in this order
const DEFAULT_MODELS: &[&str] = &["gemini-flash-latest", "gemini-2.0-flash", "gemini-pro-latest"];

/// Service configuration, built once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub api_endpoint: String,
    pub models: Vec<String>,
    pub timeout_ms: u64,
    pub host: String,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            timeout_ms: 30000,
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServiceConfig {
    /// Load configuration: defaults, then the optional file (YAML, TOML or
    /// JSON by extension), then `BRIX_*` variables, then the provider
    /// variables (`GEMINI_*`). `BRIX_MODELS` is a comma-separated list.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("api_endpoint", defaults.api_endpoint)?
            .set_default("models", defaults.models)?
            .set_default("timeout_ms", defaults.timeout_ms as i64)?
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port as i64)?;

        if let Some(path) = path {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let mut config: Self = builder
            .add_source(
                config::Environment::with_prefix("BRIX")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("models"),
            )
            .build()?
            .try_deserialize()?;

        config.apply_provider_env();
        config.validate()?;

        Ok(config)
    }

    fn apply_provider_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.api_key = Some(key);
        }

        if let Ok(endpoint) = std::env::var("GEMINI_API_ENDPOINT") {
            self.api_endpoint = endpoint;
        }

        if let Ok(models) = std::env::var("GEMINI_MODELS") {
            self.models = parse_model_list(&models);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_endpoint.is_empty() {
            return Err(anyhow::anyhow!("API endpoint is required"));
        }

        if self.models.iter().any(|m| m.trim().is_empty()) {
            return Err(anyhow::anyhow!("Model names cannot be empty"));
        }

        if self.models.is_empty() {
            warn!("No models configured");
        }

        if self.timeout_ms == 0 {
            return Err(anyhow::anyhow!("timeout_ms must be greater than 0"));
        }

        Ok(())
    }

    /// A blank key counts as missing
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }

    /// Copy safe to print or serve
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.has_credential() {
            copy.api_key = Some("***".to_string());
        }
        copy
    }

    /// Render as YAML with the key redacted
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(&self.redacted())?)
    }
}

fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}
