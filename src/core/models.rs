//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Translation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranslationRequest {
    /// Singlish text to translate
    #[schema(example = "oya kohomada adha")]
    pub text: String,
}

/// Translation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TranslationResponse {
    /// English translation
    #[schema(example = "How are you today?")]
    pub translated_text: String,
}

/// Where a translation came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslationSource {
    /// Local phrase table, no remote call was made
    LocalTable,
    /// Remote model with the given name
    Model(String),
}

impl fmt::Display for TranslationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationSource::LocalTable => write!(f, "local"),
            TranslationSource::Model(name) => write!(f, "{}", name),
        }
    }
}

/// Translation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub translated_text: String,
    pub source: TranslationSource,
}

impl From<TranslationOutcome> for TranslationResponse {
    fn from(outcome: TranslationOutcome) -> Self {
        Self {
            translated_text: outcome.translated_text,
        }
    }
}

/// Model entry from the provider's listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteModel {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl RemoteModel {
    /// Check if the model can serve `generateContent` calls
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

/// Result of probing one model candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub model: String,
    pub success: bool,
    pub output: String,
    pub latency_ms: u128,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "SUCCESS" } else { "FAILED" };
        write!(
            f,
            "{} {} ({} ms): {}",
            status, self.model, self.latency_ms, self.output
        )
    }
}
