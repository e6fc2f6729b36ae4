//! Translation request handling: validation, local lookup, model fallback

use std::sync::Arc;
use tracing::{info, warn};

use crate::core::client::GeminiClient;
use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{TranslationOutcome, TranslationSource};
use crate::core::phrases::LocalPhraseTable;
use crate::core::prompt::SYSTEM_INSTRUCTION;
use crate::core::provider::{gemini_candidates, ModelCandidate};

/// Decides whether to answer locally or remotely and walks the candidate list
pub struct TranslationHandler {
    credential_configured: bool,
    instruction: String,
    phrases: LocalPhraseTable,
    candidates: Vec<Arc<dyn ModelCandidate>>,
}

impl std::fmt::Debug for TranslationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationHandler")
            .field("credential_configured", &self.credential_configured)
            .field("phrases", &self.phrases.len())
            .field("candidates", &self.candidate_names())
            .finish()
    }
}

impl TranslationHandler {
    /// Handler with a credential and the given ordered candidates
    pub fn new(candidates: Vec<Arc<dyn ModelCandidate>>) -> Self {
        Self {
            credential_configured: true,
            instruction: SYSTEM_INSTRUCTION.to_string(),
            phrases: LocalPhraseTable::default(),
            candidates,
        }
    }

    /// Handler for a process started without a credential
    pub fn unconfigured() -> Self {
        Self {
            credential_configured: false,
            ..Self::new(Vec::new())
        }
    }

    /// Build from configuration, wiring Gemini candidates when a key is present
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        if !config.has_credential() {
            warn!("GEMINI_API_KEY not found; /translate will report the service as unavailable");
            return Ok(Self::unconfigured());
        }

        let client = Arc::new(GeminiClient::new(config)?);
        Ok(Self::new(gemini_candidates(client, &config.models)))
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn with_phrases(mut self, phrases: LocalPhraseTable) -> Self {
        self.phrases = phrases;
        self
    }

    pub fn credential_configured(&self) -> bool {
        self.credential_configured
    }

    pub fn candidate_names(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn candidates(&self) -> &[Arc<dyn ModelCandidate>] {
        &self.candidates
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Translate one input. Unclassified failures come back as `InternalError`.
    pub async fn translate(&self, text: &str) -> Result<TranslationOutcome> {
        self.resolve(text).await.map_err(|e| {
            if e.is_classified() {
                e
            } else {
                warn!("Final Translation Error: {}", e);
                TranslationError::InternalError(e.to_string())
            }
        })
    }

    async fn resolve(&self, text: &str) -> Result<TranslationOutcome> {
        if text.trim().is_empty() {
            return Err(TranslationError::empty_input());
        }

        if !self.credential_configured {
            return Err(TranslationError::missing_credential());
        }

        if let Some(local) = self.phrases.lookup(text) {
            info!("Quota saved! Local translation: {}", local);
            return Ok(TranslationOutcome {
                translated_text: local.to_string(),
                source: TranslationSource::LocalTable,
            });
        }

        info!("Translating: {}", text);
        self.try_candidates(text).await
    }

    async fn try_candidates(&self, text: &str) -> Result<TranslationOutcome> {
        let mut last_error = String::new();

        for candidate in &self.candidates {
            let name = candidate.name();
            info!(model = name, "Trying model");

            match candidate.generate(text, &self.instruction).await {
                Ok(output) => {
                    let translated = output.trim();
                    if translated.is_empty() {
                        last_error = format!("empty response from {}", name);
                        warn!(model = name, "Empty response");
                        continue;
                    }

                    info!(model = name, "Success: {}", translated);
                    return Ok(TranslationOutcome {
                        translated_text: translated.to_string(),
                        source: TranslationSource::Model(name.to_string()),
                    });
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!(model = name, "Error: {}", last_error);
                }
            }
        }

        if self.candidates.is_empty() {
            last_error = "no model candidates configured".to_string();
        }

        Err(TranslationError::UpstreamFailure { last_error })
    }
}
