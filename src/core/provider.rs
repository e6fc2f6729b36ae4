//! Model candidate abstraction used by the fallback loop

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::client::GeminiClient;
use crate::core::errors::Result;

/// A remote model that can turn input text into a completion
#[async_trait]
pub trait ModelCandidate: Send + Sync {
    /// Identifier used in logs and diagnostics
    fn name(&self) -> &str;

    /// Generate a completion for `text` under `instruction`
    async fn generate(&self, text: &str, instruction: &str) -> Result<String>;
}

/// One Gemini model name bound to a shared client
#[derive(Debug, Clone)]
pub struct GeminiModel {
    client: Arc<GeminiClient>,
    model: String,
}

impl GeminiModel {
    pub fn new(client: Arc<GeminiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ModelCandidate for GeminiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, text: &str, instruction: &str) -> Result<String> {
        self.client
            .generate_content(&self.model, text, instruction)
            .await
    }
}

/// Build the ordered candidate list for the given model names
pub fn gemini_candidates(
    client: Arc<GeminiClient>,
    models: &[String],
) -> Vec<Arc<dyn ModelCandidate>> {
    models
        .iter()
        .map(|m| Arc::new(GeminiModel::new(client.clone(), m.as_str())) as Arc<dyn ModelCandidate>)
        .collect()
}
