//! Brix Translator - Singlish to English translation service
//!
//! Answers a few common phrases locally and sends everything else to Gemini,
//! falling back across an ordered list of model names.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use crate::core::{
    client::GeminiClient,
    config::ServiceConfig,
    errors::TranslationError,
    handler::TranslationHandler,
    models::{TranslationOutcome, TranslationRequest, TranslationResponse, TranslationSource},
    phrases::LocalPhraseTable,
    provider::{GeminiModel, ModelCandidate},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
