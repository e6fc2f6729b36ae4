//! Custom error types for translation operations

use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Input text was empty or whitespace only
    #[error("{message}")]
    InvalidInput {
        message: String,
    },

    /// Provider credential is missing
    #[error("{message}")]
    ServiceUnavailable {
        message: String,
    },

    /// Every model candidate failed or returned nothing
    #[error("All Gemini models failed. Last error: {last_error}")]
    UpstreamFailure {
        last_error: String,
    },

    /// API request failed
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {message}")]
    RateLimitError {
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
    },

    /// Invalid response from API
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        message: String,
    },

    /// Anything not classified above
    #[error("{0}")]
    InternalError(String),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl TranslationError {
    /// Empty-input rejection
    pub fn empty_input() -> Self {
        TranslationError::InvalidInput {
            message: "Text cannot be empty".to_string(),
        }
    }

    /// Missing-credential rejection
    pub fn missing_credential() -> Self {
        TranslationError::ServiceUnavailable {
            message: "Gemini API Key is not configured".to_string(),
        }
    }

    /// Whether this is one of the kinds surfaced to HTTP clients as-is.
    /// Everything else is folded into `InternalError` at the handler boundary.
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            TranslationError::InvalidInput { .. }
                | TranslationError::ServiceUnavailable { .. }
                | TranslationError::UpstreamFailure { .. }
                | TranslationError::InternalError(_)
        )
    }

    /// True for client mistakes (the 400 class)
    pub fn is_client_error(&self) -> bool {
        matches!(self, TranslationError::InvalidInput { .. })
    }
}

impl From<anyhow::Error> for TranslationError {
    fn from(err: anyhow::Error) -> Self {
        TranslationError::InternalError(err.to_string())
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
