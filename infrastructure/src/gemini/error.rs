//! Error types for the Gemini adapter

use relay_application::GatewayError;
use thiserror::Error;

/// Result type alias for Gemini operations
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors that can occur when talking to the Generative Language API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Gemini returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Gemini API error (code {code}): {message}")]
    Api { code: i64, message: String },
}

impl From<GeminiError> for GatewayError {
    fn from(error: GeminiError) -> Self {
        match error {
            GeminiError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            GeminiError::Http(e) if e.is_connect() => GatewayError::ConnectionError(e.to_string()),
            GeminiError::Status { status, body } => GatewayError::UpstreamStatus { status, body },
            other => GatewayError::RequestFailed(other.to_string()),
        }
    }
}
