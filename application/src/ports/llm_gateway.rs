//! LLM Gateway port
//!
//! Defines the interface for communicating with the upstream LLM provider.

use async_trait::async_trait;
use relay_domain::{StreamEvent, WireMessage};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The provider credential is not available.
    ///
    /// Carries the name of the environment variable that should hold it.
    #[error("{0} is not configured")]
    MissingCredential(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer opens chats with the
/// provider. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Open a new chat session seeded with `history`.
    ///
    /// Every call opens a fresh upstream session; sessions are never reused
    /// across requests.
    async fn create_session(
        &self,
        model: &str,
        history: &[WireMessage],
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// Handle for receiving streaming events from an LLM session.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }
}

/// An active LLM chat session
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the model used by this session
    fn model(&self) -> &str;

    /// Send the newest message and stream the reply.
    ///
    /// Implementations must have received the upstream response status
    /// before returning, so that upstream rejections surface here rather
    /// than inside the stream.
    async fn send_streaming(&self, content: &str) -> Result<StreamHandle, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_message_names_variable() {
        let error = GatewayError::MissingCredential("GOOGLE_GENERATIVE_AI_API_KEY".to_string());
        assert_eq!(
            error.to_string(),
            "GOOGLE_GENERATIVE_AI_API_KEY is not configured"
        );
    }

    #[test]
    fn upstream_status_message_carries_body() {
        let error = GatewayError::UpstreamStatus {
            status: 400,
            body: "bad request".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Upstream returned status 400: bad request"
        );
    }
}
