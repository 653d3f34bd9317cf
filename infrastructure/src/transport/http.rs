//! HTTP relay transport (reqwest).

use crate::config::FileClientConfig;
use async_trait::async_trait;
use futures::StreamExt;
use relay_application::{ByteStream, RelayTransport, TransportError};
use relay_domain::ChatRequest;
use tracing::{debug, warn};

/// Posts chat requests to a relay's `/api/chat` endpoint
pub struct HttpRelayTransport {
    client: reqwest::Client,
    chat_url: String,
    auth_token: Option<String>,
}

impl HttpRelayTransport {
    pub fn new(chat_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            chat_url: chat_url.into(),
            auth_token: None,
        }
    }

    pub fn from_config(config: &FileClientConfig) -> Self {
        let transport = Self::new(config.chat_url());
        match config.resolve_auth_token() {
            Some(token) => transport.with_auth_token(token),
            None => transport,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn open(&self, request: &ChatRequest) -> Result<ByteStream, TransportError> {
        debug!(
            "POST {} ({} messages)",
            self.chat_url,
            request.messages.len()
        );

        let mut builder = self.client.post(&self.chat_url).json(request);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Relay answered {}: {}", status, body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| TransportError::Stream(e.to_string())))
            .boxed())
    }
}
