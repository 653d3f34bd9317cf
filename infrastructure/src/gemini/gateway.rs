//! Gemini LLM Gateway implementation

use crate::config::FileProviderConfig;
use crate::gemini::protocol::{Content, curated_history};
use crate::gemini::session::GeminiSession;
use async_trait::async_trait;
use relay_application::{GatewayError, LlmGateway, LlmSession};
use relay_domain::WireMessage;
use tracing::{debug, info};

/// Connection settings for the Generative Language API
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Inline API key; takes precedence over `api_key_env`.
    pub api_key: Option<String>,
}

impl From<&FileProviderConfig> for GeminiSettings {
    fn from(config: &FileProviderConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key_env: config.api_key_env.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

/// LLM Gateway implementation for Google Gemini
///
/// The API key is resolved on every [`create_session`](LlmGateway::create_session)
/// call, so a relay can start without it and pick it up later.
pub struct GeminiLlmGateway {
    client: reqwest::Client,
    settings: GeminiSettings,
}

impl GeminiLlmGateway {
    pub fn new(settings: GeminiSettings) -> Self {
        info!("GeminiLlmGateway initialized ({})", settings.base_url);
        Self::with_client(reqwest::Client::new(), settings)
    }

    /// Create a gateway with an existing HTTP client
    pub fn with_client(client: reqwest::Client, settings: GeminiSettings) -> Self {
        Self { client, settings }
    }

    fn api_key(&self) -> Result<String, GatewayError> {
        if let Some(key) = &self.settings.api_key
            && !key.is_empty()
        {
            return Ok(key.clone());
        }
        std::env::var(&self.settings.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| GatewayError::MissingCredential(self.settings.api_key_env.clone()))
    }
}

#[async_trait]
impl LlmGateway for GeminiLlmGateway {
    async fn create_session(
        &self,
        model: &str,
        history: &[WireMessage],
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        let api_key = self.api_key()?;
        let history: Vec<Content> = curated_history(history);
        debug!(
            "Creating Gemini session for {} with {} history messages",
            model,
            history.len()
        );

        Ok(Box::new(GeminiSession::new(
            self.client.clone(),
            &self.settings.base_url,
            api_key,
            model,
            history,
        )))
    }
}
