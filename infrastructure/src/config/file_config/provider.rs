//! Upstream provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Model identifier (default: "gemini-2.0-flash").
    pub model: String,
    /// Environment variable name for the API key
    /// (default: "GOOGLE_GENERATIVE_AI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended; use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the Generative Language API.
    pub base_url: String,
    /// Upper bound on one streamed response, in seconds.
    pub max_duration_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GOOGLE_GENERATIVE_AI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_duration_secs: 30,
        }
    }
}

impl FileProviderConfig {
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }
}
