//! Chat client configuration from TOML (`[client]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileClientConfig {
    /// Base URL of the relay (default: "http://127.0.0.1:3000").
    pub relay_url: String,
    /// Environment variable holding the bearer token sent to the relay.
    pub auth_token_env: Option<String>,
    /// Bearer token inline.
    pub auth_token: Option<String>,
}

impl Default for FileClientConfig {
    fn default() -> Self {
        Self {
            relay_url: "http://127.0.0.1:3000".to_string(),
            auth_token_env: None,
            auth_token: None,
        }
    }
}

impl FileClientConfig {
    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.relay_url.trim_end_matches('/'))
    }

    pub fn resolve_auth_token(&self) -> Option<String> {
        match (&self.auth_token, &self.auth_token_env) {
            (Some(token), _) if !token.is_empty() => Some(token.clone()),
            (_, Some(env)) => super::resolve_secret(None, env),
            _ => None,
        }
    }
}
