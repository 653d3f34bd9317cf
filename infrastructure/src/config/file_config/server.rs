//! Relay server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Address to bind (default: "127.0.0.1").
    pub host: String,
    /// Port to bind (default: 3000).
    pub port: u16,
    /// Environment variable holding the bearer token clients must send.
    pub auth_token_env: Option<String>,
    /// Bearer token inline (prefer `auth_token_env`).
    pub auth_token: Option<String>,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            auth_token_env: None,
            auth_token: None,
        }
    }
}

impl FileServerConfig {
    /// `host:port`, ready for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Token required on the chat endpoint, if auth is enabled.
    pub fn resolve_auth_token(&self) -> Option<String> {
        match (&self.auth_token, &self.auth_token_env) {
            (Some(token), _) if !token.is_empty() => Some(token.clone()),
            (_, Some(env)) => super::resolve_secret(None, env),
            _ => None,
        }
    }
}
