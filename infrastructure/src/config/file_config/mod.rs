//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every field has a default, so an empty file is a valid configuration.

mod client;
mod provider;
mod server;

pub use client::FileClientConfig;
pub use provider::FileProviderConfig;
pub use server::FileServerConfig;

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Relay server settings
    pub server: FileServerConfig,
    /// Upstream provider settings
    pub provider: FileProviderConfig,
    /// Chat client settings
    pub client: FileClientConfig,
}

/// Problem found while validating a loaded configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl FileConfig {
    /// Validate the configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.provider.model.trim().is_empty() {
            issues.push(ConfigIssue {
                field: "provider.model",
                message: "model name is empty".to_string(),
            });
        }
        if self.provider.max_duration_secs == 0 {
            issues.push(ConfigIssue {
                field: "provider.max_duration_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        if !self.client.relay_url.starts_with("http://")
            && !self.client.relay_url.starts_with("https://")
        {
            issues.push(ConfigIssue {
                field: "client.relay_url",
                message: format!("'{}' is not an http(s) URL", self.client.relay_url),
            });
        }

        issues
    }
}

/// Resolve a secret: an inline value wins, otherwise read the named env var.
///
/// Empty values count as missing.
pub(crate) fn resolve_secret(inline: Option<&str>, env_name: &str) -> Option<String> {
    if let Some(value) = inline
        && !value.is_empty()
    {
        return Some(value.to_string());
    }
    std::env::var(env_name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
host = "0.0.0.0"
port = 8080
auth_token_env = "RELAY_TOKEN"

[provider]
model = "gemini-1.5-pro"
api_key_env = "MY_GEMINI_KEY"
max_duration_secs = 60

[client]
relay_url = "http://relay.internal:8080"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.auth_token_env.as_deref(), Some("RELAY_TOKEN"));
        assert_eq!(config.provider.model, "gemini-1.5-pro");
        assert_eq!(config.provider.api_key_env, "MY_GEMINI_KEY");
        assert_eq!(config.provider.max_duration_secs, 60);
        assert_eq!(config.client.relay_url, "http://relay.internal:8080");
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[server]
port = 4000
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 4000);
        // Defaults should apply
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.provider.model, "gemini-2.0-flash");
        assert_eq!(config.provider.api_key_env, "GOOGLE_GENERATIVE_AI_API_KEY");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = FileConfig::default();
        config.provider.model = " ".to_string();
        config.provider.max_duration_secs = 0;
        config.client.relay_url = "localhost:3000".to_string();

        let fields: Vec<_> = config.validate().iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            vec![
                "provider.model",
                "provider.max_duration_secs",
                "client.relay_url"
            ]
        );
    }

    #[test]
    fn test_inline_secret_wins() {
        assert_eq!(
            resolve_secret(Some("inline"), "CHAT_RELAY_TEST_UNSET_VAR"),
            Some("inline".to_string())
        );
        assert_eq!(resolve_secret(Some(""), "CHAT_RELAY_TEST_UNSET_VAR"), None);
        assert_eq!(resolve_secret(None, "CHAT_RELAY_TEST_UNSET_VAR"), None);
    }
}
