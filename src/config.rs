//! Configuration management for pulsedeck
//!
//! This module handles loading, parsing, and validating the client
//! configuration from a YAML file and environment variable overrides.
//! Credentials (`client_id`, `client_secret`, `redirect_uri`) must be
//! present at startup; their absence is a fatal condition surfaced by
//! [`ClientConfig::validate`].

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Default base URL of the provider's OAuth2 server.
fn default_auth_base() -> String {
    "https://api.prod.whoop.com".to_string()
}

/// Default base URL of the provider's data API.
fn default_api_base() -> String {
    "https://api.prod.whoop.com".to_string()
}

fn default_scopes() -> BTreeSet<String> {
    ["read:recovery", "read:cycles", "read:profile"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_timeout_seconds() -> u64 {
    15
}

/// Immutable client configuration, loaded once at process start.
///
/// Holds the OAuth2 client credentials, the provider endpoints, and the
/// requested scope set. Never mutated after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// OAuth2 client identifier issued by the provider
    #[serde(default)]
    pub client_id: String,

    /// OAuth2 client secret issued by the provider
    #[serde(default)]
    pub client_secret: String,

    /// Redirect URI registered with the provider
    #[serde(default)]
    pub redirect_uri: String,

    /// Base URL of the OAuth2 server; authorization and token endpoints
    /// hang off `{auth_base}/oauth/oauth2/`
    #[serde(default = "default_auth_base")]
    pub auth_base: String,

    /// Base URL of the data API (`{api_base}/developer/...`)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// OAuth2 scopes to request, space-joined into the authorization link.
    /// A `BTreeSet` keeps the rendered scope string stable across runs.
    #[serde(default = "default_scopes")]
    pub scopes: BTreeSet<String>,

    /// Request timeout applied to every outbound HTTP call, in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            auth_base: default_auth_base(),
            api_base: default_api_base(),
            scopes: default_scopes(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a YAML file, then applies environment
    /// variable overrides.
    ///
    /// A missing file is not an error: credentials are commonly supplied
    /// entirely through the environment. A file that exists but does not
    /// parse is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&contents)?
        } else {
            tracing::debug!("config file {} not found, using defaults", path.display());
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Applies `PULSEDECK_*` environment variable overrides.
    ///
    /// Environment values take priority over the file so that secrets can
    /// be injected by the deployment environment without touching disk.
    fn apply_env_overrides(&mut self) {
        if let Ok(client_id) = std::env::var("PULSEDECK_CLIENT_ID") {
            self.client_id = client_id;
        }
        if let Ok(client_secret) = std::env::var("PULSEDECK_CLIENT_SECRET") {
            self.client_secret = client_secret;
        }
        if let Ok(redirect_uri) = std::env::var("PULSEDECK_REDIRECT_URI") {
            self.redirect_uri = redirect_uri;
        }
        if let Ok(auth_base) = std::env::var("PULSEDECK_AUTH_BASE") {
            self.auth_base = auth_base;
        }
        if let Ok(api_base) = std::env::var("PULSEDECK_API_BASE") {
            self.api_base = api_base;
        }
        if let Ok(timeout) = std::env::var("PULSEDECK_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.timeout_seconds = secs,
                Err(_) => tracing::warn!("ignoring invalid PULSEDECK_TIMEOUT_SECONDS: {timeout}"),
            }
        }
    }

    /// Validates that the mandatory credential fields are present.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing field. The caller treats
    /// this as fatal and halts the process.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() {
            anyhow::bail!("missing client_id: set it in the config file or PULSEDECK_CLIENT_ID");
        }
        if self.client_secret.is_empty() {
            anyhow::bail!(
                "missing client_secret: set it in the config file or PULSEDECK_CLIENT_SECRET"
            );
        }
        if self.redirect_uri.is_empty() {
            anyhow::bail!(
                "missing redirect_uri: set it in the config file or PULSEDECK_REDIRECT_URI"
            );
        }
        if self.timeout_seconds == 0 {
            anyhow::bail!("timeout_seconds must be greater than zero");
        }
        Ok(())
    }

    /// Full URL of the provider's authorization endpoint.
    pub fn authorization_endpoint(&self) -> String {
        format!("{}/oauth/oauth2/auth", self.auth_base.trim_end_matches('/'))
    }

    /// Full URL of the provider's token endpoint.
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/oauth/oauth2/token",
            self.auth_base.trim_end_matches('/')
        )
    }

    /// Space-joined scope string in stable order.
    pub fn scope_string(&self) -> String {
        self.scopes.iter().cloned().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn complete_config() -> ClientConfig {
        ClientConfig {
            client_id: "client-abc".to_string(),
            client_secret: "secret-xyz".to_string(),
            redirect_uri: "https://dash.example.com/callback".to_string(),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_client_id() {
        let config = ClientConfig {
            client_id: String::new(),
            ..complete_config()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_validate_rejects_missing_client_secret() {
        let config = ClientConfig {
            client_secret: String::new(),
            ..complete_config()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("client_secret"));
    }

    #[test]
    fn test_validate_rejects_missing_redirect_uri() {
        let config = ClientConfig {
            redirect_uri: String::new(),
            ..complete_config()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("redirect_uri"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ClientConfig {
            timeout_seconds: 0,
            ..complete_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoints_built_from_auth_base() {
        let config = complete_config();
        assert_eq!(
            config.authorization_endpoint(),
            "https://api.prod.whoop.com/oauth/oauth2/auth"
        );
        assert_eq!(
            config.token_endpoint(),
            "https://api.prod.whoop.com/oauth/oauth2/token"
        );
    }

    #[test]
    fn test_endpoints_tolerate_trailing_slash() {
        let config = ClientConfig {
            auth_base: "https://auth.example.com/".to_string(),
            ..complete_config()
        };
        assert_eq!(
            config.authorization_endpoint(),
            "https://auth.example.com/oauth/oauth2/auth"
        );
    }

    #[test]
    fn test_scope_string_is_stable_and_space_joined() {
        let config = complete_config();
        let scopes = config.scope_string();
        assert_eq!(scopes, "read:cycles read:profile read:recovery");
        // Stable across calls.
        assert_eq!(scopes, config.scope_string());
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let config = ClientConfig::load("definitely/not/a/real/config.yaml").unwrap();
        assert_eq!(config.auth_base, "https://api.prod.whoop.com");
        assert_eq!(config.timeout_seconds, 15);
    }

    #[test]
    fn test_load_parses_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "client_id: from-file\nclient_secret: s\nredirect_uri: https://x/cb\ntimeout_seconds: 5"
        )
        .unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.client_id, "from-file");
        assert_eq!(config.timeout_seconds, 5);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.api_base, "https://api.prod.whoop.com");
    }

    #[test]
    fn test_load_rejects_malformed_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "client_id: [unclosed").unwrap();
        assert!(ClientConfig::load(file.path()).is_err());
    }
}
