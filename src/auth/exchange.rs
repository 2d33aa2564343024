//! Authorization-code exchange against the provider token endpoint
//!
//! POSTs the form-encoded exchange request and maps every failure path to
//! a distinct [`AuthError`] kind. The exchanger performs no retries and no
//! state validation; retry policy and the state check belong to the caller
//! (see [`crate::flow`]).

use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::session::AccessToken;
use crate::config::ClientConfig;
use crate::error::{AuthError, Result};

/// Raw JSON response from the token endpoint.
///
/// Only `access_token` is consumed; the remaining fields the provider
/// returns (`expires_in`, `refresh_token`, `scope`) are outside the
/// session model and are ignored on purpose.
#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Swaps an authorization code for an access token.
///
/// Holds a shared HTTP client (which carries the request timeout) and the
/// immutable client configuration.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use pulsedeck::auth::TokenExchanger;
/// use pulsedeck::config::ClientConfig;
///
/// # async fn example() -> pulsedeck::error::Result<()> {
/// let config = ClientConfig::load("config.yaml")?;
/// let http = Arc::new(reqwest::Client::new());
/// let exchanger = TokenExchanger::new(http, config);
/// let token = exchanger.exchange("authorization-code").await?;
/// # Ok(())
/// # }
/// ```
pub struct TokenExchanger {
    http: Arc<reqwest::Client>,
    config: ClientConfig,
}

impl TokenExchanger {
    /// Creates a new exchanger.
    pub fn new(http: Arc<reqwest::Client>, config: ClientConfig) -> Self {
        Self { http, config }
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// Issues exactly one `POST {token_endpoint}` with form body
    /// `grant_type=authorization_code`, `code`, `client_id`,
    /// `client_secret`, `redirect_uri`. Safe for the caller to retry.
    ///
    /// # Errors
    ///
    /// - [`AuthError::ExchangeRejected`] on any non-200 status, carrying
    ///   the status and body.
    /// - [`AuthError::Unreachable`] when the request never completes
    ///   (DNS, TLS, timeout).
    pub async fn exchange(&self, code: &str) -> Result<AccessToken> {
        let mut params: HashMap<&str, &str> = HashMap::new();
        params.insert("grant_type", "authorization_code");
        params.insert("code", code);
        params.insert("client_id", &self.config.client_id);
        params.insert("client_secret", &self.config.client_secret);
        params.insert("redirect_uri", &self.config.redirect_uri);

        let endpoint = self.config.token_endpoint();
        tracing::debug!("exchanging authorization code at {endpoint}");

        let resp = self
            .http
            .post(&endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!("token exchange rejected with status {status}");
            return Err(AuthError::ExchangeRejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let raw: TokenResponse = resp.json().await.map_err(|e| AuthError::ExchangeRejected {
            status: 200,
            body: format!("unparseable token response: {e}"),
        })?;

        Ok(AccessToken::new(raw.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_parses_minimal_body() {
        let raw: TokenResponse =
            serde_json::from_str(r#"{"access_token":"tok_123","token_type":"bearer"}"#).unwrap();
        assert_eq!(raw.access_token, "tok_123");
    }

    #[test]
    fn test_token_response_rejects_missing_access_token() {
        let result = serde_json::from_str::<TokenResponse>(r#"{"token_type":"bearer"}"#);
        assert!(result.is_err());
    }
}
