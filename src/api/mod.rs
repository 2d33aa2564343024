//! Authenticated data fetch against the provider API
//!
//! The steady-state request path. It pins API version v1 (the resolved
//! version); discovering other versions and resources is the job of the
//! [`probe`] module, which is a diagnostic tool rather than a production
//! path.

pub mod probe;

pub use probe::{EndpointProbe, EndpointProbeResult, ProbeOutcome};

use std::sync::Arc;

use serde_json::Value;

use crate::auth::AccessToken;
use crate::error::{ApiError, Result};

/// Pinned API version for steady-state fetches.
const API_VERSION: &str = "v1";

/// Client for the provider's developer API.
///
/// Holds a shared `reqwest::Client` (which carries the request timeout)
/// and the API base URL. Every fetch re-reads from the provider; there is
/// no local caching.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use pulsedeck::api::ApiClient;
/// use pulsedeck::auth::AccessToken;
///
/// # async fn example() -> pulsedeck::error::Result<()> {
/// let client = ApiClient::new(
///     Arc::new(reqwest::Client::new()),
///     "https://api.prod.whoop.com".to_string(),
/// );
/// let token = AccessToken::new("tok");
/// let raw = client.fetch_recovery(&token, 30).await?;
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    http: Arc<reqwest::Client>,
    api_base: String,
}

impl ApiClient {
    /// Creates a new API client.
    pub fn new(http: Arc<reqwest::Client>, api_base: String) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches up to `limit` recovery records, returning the raw array in
    /// upstream order.
    pub async fn fetch_recovery(&self, token: &AccessToken, limit: u32) -> Result<Vec<Value>> {
        let url = format!(
            "{}/developer/{API_VERSION}/recovery?limit={limit}",
            self.api_base
        );
        self.fetch_records(token, &url).await
    }

    /// Fetches up to `limit` cycle records, returning the raw array in
    /// upstream order.
    pub async fn fetch_cycles(&self, token: &AccessToken, limit: u32) -> Result<Vec<Value>> {
        let url = format!(
            "{}/developer/{API_VERSION}/cycle?limit={limit}",
            self.api_base
        );
        self.fetch_records(token, &url).await
    }

    /// Fetches the user profile object.
    pub async fn fetch_profile(&self, token: &AccessToken) -> Result<Value> {
        let url = format!("{}/developer/{API_VERSION}/user/profile/basic", self.api_base);
        self.get_json(token, &url).await
    }

    /// GETs `url` and unwraps the `records` array expected on collection
    /// endpoints.
    ///
    /// A 200 response without that array is classified as
    /// [`ApiError::SchemaDrift`]; the session stays authenticated either
    /// way.
    async fn fetch_records(&self, token: &AccessToken, url: &str) -> Result<Vec<Value>> {
        let body = self.get_json(token, url).await?;
        match body.get("records").and_then(Value::as_array) {
            Some(records) => Ok(records.clone()),
            None => Err(ApiError::SchemaDrift(format!(
                "expected a records array in the response from {url}"
            ))
            .into()),
        }
    }

    /// GETs `url` with a bearer header and maps the status to the
    /// [`ApiError`] taxonomy.
    async fn get_json(&self, token: &AccessToken, url: &str) -> Result<Value> {
        tracing::debug!("fetching {url}");
        let resp = self
            .http
            .get(url)
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| ApiError::TransportFailure(e.to_string()))?;

        let status = resp.status();
        match status.as_u16() {
            200 => {}
            401 | 403 => return Err(ApiError::Unauthorized.into()),
            404 => return Err(ApiError::NotFound.into()),
            429 => return Err(ApiError::RateLimited.into()),
            other => {
                return Err(
                    ApiError::TransportFailure(format!("unexpected status {other} from {url}"))
                        .into(),
                )
            }
        }

        resp.json::<Value>()
            .await
            .map_err(|e| ApiError::SchemaDrift(format!("response was not JSON: {e}")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_trailing_slash_is_trimmed() {
        let client = ApiClient::new(
            Arc::new(reqwest::Client::new()),
            "https://api.example.com/".to_string(),
        );
        assert_eq!(client.api_base, "https://api.example.com");
    }
}
