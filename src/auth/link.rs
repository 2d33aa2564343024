//! Authorization link construction
//!
//! Builds the provider authorization URL from the client configuration and
//! a state token. A pure function with no side effects: the caller decides
//! when and where the link is shown.
//!
//! All dynamic segments go through [`url::Url::query_pairs_mut`], which
//! applies RFC 3986 percent-encoding. The space-delimited scope list is
//! therefore encoded as `%20` rather than a literal space or `+`; the
//! round-trip property is verified in the tests.

use url::Url;

use crate::config::ClientConfig;
use crate::error::Result;

/// Builds the `GET {authorization_endpoint}?...` link for the
/// authorization-code flow.
///
/// Query parameters, in order: `response_type=code`, `client_id`,
/// `redirect_uri`, `scope` (space-joined, percent-encoded), `state`.
///
/// # Errors
///
/// Returns an error when the configured authorization endpoint is not a
/// valid URL.
///
/// # Examples
///
/// ```
/// use pulsedeck::auth::build_authorization_url;
/// use pulsedeck::config::ClientConfig;
///
/// let config = ClientConfig {
///     client_id: "abc".to_string(),
///     client_secret: "secret".to_string(),
///     redirect_uri: "https://dash.example.com/callback".to_string(),
///     ..ClientConfig::default()
/// };
/// let url = build_authorization_url(&config, "state123").unwrap();
/// assert!(url.as_str().contains("response_type=code"));
/// assert!(url.as_str().contains("state=state123"));
/// ```
pub fn build_authorization_url(config: &ClientConfig, state: &str) -> Result<Url> {
    let mut url = Url::parse(&config.authorization_endpoint())
        .map_err(|e| anyhow::anyhow!("invalid authorization endpoint URL: {e}"))?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("response_type", "code");
        query.append_pair("client_id", &config.client_id);
        query.append_pair("redirect_uri", &config.redirect_uri);
        query.append_pair("scope", &config.scope_string());
        query.append_pair("state", state);
    }

    Ok(url)
}
