//! Session-lifecycle orchestration
//!
//! `advance` is the single entry point the surrounding UI/CLI calls on
//! every render: it receives the session store and whatever the last
//! redirect carried, and returns either the authorization link to show or
//! confirmation that the session is authenticated.
//!
//! The anti-forgery check lives here: the `state` echoed by the provider
//! must equal the stored state token, compared before any network call.
//! A mismatch fails closed and discards the stored token; an exchange
//! failure keeps it so the in-flight login can be re-shown.

use url::Url;

use crate::auth::{build_authorization_url, SessionStore, TokenExchanger};
use crate::config::ClientConfig;
use crate::error::{AuthError, Result};

/// The `code`/`state` pair extracted from the last redirect's query
/// parameters, if any.
#[derive(Debug, Clone, Default)]
pub struct RedirectParams {
    /// Authorization code from the provider redirect
    pub code: Option<String>,
    /// State value echoed by the provider redirect
    pub state: Option<String>,
}

impl RedirectParams {
    /// Parameters for a render with no redirect in play.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// What the presentation layer should do after a render.
#[derive(Debug)]
pub enum RenderOutcome {
    /// Unauthenticated: show this authorization link and wait.
    LoginRequired {
        /// The provider authorization URL, carrying the pending state token
        authorize_url: Url,
    },
    /// The session holds a valid access token; data fetches may proceed.
    Authenticated,
}

/// Advances the session by one render.
///
/// - Already authenticated: returns [`RenderOutcome::Authenticated`]
///   without touching the network.
/// - Unauthenticated, no code in the redirect: ensures the state token
///   (exactly-once) and returns the authorization link. The token
///   endpoint is never contacted on this path.
/// - Unauthenticated with a code: validates the echoed state against the
///   stored token, then exchanges the code and logs the session in.
///
/// # Errors
///
/// - [`AuthError::StateMismatch`] when the echoed state differs from the
///   stored token (or no login is pending). The stored token is discarded;
///   the next render starts a fresh flow.
/// - [`AuthError::ExchangeRejected`] / [`AuthError::Unreachable`]
///   propagated from the exchange; the state token is kept.
pub async fn advance(
    config: &ClientConfig,
    store: &mut SessionStore,
    exchanger: &TokenExchanger,
    redirect: &RedirectParams,
) -> Result<RenderOutcome> {
    if store.current().is_authenticated() {
        return Ok(RenderOutcome::Authenticated);
    }

    let Some(code) = redirect.code.as_deref() else {
        let state = store.ensure_state_token();
        let authorize_url = build_authorization_url(config, &state)?;
        return Ok(RenderOutcome::LoginRequired { authorize_url });
    };

    // A code arrived: the state check gates the exchange. No pending state
    // token means this redirect belongs to no login we started.
    let expected = store.current().state_token.clone();
    let echoed = redirect.state.as_deref();
    if expected.is_none() || echoed != expected.as_deref() {
        tracing::warn!("rejecting redirect: state does not match pending login");
        store.reset_state_token();
        return Err(AuthError::StateMismatch.into());
    }

    let token = exchanger.exchange(code).await?;
    store.login(token)?;
    Ok(RenderOutcome::Authenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AccessToken;
    use std::sync::Arc;

    fn test_config() -> ClientConfig {
        ClientConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://127.0.0.1:0/callback".to_string(),
            ..ClientConfig::default()
        }
    }

    fn test_exchanger(config: &ClientConfig) -> TokenExchanger {
        TokenExchanger::new(Arc::new(reqwest::Client::new()), config.clone())
    }

    #[tokio::test]
    async fn test_unauthenticated_render_returns_login_link() {
        let config = test_config();
        let mut store = SessionStore::new();
        let exchanger = test_exchanger(&config);

        let outcome = advance(&config, &mut store, &exchanger, &RedirectParams::empty())
            .await
            .unwrap();

        match outcome {
            RenderOutcome::LoginRequired { authorize_url } => {
                let state = store.current().state_token.clone().unwrap();
                assert!(authorize_url.as_str().contains(&state));
            }
            RenderOutcome::Authenticated => panic!("expected LoginRequired"),
        }
    }

    #[tokio::test]
    async fn test_repeated_renders_keep_the_same_state_token() {
        let config = test_config();
        let mut store = SessionStore::new();
        let exchanger = test_exchanger(&config);

        advance(&config, &mut store, &exchanger, &RedirectParams::empty())
            .await
            .unwrap();
        let first = store.current().state_token.clone();
        advance(&config, &mut store, &exchanger, &RedirectParams::empty())
            .await
            .unwrap();
        assert_eq!(store.current().state_token, first);
    }

    #[tokio::test]
    async fn test_authenticated_render_is_a_no_op() {
        let config = test_config();
        let mut store = SessionStore::new();
        store.login(AccessToken::new("tok")).unwrap();
        let exchanger = test_exchanger(&config);

        let outcome = advance(&config, &mut store, &exchanger, &RedirectParams::empty())
            .await
            .unwrap();
        assert!(matches!(outcome, RenderOutcome::Authenticated));
    }

    #[tokio::test]
    async fn test_state_mismatch_fails_closed_and_resets_token() {
        let config = test_config();
        let mut store = SessionStore::new();
        let exchanger = test_exchanger(&config);

        // Start a login to establish the stored state token.
        advance(&config, &mut store, &exchanger, &RedirectParams::empty())
            .await
            .unwrap();

        let redirect = RedirectParams {
            code: Some("code".to_string()),
            state: Some("forged-state".to_string()),
        };
        let err = advance(&config, &mut store, &exchanger, &redirect)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AuthError>(),
            Some(AuthError::StateMismatch)
        ));
        // The compromised token is gone; the session stays unauthenticated.
        assert!(store.current().state_token.is_none());
        assert!(!store.current().is_authenticated());
    }

    #[tokio::test]
    async fn test_code_without_pending_login_is_a_mismatch() {
        let config = test_config();
        let mut store = SessionStore::new();
        let exchanger = test_exchanger(&config);

        let redirect = RedirectParams {
            code: Some("code".to_string()),
            state: Some("anything".to_string()),
        };
        let err = advance(&config, &mut store, &exchanger, &redirect)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AuthError>(),
            Some(AuthError::StateMismatch)
        ));
    }
}
