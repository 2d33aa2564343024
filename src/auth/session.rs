//! Single-user session state
//!
//! One [`Session`] exists per process run. It moves through a small
//! lifecycle: created empty, state token assigned on the first
//! unauthenticated render, access token assigned on a successful exchange,
//! both cleared together on logout. The [`SessionStore`] is the only
//! writer; every transition is a whole method, so no partial state (access
//! token set while a stale state token lingers) is ever observable.

use crate::auth::state::generate_state_token;
use crate::error::AuthError;

/// An OAuth2 access token.
///
/// A newtype rather than a bare `String` so tokens cannot be confused with
/// state tokens or authorization codes at call sites. The `Debug`
/// implementation redacts the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value, for building `Authorization: Bearer` headers.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// The state of one user's session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Pending anti-forgery token, present only while a login is in flight
    pub state_token: Option<String>,

    /// Access token, present once the code exchange has succeeded
    pub access_token: Option<AccessToken>,
}

impl Session {
    /// Whether the session holds an access token.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Owner of the process-local session.
///
/// Single-writer, single-reader: the store is passed explicitly into the
/// operations that need it rather than living in ambient global state.
///
/// # Examples
///
/// ```
/// use pulsedeck::auth::{AccessToken, SessionStore};
///
/// let mut store = SessionStore::new();
/// let state = store.ensure_state_token();
/// assert_eq!(store.ensure_state_token(), state); // stable until consumed
///
/// store.login(AccessToken::new("tok")).unwrap();
/// assert!(store.current().is_authenticated());
/// assert!(store.current().state_token.is_none()); // consumed by login
///
/// store.logout();
/// assert!(!store.current().is_authenticated());
/// ```
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    /// Creates a store with an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the current session.
    pub fn current(&self) -> &Session {
        &self.session
    }

    /// Returns the pending state token, generating and storing one on the
    /// first call.
    ///
    /// The token is stable across renders until a login consumes it or the
    /// session is reset; regenerating per render would invalidate every
    /// in-flight login.
    pub fn ensure_state_token(&mut self) -> String {
        match &self.session.state_token {
            Some(token) => token.clone(),
            None => {
                let token = generate_state_token();
                tracing::debug!("generated new state token for pending login");
                self.session.state_token = Some(token.clone());
                token
            }
        }
    }

    /// Records a successful token exchange.
    ///
    /// Sets the access token and clears the consumed state token in one
    /// transition.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AlreadyAuthenticated`] when an access token is
    /// already held; tokens are never silently overwritten.
    pub fn login(&mut self, token: AccessToken) -> Result<(), AuthError> {
        if self.session.access_token.is_some() {
            return Err(AuthError::AlreadyAuthenticated);
        }
        self.session.access_token = Some(token);
        self.session.state_token = None;
        tracing::info!("session authenticated");
        Ok(())
    }

    /// Clears the access token and any pending state token together.
    ///
    /// The process may re-enter the unauthenticated state afterwards; the
    /// next render generates a fresh state token.
    pub fn logout(&mut self) {
        self.session = Session::default();
        tracing::info!("session logged out");
    }

    /// Discards the pending state token without touching the access token.
    ///
    /// Used after a state mismatch: the stored token is the one value that
    /// can no longer be trusted, so the next render starts a fresh flow.
    pub fn reset_state_token(&mut self) {
        self.session.state_token = None;
    }
}
