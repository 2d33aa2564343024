//! Error types for pulsedeck
//!
//! This module defines the typed error taxonomies used throughout the
//! crate, using `thiserror` for ergonomic error handling. Authentication
//! failures and data-path failures are deliberately separate enums: the
//! former govern the session lifecycle, the latter leave an authenticated
//! session intact.

use thiserror::Error;

/// Errors produced by the OAuth2 authorization-code flow.
///
/// All variants are recoverable: the caller re-shows the login affordance.
/// Only [`AuthError::StateMismatch`] invalidates the stored state token;
/// every other failure leaves the in-flight login intact.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The `state` echoed by the provider's redirect did not match the
    /// session's stored state token. The exchange is refused before any
    /// network call is made.
    #[error("state parameter does not match the pending login")]
    StateMismatch,

    /// The token endpoint answered with a non-200 status.
    #[error("token exchange rejected with status {status}: {body}")]
    ExchangeRejected {
        /// HTTP status code returned by the token endpoint
        status: u16,
        /// Response body, for operator diagnostics
        body: String,
    },

    /// The token endpoint could not be reached (DNS, TLS, timeout).
    #[error("token endpoint unreachable: {0}")]
    Unreachable(String),

    /// A login was attempted while an access token is already held.
    /// Tokens are never silently overwritten; log out first.
    #[error("session already holds an access token")]
    AlreadyAuthenticated,
}

/// Errors produced by authenticated requests against the provider API.
///
/// These are per-request diagnostics; the session remains authenticated
/// and the caller decides how to surface them.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The provider rejected the bearer token (401 or 403).
    #[error("request unauthorized: token rejected by the provider")]
    Unauthorized,

    /// The resource path does not exist on this API version (404).
    #[error("resource not found")]
    NotFound,

    /// The provider throttled the request (429).
    #[error("rate limited by the provider")]
    RateLimited,

    /// A 200 response whose body does not carry the expected shape.
    #[error("response schema drift: {0}")]
    SchemaDrift(String),

    /// The request never completed (DNS, timeout, connection reset) or the
    /// provider answered with an unexpected status.
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

/// Result type alias for pulsedeck operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation. Typed
/// [`AuthError`] / [`ApiError`] values travel inside it and are recovered
/// with `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
