//! Anti-forgery state token generation
//!
//! The state token binds an OAuth2 authorization callback to the request
//! that initiated it. It must come from a cryptographically secure source
//! and must be generated at most once per session lifetime; regenerating
//! on every render invalidates in-flight logins. Exactly-once semantics
//! live in [`SessionStore::ensure_state_token`](super::session::SessionStore).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore as _;

/// Number of random bytes in a state token. 24 bytes gives 192 bits of
/// entropy, comfortably past the 128-bit brute-force floor.
const STATE_TOKEN_BYTES: usize = 24;

/// Generates a URL-safe, cryptographically random state token.
///
/// The token is base64url-encoded without padding, so it can travel in a
/// query parameter without further escaping.
///
/// # Examples
///
/// ```
/// use pulsedeck::auth::generate_state_token;
///
/// let token = generate_state_token();
/// assert_eq!(token.len(), 32); // 24 bytes -> 32 base64url chars
/// assert!(!token.contains('='));
/// ```
pub fn generate_state_token() -> String {
    let mut bytes = [0u8; STATE_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
