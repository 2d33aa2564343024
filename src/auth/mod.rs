//! OAuth2 authorization-code client: state tokens, authorization links,
//! session lifecycle, and the code-for-token exchange.

pub mod callback;
pub mod exchange;
pub mod link;
pub mod session;
pub mod state;

pub use callback::accept_redirect;
pub use exchange::TokenExchanger;
pub use link::build_authorization_url;
pub use session::{AccessToken, Session, SessionStore};
pub use state::generate_state_token;
