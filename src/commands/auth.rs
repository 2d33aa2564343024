//! `auth-url` command: print the authorization link
//!
//! Pure apart from stdout: generates a state token, builds the link, and
//! prints it. Useful for wiring the redirect into an external tool or for
//! checking the encoded scope string against the provider's expectations.

use crate::auth::SessionStore;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::flow::{advance, RedirectParams, RenderOutcome};

/// Prints the provider authorization URL for the configured client.
pub async fn print_auth_url(config: ClientConfig) -> Result<()> {
    let mut store = SessionStore::new();
    let exchanger = crate::auth::TokenExchanger::new(
        std::sync::Arc::new(reqwest::Client::new()),
        config.clone(),
    );

    match advance(&config, &mut store, &exchanger, &RedirectParams::empty()).await? {
        RenderOutcome::LoginRequired { authorize_url } => {
            println!("{authorize_url}");
            Ok(())
        }
        RenderOutcome::Authenticated => unreachable!("fresh session cannot be authenticated"),
    }
}
