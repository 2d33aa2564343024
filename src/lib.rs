//! pulsedeck - wearable-fitness dashboard core
//!
//! This library implements the two parts of a fitness-provider dashboard
//! with real engineering substance: the OAuth2 authorization-code session
//! lifecycle and the schema-tolerant normalization of the provider's
//! inconsistently-shaped responses. Presentation (charts, tables, cards)
//! is an external collaborator that consumes the canonical records and
//! session-state outcomes produced here.
//!
//! # Architecture
//!
//! - `auth`: state tokens, authorization links, session store, token
//!   exchange, and the loopback redirect listener
//! - `flow`: the per-render session-lifecycle orchestration, including
//!   the anti-forgery state check
//! - `records`: canonical record types and the flat/nested-tolerant
//!   normalizer
//! - `api`: authenticated data fetches (pinned version) and the endpoint
//!   discovery probe
//! - `config`: client configuration and validation
//! - `error`: typed error taxonomies and the result alias
//! - `cli` / `commands`: command-line surface
//!
//! # Example
//!
//! ```no_run
//! use pulsedeck::auth::{SessionStore, TokenExchanger};
//! use pulsedeck::config::ClientConfig;
//! use pulsedeck::flow::{advance, RedirectParams, RenderOutcome};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::load("config.yaml")?;
//!     config.validate()?;
//!
//!     let mut store = SessionStore::new();
//!     let exchanger = TokenExchanger::new(Arc::new(reqwest::Client::new()), config.clone());
//!
//!     match advance(&config, &mut store, &exchanger, &RedirectParams::empty()).await? {
//!         RenderOutcome::LoginRequired { authorize_url } => println!("{authorize_url}"),
//!         RenderOutcome::Authenticated => println!("already logged in"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod flow;
pub mod records;

// Re-export commonly used types
pub use auth::{AccessToken, Session, SessionStore, TokenExchanger};
pub use config::ClientConfig;
pub use error::{ApiError, AuthError, Result};
pub use flow::{advance, RedirectParams, RenderOutcome};
pub use records::{CycleRecord, ProfileRecord, RecoveryRecord};
