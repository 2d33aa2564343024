//! Command handlers for the CLI
//!
//! These handlers are intentionally small: they wire the library
//! components together (session store, exchanger, API client, probe,
//! normalizers) and own all terminal presentation. Nothing in the core
//! modules prints.

pub mod auth;
pub mod dashboard;
pub mod probe;
