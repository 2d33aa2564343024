//! Command-line interface definition for pulsedeck
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the interactive dashboard flow, authorization
//! link printing, and endpoint discovery.

use clap::{Parser, Subcommand};

/// pulsedeck - wearable-fitness dashboard core
///
/// Authenticate against the provider's OAuth2 API, fetch recovery,
/// strain, and profile data, and normalize heterogeneous response shapes
/// into canonical records.
#[derive(Parser, Debug, Clone)]
#[command(name = "pulsedeck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for pulsedeck
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in via the browser and show the fetched metrics
    Dashboard {
        /// How many recovery/cycle records to fetch
        #[arg(short, long, default_value_t = 30)]
        limit: u32,

        /// Local port for the redirect callback (0 lets the OS pick)
        #[arg(long, default_value_t = 0)]
        callback_port: u16,
    },

    /// Print the provider authorization link without contacting anything
    AuthUrl,

    /// Probe candidate endpoint paths and classify each one
    Probe {
        /// Access token to probe with (falls back to PULSEDECK_ACCESS_TOKEN)
        #[arg(long, env = "PULSEDECK_ACCESS_TOKEN")]
        token: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
