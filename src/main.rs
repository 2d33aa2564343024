//! pulsedeck - wearable-fitness dashboard core
//!
//! Main entry point: tracing init, config load and validation, command
//! dispatch.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pulsedeck::cli::{Cli, Commands};
use pulsedeck::commands;
use pulsedeck::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse_args();

    let config = ClientConfig::load(&cli.config)?;
    // Missing credentials are fatal at startup; nothing downstream can
    // recover from them.
    config.validate()?;

    match cli.command {
        Commands::Dashboard {
            limit,
            callback_port,
        } => {
            tracing::info!("starting interactive dashboard flow");
            commands::dashboard::run_dashboard(config, limit, callback_port).await
        }
        Commands::AuthUrl => commands::auth::print_auth_url(config).await,
        Commands::Probe { token } => {
            let token = token.ok_or_else(|| {
                anyhow::anyhow!("probe needs a token: pass --token or set PULSEDECK_ACCESS_TOKEN")
            })?;
            tracing::info!("starting endpoint discovery probe");
            commands::probe::run_probe(config, token).await
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pulsedeck=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
