//! `probe` command: endpoint discovery diagnostics
//!
//! Runs the candidate grid against the configured API base and prints one
//! classified line per candidate, in order.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize as _;

use crate::api::probe::{default_candidates, EndpointProbe, ProbeOutcome};
use crate::auth::AccessToken;
use crate::config::ClientConfig;
use crate::error::Result;

/// Probes the default candidate grid with the given token.
pub async fn run_probe(config: ClientConfig, token: String) -> Result<()> {
    let http = Arc::new(
        reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?,
    );

    let candidates = default_candidates(&config.api_base);
    let probe = EndpointProbe::new(http);
    let results = probe.probe(&candidates, &AccessToken::new(token)).await;

    for result in &results {
        let label = match result.outcome {
            ProbeOutcome::Success => "ok        ".green(),
            ProbeOutcome::NotFound => "not-found ".yellow(),
            ProbeOutcome::Unauthorized => "denied    ".red(),
            ProbeOutcome::OtherError => "error     ".red(),
            ProbeOutcome::TransportFailure => "unreachable".red(),
        };
        println!("{label} {:>3}  {}", result.status_code, result.url);
        if result.outcome == ProbeOutcome::TransportFailure {
            println!("            {}", result.body_sample.dimmed());
        }
    }

    let reachable = results
        .iter()
        .filter(|r| r.outcome == ProbeOutcome::Success)
        .count();
    println!("\n{reachable}/{} candidates reachable", results.len());
    Ok(())
}
