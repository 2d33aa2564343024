//! `dashboard` command: the full login-and-fetch flow
//!
//! Binds a loopback listener for the OAuth redirect, opens the
//! authorization link in the browser, validates the callback through
//! [`crate::flow::advance`], then fetches and normalizes the recovery,
//! cycle, and profile data and prints per-domain summaries.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize as _;
use url::Url;

use crate::api::ApiClient;
use crate::auth::{accept_redirect, AccessToken, SessionStore, TokenExchanger};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::flow::{advance, RedirectParams, RenderOutcome};
use crate::records::{
    normalize_cycle_batch, normalize_profile, normalize_recovery_batch, BatchOutcome, CycleRecord,
    RecoveryRecord,
};

/// Runs the interactive dashboard flow end to end.
pub async fn run_dashboard(mut config: ClientConfig, limit: u32, callback_port: u16) -> Result<()> {
    let http = Arc::new(
        reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?,
    );

    // The interactive flow receives the redirect on a loopback listener.
    // The bound port must agree with the redirect_uri sent to the
    // provider, so the URI is rebuilt from the actual bind address.
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", callback_port)).await?;
    let port = listener.local_addr()?.port();
    config.redirect_uri = format!("http://127.0.0.1:{port}/callback");

    let mut store = SessionStore::new();
    let exchanger = TokenExchanger::new(Arc::clone(&http), config.clone());

    let outcome = advance(&config, &mut store, &exchanger, &RedirectParams::empty()).await?;
    let authorize_url = match outcome {
        RenderOutcome::LoginRequired { authorize_url } => authorize_url,
        RenderOutcome::Authenticated => unreachable!("fresh session cannot be authenticated"),
    };

    println!(
        "{}\n{}",
        "Open this link in your browser to log in:".bold(),
        authorize_url
    );
    try_open_browser(&authorize_url);

    let redirect = accept_redirect(listener).await?;
    match advance(&config, &mut store, &exchanger, &redirect).await? {
        RenderOutcome::Authenticated => {
            println!("{}", "Connected.".green().bold());
        }
        RenderOutcome::LoginRequired { .. } => {
            anyhow::bail!("redirect did not carry an authorization code");
        }
    }

    let token = store
        .current()
        .access_token
        .clone()
        .ok_or_else(|| anyhow::anyhow!("authenticated session without a token"))?;

    let client = ApiClient::new(http, config.api_base.clone());
    show_metrics(&client, &token, limit).await
}

/// Fetches all three domains and prints their summaries.
///
/// Each fetch failure is reported and the remaining domains still print;
/// a single bad endpoint does not end the run.
async fn show_metrics(client: &ApiClient, token: &AccessToken, limit: u32) -> Result<()> {
    match client.fetch_recovery(token, limit).await {
        Ok(raw) => print_recovery_summary(&collect(normalize_recovery_batch(&raw))),
        Err(e) => eprintln!("{} {e}", "recovery fetch failed:".red()),
    }

    match client.fetch_cycles(token, limit).await {
        Ok(raw) => print_cycle_summary(&collect(normalize_cycle_batch(&raw))),
        Err(e) => eprintln!("{} {e}", "cycle fetch failed:".red()),
    }

    match client.fetch_profile(token).await {
        Ok(raw) => {
            let profile = normalize_profile(&raw);
            println!("\n{}", "Profile".bold());
            println!("  name:  {}", profile.display_name);
            if let Some(email) = &profile.email {
                println!("  email: {email}");
            }
        }
        Err(e) => eprintln!("{} {e}", "profile fetch failed:".red()),
    }

    Ok(())
}

fn collect<T>(outcomes: Vec<BatchOutcome<T>>) -> Vec<T> {
    outcomes
        .into_iter()
        .filter_map(BatchOutcome::into_normalized)
        .collect()
}

fn print_recovery_summary(records: &[RecoveryRecord]) {
    println!("\n{} ({} days)", "Recovery".bold(), records.len());
    if records.is_empty() {
        return;
    }
    let n = records.len() as f64;
    let avg_score: f64 = records.iter().map(|r| r.recovery_score).sum::<f64>() / n;
    let avg_hrv: f64 = records.iter().map(|r| r.hrv_ms).sum::<f64>() / n;
    let avg_rhr: f64 = records.iter().map(|r| r.resting_hr_bpm).sum::<f64>() / n;
    println!("  avg recovery: {avg_score:.0}%");
    println!("  avg HRV:      {avg_hrv:.0} ms");
    println!("  avg RHR:      {avg_rhr:.0} bpm");
    for record in records {
        println!(
            "  {}  score {:>3.0}  hrv {:>5.1}  rhr {:>5.1}",
            record.date, record.recovery_score, record.hrv_ms, record.resting_hr_bpm
        );
    }
}

fn print_cycle_summary(records: &[CycleRecord]) {
    println!("\n{} ({} days)", "Strain".bold(), records.len());
    if records.is_empty() {
        return;
    }
    let n = records.len() as f64;
    let avg_strain: f64 = records.iter().map(|r| r.strain).sum::<f64>() / n;
    let avg_kcal: f64 = records.iter().map(|r| r.calories_kcal).sum::<f64>() / n;
    println!("  avg strain:   {avg_strain:.1}");
    println!("  avg calories: {avg_kcal:.0} kcal");
}

/// Attempts to open the authorization URL in the user's default browser.
///
/// Errors are intentionally ignored; the URL is already printed so the
/// user can copy it.
fn try_open_browser(url: &Url) {
    #[cfg(target_os = "macos")]
    {
        let _ = std::process::Command::new("open").arg(url.as_str()).spawn();
    }
    #[cfg(target_os = "linux")]
    {
        let _ = std::process::Command::new("xdg-open")
            .arg(url.as_str())
            .spawn();
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        let _ = url;
    }
}
