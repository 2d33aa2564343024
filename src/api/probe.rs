//! Endpoint discovery probe
//!
//! The provider's endpoint paths and versions have been unstable from the
//! integrator's point of view. This module is the deliberate discovery
//! tool for that situation: given an ordered list of candidate URLs, it
//! issues one authenticated request per candidate, sequentially, and
//! classifies each outcome. It is a diagnostic utility, not a production
//! request path; steady-state fetches pin a resolved version in
//! [`super::ApiClient`].

use std::sync::Arc;

use crate::auth::AccessToken;

/// Bound on the response-body prefix kept in a probe result.
const BODY_SAMPLE_LIMIT: usize = 300;

/// Classification of one probed candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 200: the candidate is reachable with this token.
    Success,
    /// 404: the path does not exist on this version.
    NotFound,
    /// 401 or 403: the token or its scopes were rejected.
    Unauthorized,
    /// Any other HTTP status.
    OtherError,
    /// The request never completed (DNS, timeout, connection reset).
    TransportFailure,
}

/// Result of probing one candidate URL.
#[derive(Debug, Clone)]
pub struct EndpointProbeResult {
    /// The candidate that was probed
    pub url: String,
    /// HTTP status code; 0 when the transport failed before a response
    pub status_code: u16,
    /// Classified outcome
    pub outcome: ProbeOutcome,
    /// Bounded prefix of the response body, or the transport error
    /// description
    pub body_sample: String,
}

/// Sequential prober over an ordered candidate list.
pub struct EndpointProbe {
    http: Arc<reqwest::Client>,
}

impl EndpointProbe {
    /// Creates a prober sharing the process HTTP client (and its timeout).
    pub fn new(http: Arc<reqwest::Client>) -> Self {
        Self { http }
    }

    /// Probes each candidate in input order, one result per input URL.
    ///
    /// Candidates are independent: a transport failure on one never
    /// aborts the rest. Requests are issued sequentially; the goal is
    /// stable, attributable diagnostics, not throughput.
    pub async fn probe(&self, urls: &[String], token: &AccessToken) -> Vec<EndpointProbeResult> {
        let mut results = Vec::with_capacity(urls.len());
        for url in urls {
            let result = self.probe_one(url, token).await;
            tracing::debug!(
                "probe {url}: {:?} (status {})",
                result.outcome,
                result.status_code
            );
            results.push(result);
        }
        results
    }

    async fn probe_one(&self, url: &str, token: &AccessToken) -> EndpointProbeResult {
        let response = self.http.get(url).bearer_auth(token.secret()).send().await;

        match response {
            Ok(resp) => {
                let status = resp.status().as_u16();
                let outcome = classify_status(status);
                let body = resp.text().await.unwrap_or_default();
                EndpointProbeResult {
                    url: url.to_string(),
                    status_code: status,
                    outcome,
                    body_sample: truncate_sample(&body),
                }
            }
            Err(e) => EndpointProbeResult {
                url: url.to_string(),
                status_code: 0,
                outcome: ProbeOutcome::TransportFailure,
                body_sample: truncate_sample(&e.to_string()),
            },
        }
    }
}

/// Maps an HTTP status to a probe outcome.
fn classify_status(status: u16) -> ProbeOutcome {
    match status {
        200 => ProbeOutcome::Success,
        404 => ProbeOutcome::NotFound,
        401 | 403 => ProbeOutcome::Unauthorized,
        _ => ProbeOutcome::OtherError,
    }
}

/// Truncates a body to the bounded sample length on a char boundary.
fn truncate_sample(body: &str) -> String {
    if body.len() <= BODY_SAMPLE_LIMIT {
        return body.to_string();
    }
    let mut end = BODY_SAMPLE_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}

/// Builds the observed candidate grid for a given API base: versions
/// v1/v2 crossed with the resources the dashboard has ever needed.
pub fn default_candidates(api_base: &str) -> Vec<String> {
    let base = api_base.trim_end_matches('/');
    let versions = ["v1", "v2"];
    let resources = [
        "recovery",
        "cycle",
        "user/profile",
        "user/profile/basic",
        "user/measurement/body",
    ];

    let mut urls = Vec::with_capacity(versions.len() * resources.len());
    for version in versions {
        for resource in resources {
            urls.push(format!("{base}/developer/{version}/{resource}?limit=1"));
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_success() {
        assert_eq!(classify_status(200), ProbeOutcome::Success);
    }

    #[test]
    fn test_classify_not_found() {
        assert_eq!(classify_status(404), ProbeOutcome::NotFound);
    }

    #[test]
    fn test_classify_unauthorized() {
        assert_eq!(classify_status(401), ProbeOutcome::Unauthorized);
        assert_eq!(classify_status(403), ProbeOutcome::Unauthorized);
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(classify_status(500), ProbeOutcome::OtherError);
        assert_eq!(classify_status(429), ProbeOutcome::OtherError);
    }

    #[test]
    fn test_truncate_sample_bounds_long_bodies() {
        let body = "x".repeat(1000);
        assert_eq!(truncate_sample(&body).len(), BODY_SAMPLE_LIMIT);
    }

    #[test]
    fn test_truncate_sample_keeps_short_bodies() {
        assert_eq!(truncate_sample("short"), "short");
    }

    #[test]
    fn test_truncate_sample_respects_char_boundaries() {
        // Multibyte characters straddling the limit must not split.
        let body = "é".repeat(BODY_SAMPLE_LIMIT);
        let sample = truncate_sample(&body);
        assert!(sample.len() <= BODY_SAMPLE_LIMIT);
        assert!(sample.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_default_candidates_grid() {
        let urls = default_candidates("https://api.example.com/");
        assert_eq!(urls.len(), 10);
        assert_eq!(
            urls[0],
            "https://api.example.com/developer/v1/recovery?limit=1"
        );
        // v1 candidates come before v2.
        assert!(urls[4].contains("/v1/"));
        assert!(urls[5].contains("/v2/"));
    }
}
