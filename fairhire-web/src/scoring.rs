//! HTTP client for the external scoring service
//!
//! One endpoint, one operation: POST a feature payload, get a score back.
//! Connection reuse is disabled because the upstream has shown
//! stale-connection failures; every call opens a fresh connection. No retry
//! anywhere: a failed call fails the enclosing operation.

use fairhire_common::{Error, Result};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Per-call request timeout toward the scorer
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Anything that can score a feature payload
///
/// The batch adjuster is generic over this seam so its fan-out and failure
/// semantics are testable without a live upstream.
pub trait Scorer {
    fn predict(&self, payload: &Value) -> impl Future<Output = Result<Value>> + Send;
}

/// Client bound to one configured scoring service base URL
pub struct ScoringClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScoringClient {
    pub fn new(base_url: &str) -> Result<Self> {
        // pool_max_idle_per_host(0): never keep idle connections, the
        // upstream drops them in a way reqwest cannot detect
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issue one scoring call; no retry
    ///
    /// Transport errors, timeouts, and non-2xx responses all surface as
    /// `Error::Upstream`, carrying the upstream status when one was received
    /// and a message extracted from the upstream body when possible.
    pub async fn predict(&self, payload: &Value) -> Result<Value> {
        let url = format!("{}/predict", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::upstream_transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::upstream_transport(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Upstream {
                status: Some(status.as_u16()),
                message: extract_error_message(&body, status.as_u16()),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Upstream {
            status: Some(status.as_u16()),
            message: format!("Invalid JSON from scorer: {}", e),
        })
    }

    /// Spawn the periodic keep-alive ping against the upstream root
    ///
    /// Purely to keep the upstream from idling down. Fire-and-forget;
    /// failures are swallowed.
    pub fn spawn_keep_alive(self: &Arc<Self>, interval: Duration) {
        let client = Arc::clone(self);
        info!("Scorer keep-alive ping every {:?}", interval);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately, skip it
            loop {
                ticker.tick().await;
                match client.http.get(&client.base_url).send().await {
                    Ok(response) => debug!("Scorer keep-alive: {}", response.status()),
                    Err(e) => debug!("Scorer keep-alive failed: {}", e),
                }
            }
        });
    }
}

impl Scorer for ScoringClient {
    fn predict(&self, payload: &Value) -> impl Future<Output = Result<Value>> + Send {
        ScoringClient::predict(self, payload)
    }
}

/// Pull a human-readable message out of an upstream error body
///
/// Prefers an `error` or `message` JSON field, then the raw body text, then
/// the bare status code.
fn extract_error_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(message) = value.get(key).and_then(|m| m.as_str()) {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("Scoring service returned status {}", status)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_error_field() {
        let msg = extract_error_message(r#"{"error":"model not loaded"}"#, 503);
        assert_eq!(msg, "model not loaded");
    }

    #[test]
    fn error_message_falls_back_to_message_field() {
        let msg = extract_error_message(r#"{"message":"bad features"}"#, 422);
        assert_eq!(msg, "bad features");
    }

    #[test]
    fn error_message_falls_back_to_body_then_status() {
        assert_eq!(extract_error_message("plain failure", 500), "plain failure");
        assert_eq!(
            extract_error_message("   ", 502),
            "Scoring service returned status 502"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ScoringClient::new("http://scorer.example/").expect("client");
        assert_eq!(client.base_url, "http://scorer.example");
    }
}
