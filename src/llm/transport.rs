//! HTTP transport seam for the orchestrator.
//!
//! The orchestrator is generic over [`Transport`] so the candidate walk can
//! be exercised against a scripted transport in tests and against
//! [`HttpTransport`] (reqwest) in production.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, trace};

use super::ProviderError;

/// Status and body of a completed HTTP exchange, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One JSON POST with bearer auth.
///
/// `Err` means no HTTP response arrived at all (DNS, connect, timeout, reset).
/// Any status code, including 4xx/5xx, is an `Ok(RawResponse)`.
pub trait Transport: Send + Sync {
    fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &Value,
    ) -> impl Future<Output = Result<RawResponse, ProviderError>> + Send;
}

/// reqwest-backed transport. Cheap to clone: `Client` is an `Arc` inside.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport whose requests time out after `timeout_seconds`.
    pub fn new(timeout_seconds: u64) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, bearer: &str, body: &Value) -> Result<RawResponse, ProviderError> {
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(body)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(%url, payload = %json, "full inference request payload");
        }

        let response = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else {
                    "request"
                };
                ProviderError::Request(format!("{kind} error: {e}"))
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Request(format!("failed to read response body: {e}")))?;

        debug!(%url, status, body_len = body.len(), "inference response received");
        Ok(RawResponse { status, body })
    }
}
