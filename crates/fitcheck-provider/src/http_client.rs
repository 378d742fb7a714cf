//! Shared HTTP plumbing for provider backends.
//!
//! Wraps a `reqwest::Client` with the two things every backend needs: a
//! caller-supplied timeout around the full round-trip, and classification
//! of HTTP status codes into the [`ProviderError`] taxonomy. There is
//! deliberately no retry here; a recorded per-angle outcome must reflect
//! exactly one attempt.

use fitcheck_utils::ProviderError;
use std::time::Duration;

/// Maximum number of body characters preserved in error messages.
const ERROR_BODY_CAP: usize = 256;

pub(crate) struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Construct the shared client.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Misconfiguration` if the underlying client
    /// cannot be built (e.g. TLS backend initialization failure).
    pub fn new() -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            ProviderError::Misconfiguration(format!("Failed to construct HTTP client: {e}"))
        })?;
        Ok(Self { client })
    }

    /// Start a POST request against `url`.
    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url)
    }

    /// Execute a request with the given timeout, classifying failures.
    ///
    /// # Errors
    ///
    /// - `Timeout` if the round-trip exceeds `timeout`
    /// - `ProviderAuth` for 401/403
    /// - `ProviderQuota` for 429
    /// - `ProviderOutage` for 5xx
    /// - `Transport` for connection errors and other non-success statuses
    pub async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
        provider: &str,
    ) -> Result<reqwest::Response, ProviderError> {
        let response = tokio::time::timeout(timeout, request.send())
            .await
            .map_err(|_| ProviderError::Timeout { duration: timeout })?
            .map_err(|e| ProviderError::Transport(format!("{provider} request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = format!(
            "{provider} returned HTTP {status}: {}",
            truncate(&body, ERROR_BODY_CAP)
        );

        Err(classify_status(status.as_u16(), detail))
    }
}

/// Map an HTTP status code to the provider error taxonomy.
pub(crate) fn classify_status(status: u16, detail: String) -> ProviderError {
    match status {
        401 | 403 => ProviderError::ProviderAuth(detail),
        429 => ProviderError::ProviderQuota(detail),
        500..=599 => ProviderError::ProviderOutage(detail),
        _ => ProviderError::Transport(detail),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars).collect();
        format!("{kept}…")
    }
}
