//! Error taxonomy for the generation core.
//!
//! Two layers: [`ProviderError`] covers the transport-level failures of the
//! external image generation provider, and [`GenerationError`] covers the
//! per-angle and whole-run outcomes of the orchestration built on top of it.

use std::time::Duration;
use thiserror::Error;

/// Transport-level failure from the image generation provider.
///
/// Classification mirrors what the HTTP layer can observe: auth failures,
/// quota exhaustion, and outages are distinguished so operators can tell a
/// revoked key from a rate limit from a provider incident. The original
/// cause text is always preserved in the variant payload.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure (connectivity, malformed response body).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider authentication failure (401, 403, missing API key).
    #[error("Provider authentication error: {0}")]
    ProviderAuth(String),

    /// Provider quota/rate limit exceeded (429).
    #[error("Provider quota exceeded: {0}")]
    ProviderQuota(String),

    /// Provider service outage (5xx errors).
    #[error("Provider outage: {0}")]
    ProviderOutage(String),

    /// Request exceeded the caller-supplied timeout.
    #[error("Timeout after {duration:?}")]
    Timeout {
        /// The timeout that elapsed.
        duration: Duration,
    },

    /// Configuration error (missing API key, invalid endpoint).
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    /// Unsupported backend or feature.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Outcome classification for a single try-on view generation.
///
/// `NoImageProduced` and `Failed` are recoverable at the orchestrator level:
/// they become per-angle absences in the result map. Only
/// `PrimaryGenerationFailed` escapes a whole orchestration run.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The provider responded but emitted no image part. Administratively
    /// the call succeeded; the model declined or failed to synthesize.
    /// Distinct from a transport failure.
    #[error("provider returned no image part in its response")]
    NoImageProduced,

    /// Transport or provider-side error; the cause is preserved for
    /// diagnostics.
    #[error("view generation failed: {0}")]
    Failed(#[from] ProviderError),

    /// The fallback front-view generation also failed, so the run produced
    /// no usable primary image. The only error raised by a full
    /// orchestration run; callers surface it as a retry prompt.
    #[error("primary image generation failed, including the fallback attempt")]
    PrimaryGenerationFailed,
}

impl GenerationError {
    /// Whether this failure is absorbed into a per-angle result slot
    /// rather than aborting the orchestration run.
    #[must_use]
    pub fn is_per_angle(&self) -> bool {
        !matches!(self, Self::PrimaryGenerationFailed)
    }
}
