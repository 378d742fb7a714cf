//! Core types for the image generation provider abstraction

use async_trait::async_trait;
use fitcheck_utils::{ImagePayload, ProviderError};
use std::time::Duration;

/// Input to a single provider invocation.
///
/// Immutable once constructed: one person image, one garment image, the
/// angle-specific instruction, and the caller-supplied timeout bounding the
/// round-trip.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Photo of the person.
    pub person: ImagePayload,
    /// Photo of the garment.
    pub garment: ImagePayload,
    /// Natural-language instruction for this view.
    pub prompt: String,
    /// Model override; `None` uses the backend default.
    pub model: Option<String>,
    /// Upper bound on the provider round-trip.
    pub timeout: Duration,
}

impl ProviderRequest {
    /// Create a request using the backend's default model.
    #[must_use]
    pub fn new(
        person: ImagePayload,
        garment: ImagePayload,
        prompt: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            person,
            garment,
            prompt: prompt.into(),
            model: None,
            timeout,
        }
    }

    /// Override the model for this invocation.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// One part of a provider response.
///
/// Providers may interleave text with image data even when asked for
/// image-only output; callers scan the parts in order and decide what to
/// keep.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePart {
    /// Binary image data.
    Image(ImagePayload),
    /// Text the model emitted alongside (or instead of) an image.
    Text(String),
}

/// A provider response: zero or more content parts in provider order.
///
/// An empty or text-only response is administratively successful: the
/// provider answered but declined to synthesize. Interpreting that is the
/// caller's job, not the backend's.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResponse {
    /// Content parts in the order the provider emitted them.
    pub parts: Vec<ResponsePart>,
}

impl ProviderResponse {
    /// Wrap a list of parts.
    #[must_use]
    pub fn new(parts: Vec<ResponsePart>) -> Self {
        Self { parts }
    }
}

/// Trait for image generation provider implementations.
///
/// All backends implement this trait, allowing the generation engine to
/// work with any provider without knowing implementation details. One call
/// is one attempt: backends never retry internally, so the orchestration
/// layer retains full control of retry and pacing policy.
#[async_trait]
pub trait ImageGenProvider: Send + Sync {
    /// Ask the provider to composite the garment onto the person.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` for any failure during invocation:
    /// transport errors, auth/quota/outage classifications, and timeouts.
    /// A response without an image part is NOT an error at this layer.
    async fn generate(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;
}
