//! Image generation provider abstraction for fitcheck
//!
//! This crate provides a trait-based system for invoking generative image
//! models over HTTP. All providers implement the [`ImageGenProvider`]
//! trait, allowing the generation engine to work with any provider without
//! knowing implementation details.
//!
//! Backends are single-attempt by contract: retry, fallback, and pacing
//! policy live in the orchestration layer, never here.

mod gemini_backend;
pub(crate) mod http_client;
mod types;

// Test seam; not part of public API stability guarantees.
#[doc(hidden)]
pub mod mock;

pub use fitcheck_config as config;
pub use fitcheck_utils::ProviderError;
pub use gemini_backend::GeminiBackend;
pub use types::{ImageGenProvider, ProviderRequest, ProviderResponse, ResponsePart};

use fitcheck_config::Config;

/// Create an image generation backend from configuration.
///
/// Only the `gemini` backend ships today; the name indirection exists so a
/// deployment can swap providers through configuration alone.
///
/// # Errors
///
/// Returns `ProviderError::Unsupported` if the configured backend is
/// unknown, and `ProviderError::Misconfiguration` if backend-specific
/// configuration (such as the API key) is invalid.
pub fn from_config(config: &Config) -> Result<Box<dyn ImageGenProvider>, ProviderError> {
    match config.backend() {
        "gemini" => {
            let backend = GeminiBackend::new_from_config(config)?;
            Ok(Box::new(backend))
        }
        unknown => Err(ProviderError::Unsupported(format!(
            "Unknown image generation backend '{unknown}'. Supported backends: gemini."
        ))),
    }
}
