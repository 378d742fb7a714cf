//! fitcheck - Virtual try-on generation core
//!
//! fitcheck drives a generative image provider to composite a garment onto
//! a person across front, back, and side views, isolating per-view failure
//! and reconciling the outcome into one persisted try-on record with a
//! deterministic primary image.
//!
//! fitcheck can be used in two ways:
//! - **CLI**: the `fitcheck` binary runs one orchestration from image files
//! - **Library**: embed the orchestrator or the full service in your own
//!   application, supplying your own provider and record store
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! export GEMINI_API_KEY=...
//!
//! # Generate front/back/side try-on views
//! fitcheck tryon --person me.jpg --garment jacket.jpg --out results/
//!
//! # Inspect the effective prompt table
//! fitcheck prompts --angle back
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fitcheck::{Config, MultiAngleOrchestrator, PromptSet};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::discover()?;
//! let provider = Arc::from(fitcheck::provider::from_config(&config)?);
//! let orchestrator = MultiAngleOrchestrator::from_config(&config, provider, PromptSet::default());
//! # Ok(())
//! # }
//! ```
//!
//! # Partial failure
//!
//! A run returns whatever subset of angles succeeded; only a run with no
//! usable primary image fails, with
//! [`GenerationError::PrimaryGenerationFailed`]. Map that (and nothing
//! more detailed) to a user-facing retry prompt.

pub mod cli;

pub use fitcheck_config::{Config, ConfigError};
pub use fitcheck_engine::{
    GenerationRequest, GenerationResult, MultiAngleOrchestrator, MultiAngleResult, Pacer,
    SingleViewGenerator, TokioPacer, TryOnError, TryOnOptions, TryOnService,
};
pub use fitcheck_prompt::PromptSet;
pub use fitcheck_store::{AngleImages, MemoryStore, RecordStore, StoreError, TryOnRecord};
pub use fitcheck_utils::{
    Angle, Caller, GenerationError, ImagePayload, ImageSource, MediaType, ProviderError,
};

/// Provider backends and the [`ImageGenProvider`](provider::ImageGenProvider) trait.
pub mod provider {
    pub use fitcheck_provider::{
        GeminiBackend, ImageGenProvider, ProviderRequest, ProviderResponse, ResponsePart,
        from_config,
    };
}
