//! Generation engine for fitcheck
//!
//! Two components compose the core: the [`SingleViewGenerator`], a pure
//! single-attempt primitive that drives one provider call for one viewing
//! angle, and the [`MultiAngleOrchestrator`], which sequences it across
//! front/back/side with pacing, partial-failure isolation, and a fallback
//! policy for the primary (front) image. [`TryOnService`] composes the
//! orchestrator with a record store to persist one immutable record per
//! successful run.

mod generator;
mod orchestrator;
mod pacer;
mod result;
mod service;

pub use generator::{GenerationRequest, SingleViewGenerator};
pub use orchestrator::MultiAngleOrchestrator;
pub use pacer::{Pacer, TokioPacer};
pub use result::{GenerationResult, MultiAngleResult};
pub use service::{TryOnError, TryOnOptions, TryOnService};

// Test seam; not part of public API stability guarantees.
#[doc(hidden)]
pub use pacer::RecordingPacer;

pub use fitcheck_utils::GenerationError;
