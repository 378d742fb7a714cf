//! Try-on service: orchestrate one run and persist the outcome.

use crate::orchestrator::MultiAngleOrchestrator;
use chrono::Utc;
use fitcheck_store::{RecordStore, StoreError, TryOnRecord};
use fitcheck_utils::{Caller, GenerationError, ImagePayload, ImageSource};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Caller-supplied metadata for a try-on.
#[derive(Debug, Clone, Default)]
pub struct TryOnOptions {
    /// Free-text description of the garment.
    pub garment_description: String,
    /// Tags to attach to the record.
    pub tags: Vec<String>,
    /// Whether the person image was an upload or a saved reference photo.
    pub image_source: ImageSource,
    /// Whether the record should be publicly visible.
    pub is_public: bool,
}

/// Failure of a try-on creation.
#[derive(Error, Debug)]
pub enum TryOnError {
    /// The orchestration run produced no usable primary image.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The record could not be persisted.
    #[error("failed to persist try-on record: {0}")]
    Store(#[from] StoreError),
}

/// Composes the orchestrator with a record store.
///
/// One successful call creates exactly one record; the core never touches
/// it again. Total generation failure persists nothing.
pub struct TryOnService {
    orchestrator: MultiAngleOrchestrator,
    store: Arc<dyn RecordStore>,
}

impl TryOnService {
    /// Wire a service over an orchestrator and a store.
    #[must_use]
    pub fn new(orchestrator: MultiAngleOrchestrator, store: Arc<dyn RecordStore>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }

    /// Run one orchestration and persist the result.
    ///
    /// # Errors
    ///
    /// Returns [`TryOnError::Generation`] when the run produced no usable
    /// primary image (map this to a user-facing retry prompt, never the
    /// internal detail), and [`TryOnError::Store`] when persistence fails.
    pub async fn create_try_on(
        &self,
        caller: &Caller,
        person: ImagePayload,
        garment: ImagePayload,
        options: TryOnOptions,
    ) -> Result<TryOnRecord, TryOnError> {
        let outcome = self.orchestrator.generate_all(&person, &garment).await?;

        let record = TryOnRecord {
            id: Uuid::new_v4(),
            user_id: caller.user_id(),
            result_image: outcome.primary().clone(),
            multi_angle: outcome.angle_images(),
            person_image: person,
            garment_image: garment,
            garment_description: options.garment_description,
            image_source: options.image_source,
            tags: options.tags,
            is_public: options.is_public,
            created_at: Utc::now(),
        };

        self.store.insert(record.clone()).await?;

        info!(
            record_id = %record.id,
            angles = ?record.multi_angle.present_angles(),
            owner = ?record.user_id,
            "try-on persisted"
        );

        Ok(record)
    }
}
