//! Try-on record model and record store contract
//!
//! The generation core produces exactly one [`TryOnRecord`] per successful
//! orchestration run and never mutates it afterwards. Everything that does
//! mutate records (likes, views, visibility edits) lives in the excluded
//! CRUD layer, behind whatever real database a deployment uses; this crate
//! only defines the contract plus an in-memory implementation for tests
//! and the CLI.

mod memory;
mod record;

pub use memory::MemoryStore;
pub use record::{AngleImages, TryOnRecord};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Record store failure.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A record with this id already exists; records are immutable on
    /// create, so a second insert is always a caller bug.
    #[error("record {id} already exists")]
    Duplicate {
        /// The conflicting record id.
        id: Uuid,
    },

    /// Backend-specific failure (connectivity, serialization).
    #[error("record store backend error: {0}")]
    Backend(String),
}

/// Persistence contract for try-on records.
///
/// Insert-once semantics: the core creates a record and hands it over;
/// there is no update operation at this layer.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a newly created record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the id is already present, or
    /// [`StoreError::Backend`] for storage failures.
    async fn insert(&self, record: TryOnRecord) -> Result<(), StoreError>;

    /// Fetch a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] for storage failures; a missing
    /// record is `Ok(None)`.
    async fn get(&self, id: Uuid) -> Result<Option<TryOnRecord>, StoreError>;

    /// List a user's records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] for storage failures.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<TryOnRecord>, StoreError>;
}
