//! In-memory record store.

use crate::{RecordStore, StoreError, TryOnRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// `HashMap`-backed [`RecordStore`] used by tests and the CLI. Listing is
/// newest-first, matching how history views consume it.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, TryOnRecord>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, record: TryOnRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(StoreError::Duplicate { id: record.id });
        }
        records.insert(record.id, record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<TryOnRecord>, StoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<TryOnRecord>, StoreError> {
        let records = self.records.read().await;
        let mut owned: Vec<TryOnRecord> = records
            .values()
            .filter(|r| r.user_id == Some(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }
}
