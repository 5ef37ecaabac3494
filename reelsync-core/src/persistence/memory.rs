use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use reelsync_model::{ContentId, ContentRecord};
use tokio::sync::Mutex;

use super::ContentStore;
use crate::error::StoreError;

/// Process-local store for embedding hosts and tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryContentStore {
    records: Arc<Mutex<HashMap<ContentId, ContentRecord>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document without counting it as a write.
    pub async fn insert(&self, record: ContentRecord) {
        let mut guard = self.records.lock().await;
        guard.insert(record.id.clone(), record);
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// Number of `write` calls served so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn find(
        &self,
        id: &ContentId,
    ) -> Result<Option<ContentRecord>, StoreError> {
        let guard = self.records.lock().await;
        Ok(guard.get(id).cloned())
    }

    async fn write(
        &self,
        record: &ContentRecord,
    ) -> Result<ContentRecord, StoreError> {
        let mut guard = self.records.lock().await;
        guard.insert(record.id.clone(), record.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(record.clone())
    }

    async fn distinct_episode_seasons(
        &self,
        id: &ContentId,
    ) -> Result<Vec<u32>, StoreError> {
        let guard = self.records.lock().await;
        Ok(guard
            .get(id)
            .and_then(ContentRecord::show)
            .map(|show| show.distinct_episode_seasons().into_iter().collect())
            .unwrap_or_default())
    }
}
