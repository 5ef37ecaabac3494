use std::{any::type_name_of_val, fmt, sync::Arc};

use reelsync_model::ContentRecord;
use tracing::debug;

use super::ContentStore;
use crate::error::StoreError;

/// The single place reconciled records are written.
///
/// Writes are find-then-write: when a document with the same id exists, the
/// user-state flags and the creation timestamp are copied from it onto the
/// incoming record before the write, everything else is replaced.
#[derive(Clone)]
pub struct ContentUpsert {
    store: Arc<dyn ContentStore>,
}

impl fmt::Debug for ContentUpsert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentUpsert")
            .field("store", &type_name_of_val(self.store.as_ref()))
            .finish()
    }
}

impl ContentUpsert {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    pub async fn upsert(
        &self,
        record: ContentRecord,
    ) -> Result<ContentRecord, StoreError> {
        let found = self.store.find(&record.id).await?;
        self.upsert_against(record, found.as_ref()).await
    }

    /// Same as [`ContentUpsert::upsert`] for callers that already looked the
    /// stored document up during the same cycle.
    pub async fn upsert_against(
        &self,
        mut record: ContentRecord,
        found: Option<&ContentRecord>,
    ) -> Result<ContentRecord, StoreError> {
        match found {
            Some(found) => {
                if found.media_kind() != record.media_kind() {
                    return Err(StoreError::KindMismatch {
                        id: record.id.clone(),
                        stored: found.media_kind(),
                        incoming: record.media_kind(),
                    });
                }
                preserve_stored_state(&mut record, found);
                debug!(id = %record.id, "updating stored content");
            }
            None => debug!(id = %record.id, "inserting new content"),
        }

        self.store.write(&record).await
    }
}

fn preserve_stored_state(record: &mut ContentRecord, found: &ContentRecord) {
    record.user_state = found.user_state.clone();
    record.created_at = found.created_at;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryContentStore;
    use reelsync_model::{
        ContentId, ContentKind, ContentRecord, Images, MediaKind, Rating,
        UserState,
    };

    fn record(title: &str, kind: MediaKind, now: i64) -> ContentRecord {
        ContentRecord {
            id: ContentId::new("tt0133093"),
            secondary_id: "603".into(),
            tertiary_id: "603".into(),
            title: title.into(),
            slug: "the-matrix-1999".into(),
            synopsis: String::new(),
            genres: vec!["action".into()],
            rating: Rating::default(),
            images: Images::placeholder(),
            year: Some(1999),
            runtime: Some(136),
            certification: None,
            language: Some("en".into()),
            created_at: now,
            updated_at: now,
            user_state: UserState::default(),
            kind: ContentKind::empty(kind),
        }
    }

    #[tokio::test]
    async fn inserts_when_absent() {
        let store = Arc::new(InMemoryContentStore::new());
        let upsert = ContentUpsert::new(store.clone());

        let written = upsert
            .upsert(record("The Matrix", MediaKind::Movie, 10))
            .await
            .expect("insert");

        assert_eq!(written.title, "The Matrix");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn preserves_user_state_and_creation_time() {
        let store = Arc::new(InMemoryContentStore::new());
        let mut stored = record("Old title", MediaKind::Movie, 10);
        stored.user_state = UserState {
            bookmarked: true,
            bookmarked_on: Some(11),
            watched: true,
            watched_on: Some(12),
            downloaded: true,
            downloaded_on: Some(13),
            downloaded_path: Some("/media/matrix.mkv".into()),
        };
        store.insert(stored.clone()).await;

        let upsert = ContentUpsert::new(store.clone());
        let written = upsert
            .upsert(record("The Matrix", MediaKind::Movie, 99))
            .await
            .expect("update");

        assert_eq!(written.title, "The Matrix");
        assert_eq!(written.updated_at, 99);
        assert_eq!(written.created_at, 10);
        assert_eq!(written.user_state, stored.user_state);

        let found = store.find(&written.id).await.unwrap().unwrap();
        assert_eq!(found, written);
    }

    #[tokio::test]
    async fn refuses_to_change_the_kind_of_a_record() {
        let store = Arc::new(InMemoryContentStore::new());
        store.insert(record("Movie", MediaKind::Movie, 1)).await;

        let upsert = ContentUpsert::new(store.clone());
        let err = upsert
            .upsert(record("Show", MediaKind::Show, 2))
            .await
            .expect_err("kind mismatch");

        assert!(matches!(err, StoreError::KindMismatch { .. }));
        assert_eq!(store.writes(), 0);
    }
}
