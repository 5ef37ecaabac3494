use async_trait::async_trait;
use reelsync_model::{ContentId, ContentRecord};
use sqlx::PgPool;
use tracing::debug;

use super::ContentStore;
use crate::error::StoreError;

/// Postgres-backed store keeping each record as a JSONB document.
#[derive(Clone, Debug)]
pub struct PostgresContentStore {
    pool: PgPool,
}

impl PostgresContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Apply the bundled migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        crate::MIGRATOR.run(&self.pool).await.map_err(|e| {
            StoreError::Backend(format!("Migration failed: {}", e))
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ContentStore for PostgresContentStore {
    async fn find(
        &self,
        id: &ContentId,
    ) -> Result<Option<ContentRecord>, StoreError> {
        let document = sqlx::query_scalar::<_, serde_json::Value>(
            r#"
            SELECT document
            FROM content_documents
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        document
            .map(serde_json::from_value::<ContentRecord>)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn write(
        &self,
        record: &ContentRecord,
    ) -> Result<ContentRecord, StoreError> {
        let document = serde_json::to_value(record)?;

        sqlx::query(
            r#"
            INSERT INTO content_documents (id, kind, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET kind = EXCLUDED.kind,
                document = EXCLUDED.document,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.media_kind().to_string())
        .bind(document)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %record.id, "content document written");
        Ok(record.clone())
    }

    async fn distinct_episode_seasons(
        &self,
        id: &ContentId,
    ) -> Result<Vec<u32>, StoreError> {
        let seasons = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT (episode->>'season')::BIGINT AS season
            FROM content_documents,
                 jsonb_array_elements(
                     COALESCE(document->'episodes', '[]'::jsonb)
                 ) AS episode
            WHERE id = $1
            ORDER BY season
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(seasons
            .into_iter()
            .filter_map(|season| u32::try_from(season).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsync_model::{
        ContentKind, Episode, Images, MediaKind, Rating, UserState,
    };

    fn show(episodes: &[(u32, u32)]) -> ContentRecord {
        let mut kind = ContentKind::empty(MediaKind::Show);
        if let ContentKind::Show(fields) = &mut kind {
            fields.episodes = episodes
                .iter()
                .map(|(season, number)| Episode {
                    season: *season,
                    number: *number,
                    ..Default::default()
                })
                .collect();
        }

        ContentRecord {
            id: ContentId::new("tt0944947"),
            secondary_id: "1399".into(),
            tertiary_id: "121361".into(),
            title: "Game of Thrones".into(),
            slug: "game-of-thrones".into(),
            synopsis: String::new(),
            genres: vec!["drama".into()],
            rating: Rating::default(),
            images: Images::placeholder(),
            year: Some(2011),
            runtime: Some(60),
            certification: None,
            language: None,
            created_at: 1,
            updated_at: 1,
            user_state: UserState::default(),
            kind,
        }
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn documents_round_trip_and_report_distinct_seasons(pool: PgPool) {
        let store = PostgresContentStore::new(pool);
        let record = show(&[(1, 1), (1, 2), (3, 1)]);

        store.write(&record).await.expect("write");
        let found = store.find(&record.id).await.expect("find");
        assert_eq!(found.as_ref(), Some(&record));

        let seasons = store
            .distinct_episode_seasons(&record.id)
            .await
            .expect("distinct seasons");
        assert_eq!(seasons, vec![1, 3]);
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn missing_document_has_no_seasons(pool: PgPool) {
        let store = PostgresContentStore::new(pool);
        let id = ContentId::new("tt0000000");

        assert!(store.find(&id).await.expect("find").is_none());
        assert!(
            store
                .distinct_episode_seasons(&id)
                .await
                .expect("distinct seasons")
                .is_empty()
        );
    }
}
