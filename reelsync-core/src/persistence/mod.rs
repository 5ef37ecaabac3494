//! Persistence contracts and stores for content documents.

use async_trait::async_trait;
use reelsync_model::{ContentId, ContentRecord};

use crate::error::StoreError;

pub mod memory;
#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub mod postgres;
pub mod upsert;

pub use memory::InMemoryContentStore;
#[cfg(feature = "database")]
pub use postgres::PostgresContentStore;
pub use upsert::ContentUpsert;

/// Document store keyed by the stable content id.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn find(
        &self,
        id: &ContentId,
    ) -> Result<Option<ContentRecord>, StoreError>;

    /// Replace the document with `record.id`, inserting it when absent.
    async fn write(
        &self,
        record: &ContentRecord,
    ) -> Result<ContentRecord, StoreError>;

    /// Distinct `episodes.season` values of one stored document. Empty when
    /// the document does not exist or is not a show.
    async fn distinct_episode_seasons(
        &self,
        id: &ContentId,
    ) -> Result<Vec<u32>, StoreError>;
}
