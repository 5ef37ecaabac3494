use async_trait::async_trait;
use reelsync_model::MediaKind;

use crate::error::ProviderError;

/// Cross-reference ids as the canonical provider reports them. Any of them
/// may be absent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryIds {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub tertiary: Option<String>,
}

impl SummaryIds {
    /// All three ids, or `None` when any is missing or blank.
    pub fn complete(&self) -> Option<(&str, &str, &str)> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        Some((
            present(&self.primary)?,
            present(&self.secondary)?,
            present(&self.tertiary)?,
        ))
    }
}

/// Canonical attributes of one title.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TitleSummary {
    pub ids: SummaryIds,
    pub title: String,
    pub overview: Option<String>,
    /// 0-10 scale.
    pub rating: Option<f64>,
    pub votes: u64,
    pub genres: Vec<String>,
    /// Minutes as reported upstream.
    pub runtime: Option<u32>,
    pub year: Option<u16>,
    /// Epoch seconds of the release (movies) or first air date (shows).
    pub released: Option<i64>,
    pub certification: Option<String>,
    pub language: Option<String>,
    pub trailer: Option<String>,
    pub network: Option<String>,
    pub status: Option<String>,
    pub country: Option<String>,
    pub air_day: Option<String>,
    pub air_time: Option<String>,
}

/// The authoritative catalog every reconciliation starts from.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// `Ok(None)` when the catalog has no record for `slug`.
    async fn summary(
        &self,
        kind: MediaKind,
        slug: &str,
    ) -> Result<Option<TitleSummary>, ProviderError>;

    /// Number of users currently watching the title.
    async fn watching(
        &self,
        kind: MediaKind,
        slug: &str,
    ) -> Result<u64, ProviderError>;
}
