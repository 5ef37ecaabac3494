use async_trait::async_trait;
use reelsync_model::ImageSet;

use crate::error::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EpisodeListing {
    pub number: u32,
    pub title: String,
    pub overview: Option<String>,
    /// Epoch seconds.
    pub air_date: Option<i64>,
    pub still: Option<ImageSet>,
}

/// One season as the season/episode catalog describes it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeasonListing {
    pub title: String,
    pub overview: Option<String>,
    /// Epoch seconds.
    pub air_date: Option<i64>,
    pub poster: Option<ImageSet>,
    pub episodes: Vec<EpisodeListing>,
}

/// Season/episode catalog used to assemble show records.
#[async_trait]
pub trait SeasonCatalog: Send + Sync {
    fn name(&self) -> &'static str;

    /// `show_id` is the catalog's own id of the show (the secondary
    /// cross-reference id in the default wiring).
    async fn season(
        &self,
        show_id: &str,
        season_number: u32,
    ) -> Result<SeasonListing, ProviderError>;
}
