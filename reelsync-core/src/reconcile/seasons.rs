use std::{any::type_name_of_val, collections::BTreeMap, fmt, sync::Arc};

use futures::{StreamExt, stream};
use reelsync_model::{
    ContentRecord, Episode, EpisodeTorrents, ImageSlot, Season, ShowFields,
};
use tracing::{debug, info};

use crate::{
    error::ProviderError,
    ports::{SeasonCatalog, SeasonListing},
    report::{Incident, Reporter},
};

/// A season fetched from the catalog, ready to be put into a show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledSeason {
    pub season: Season,
    pub episodes: Vec<Episode>,
}

impl AssembledSeason {
    fn from_listing(
        number: u32,
        listing: SeasonListing,
        episodes_by_number: &BTreeMap<u32, EpisodeTorrents>,
    ) -> Self {
        let episodes = listing
            .episodes
            .into_iter()
            .filter_map(|listed| {
                let torrents = episodes_by_number.get(&listed.number)?;
                Some(Episode {
                    season: number,
                    number: listed.number,
                    title: listed.title,
                    synopsis: listed.overview.unwrap_or_default(),
                    first_aired: listed.air_date,
                    image: listed
                        .still
                        .map(ImageSlot::Resolved)
                        .unwrap_or_default(),
                    torrents: torrents.clone(),
                })
            })
            .collect();

        let title = if listing.title.trim().is_empty() {
            format!("Season {number}")
        } else {
            listing.title
        };

        Self {
            season: Season {
                number,
                title,
                synopsis: listing.overview.unwrap_or_default(),
                first_aired: listing.air_date,
                image: listing
                    .poster
                    .map(ImageSlot::Resolved)
                    .unwrap_or_default(),
            },
            episodes,
        }
    }

    /// Put the season into `show`, replacing a header with the same number
    /// and episodes with the same `(season, number)`.
    pub fn apply(self, show: &mut ShowFields) {
        show.upsert_season(self.season);
        for episode in self.episodes {
            show.upsert_episode(episode);
        }
    }
}

/// Builds the season tree of a show from the season catalog.
#[derive(Clone)]
pub struct SeasonAssembler {
    catalog: Arc<dyn SeasonCatalog>,
    reporter: Arc<dyn Reporter>,
    concurrency: usize,
}

impl fmt::Debug for SeasonAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeasonAssembler")
            .field("catalog", &type_name_of_val(self.catalog.as_ref()))
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl SeasonAssembler {
    pub fn new(
        catalog: Arc<dyn SeasonCatalog>,
        reporter: Arc<dyn Reporter>,
        concurrency: usize,
    ) -> Self {
        Self {
            catalog,
            reporter,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch one season and keep the catalog episodes that have scraped
    /// torrents.
    pub async fn fetch_season(
        &self,
        show_id: &str,
        season_number: u32,
        episodes_by_number: &BTreeMap<u32, EpisodeTorrents>,
    ) -> Result<AssembledSeason, ProviderError> {
        let listing = self.catalog.season(show_id, season_number).await?;
        Ok(AssembledSeason::from_listing(
            season_number,
            listing,
            episodes_by_number,
        ))
    }

    /// Fetch `season_number` and put it into `show`.
    pub async fn assemble_season(
        &self,
        show: &mut ContentRecord,
        episodes_by_number: &BTreeMap<u32, EpisodeTorrents>,
        season_number: u32,
    ) -> Result<(), ProviderError> {
        let show_id = show.secondary_id.clone();
        let assembled = self
            .fetch_season(&show_id, season_number, episodes_by_number)
            .await?;

        if let Some(fields) = show.show_mut() {
            assembled.apply(fields);
            fields.recompute_num_seasons();
            fields.recompute_latest_aired();
        }
        Ok(())
    }

    /// Fetch every scraped season with at most `concurrency` requests in
    /// flight, then put the successful ones into `show` in season order.
    ///
    /// A failing season is reported and skipped. Returns the number of
    /// seasons assembled.
    pub async fn assemble_all(
        &self,
        show: &mut ContentRecord,
        scraped: &BTreeMap<u32, BTreeMap<u32, EpisodeTorrents>>,
    ) -> usize {
        if show.show().is_none() {
            return 0;
        }

        let show_id = show.secondary_id.clone();
        let mut fetched: Vec<(u32, Result<AssembledSeason, ProviderError>)> =
            stream::iter(scraped.iter())
                .map(|(number, episodes)| {
                    let show_id = show_id.as_str();
                    async move {
                        let result =
                            self.fetch_season(show_id, *number, episodes).await;
                        (*number, result)
                    }
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;
        fetched.sort_by_key(|(number, _)| *number);

        let id = show.id.clone();
        let mut assembled = 0;
        let Some(fields) = show.show_mut() else {
            return 0;
        };
        for (number, result) in fetched {
            match result {
                Ok(season) => {
                    debug!(
                        season = number,
                        episodes = season.episodes.len(),
                        "season assembled"
                    );
                    season.apply(fields);
                    assembled += 1;
                }
                Err(err) => self.reporter.report(&Incident::SeasonFetchFailed {
                    id: id.clone(),
                    season: number,
                    error: err.to_string(),
                }),
            }
        }

        fields.recompute_num_seasons();
        fields.recompute_latest_aired();
        info!(
            id = %id,
            requested = scraped.len(),
            assembled,
            "show seasons assembled"
        );
        assembled
    }
}
