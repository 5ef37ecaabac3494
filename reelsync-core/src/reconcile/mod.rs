//! The reconciliation cycle: fetch, resolve artwork, merge, persist.
//!
//! [`Reconciler`] is the entry point a scheduler calls once per scraped
//! title. Movies and shows share the fetch and artwork steps and then go
//! through their own merge path selected by the content-type tag.

pub mod cascade;
pub mod episodes;
pub mod fetcher;
pub mod movie;
pub mod seasons;

use std::{fmt, sync::Arc};

use anyhow::Context;
use reelsync_model::{ContentRecord, ScrapedPayload, ScrapedTitle, TorrentEntry};
use tracing::{info, instrument};

pub use cascade::{
    CascadeStep, ImageResolutionCascade, StepOutcome, StepReport, StepRole,
};
pub use episodes::EpisodeMerger;
pub use fetcher::MetadataFetcher;
pub use movie::TorrentMerger;
pub use seasons::{AssembledSeason, SeasonAssembler};

use crate::{
    config::ReconcileConfig,
    error::{Result, StoreError},
    persistence::{ContentStore, ContentUpsert},
    ports::{MetadataProvider, SeasonCatalog},
    providers::{
        FanartClient, OmdbClient, ProviderHttp, TmdbClient, TraktClient,
    },
    report::{Incident, Reporter},
};

/// Runs reconciliation cycles against one store.
///
/// Cheap to clone and safe to share across tasks. Callers must not run two
/// cycles for the same content id at once; the store is last-writer-wins.
#[derive(Clone)]
pub struct Reconciler {
    fetcher: MetadataFetcher,
    cascade: ImageResolutionCascade,
    assembler: SeasonAssembler,
    episodes: EpisodeMerger,
    upsert: ContentUpsert,
    reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("fetcher", &self.fetcher)
            .field("cascade", &self.cascade)
            .field("assembler", &self.assembler)
            .field("episodes", &self.episodes)
            .finish()
    }
}

impl Reconciler {
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        image_steps: Vec<CascadeStep>,
        seasons: Arc<dyn SeasonCatalog>,
        store: Arc<dyn ContentStore>,
        reporter: Arc<dyn Reporter>,
        config: &ReconcileConfig,
    ) -> Self {
        let upsert = ContentUpsert::new(store);

        Self {
            fetcher: MetadataFetcher::new(metadata, Arc::clone(&reporter)),
            cascade: ImageResolutionCascade::new(
                image_steps,
                Arc::clone(&reporter),
            ),
            assembler: SeasonAssembler::new(
                seasons,
                Arc::clone(&reporter),
                config.season_workers(),
            ),
            episodes: EpisodeMerger::new(
                upsert.clone(),
                Arc::clone(&reporter),
                config.season_count,
            ),
            upsert,
            reporter,
        }
    }

    /// Wire the bundled HTTP adapters: Trakt for canonical metadata, then
    /// fanart.tv, OMDb and TMDB as artwork steps, with TMDB also serving
    /// the season catalog.
    pub fn from_config(
        config: &ReconcileConfig,
        store: Arc<dyn ContentStore>,
        reporter: Arc<dyn Reporter>,
    ) -> anyhow::Result<Self> {
        let keys = &config.providers;
        let trakt_client_id = keys
            .trakt_client_id
            .as_deref()
            .context("providers.trakt_client_id is not configured")?;
        let tmdb_api_key = keys
            .tmdb_api_key
            .as_deref()
            .context("providers.tmdb_api_key is not configured")?;
        let omdb_api_key = keys
            .omdb_api_key
            .as_deref()
            .context("providers.omdb_api_key is not configured")?;
        let fanart_api_key = keys
            .fanart_api_key
            .as_deref()
            .context("providers.fanart_api_key is not configured")?;

        let http = ProviderHttp::new(keys.request_timeout())
            .context("Failed to build provider HTTP client")?;

        let trakt = TraktClient::new(http.clone(), trakt_client_id);
        let fanart =
            FanartClient::new(http.clone(), fanart_api_key, &config.language);
        let omdb = OmdbClient::new(http.clone(), omdb_api_key);
        let tmdb =
            Arc::new(TmdbClient::new(http, tmdb_api_key, &config.language));

        let steps = vec![
            CascadeStep::primary(Arc::new(fanart)),
            CascadeStep::fallback(Arc::new(omdb)),
            CascadeStep::secondary(tmdb.clone()),
        ];

        Ok(Self::new(Arc::new(trakt), steps, tmdb, store, reporter, config))
    }

    /// Run one reconciliation cycle for `title`.
    ///
    /// `Err` only when the canonical fetch fails. A cycle that could not be
    /// committed is reported and returns `Ok(None)`.
    #[instrument(skip_all, fields(slug = %title.slug, kind = %title.kind()))]
    pub async fn reconcile(
        &self,
        title: &ScrapedTitle,
    ) -> Result<Option<ContentRecord>> {
        let mut draft = self.fetcher.fetch(title.kind(), &title.slug).await?;
        let steps = self.cascade.resolve(&mut draft).await;
        info!(
            id = %draft.id,
            image_steps = steps.len(),
            images_complete = draft.images.is_complete(),
            "canonical record prepared"
        );

        let saved = match &title.payload {
            ScrapedPayload::Movie { torrents } => {
                self.reconcile_movie(draft, torrents).await
            }
            ScrapedPayload::Show { seasons } => {
                self.assembler.assemble_all(&mut draft, seasons).await;
                self.episodes.merge(draft).await
            }
        };

        Ok(saved)
    }

    async fn reconcile_movie(
        &self,
        mut draft: ContentRecord,
        torrents: &[TorrentEntry],
    ) -> Option<ContentRecord> {
        let id = draft.id.clone();
        match self.try_reconcile_movie(&mut draft, torrents).await {
            Ok(saved) => {
                info!(id = %saved.id, "movie reconciled");
                Some(saved)
            }
            Err(err) => {
                self.reporter.report(&Incident::store_failure(id, &err));
                None
            }
        }
    }

    async fn try_reconcile_movie(
        &self,
        draft: &mut ContentRecord,
        torrents: &[TorrentEntry],
    ) -> std::result::Result<ContentRecord, StoreError> {
        let found = self.upsert.store().find(&draft.id).await?;
        let stored_torrents = found
            .as_ref()
            .and_then(ContentRecord::movie)
            .map(|movie| movie.torrents.as_slice())
            .unwrap_or_default();

        if let Some(movie) = draft.movie_mut() {
            movie.torrents = TorrentMerger::merge(torrents, stored_torrents);
        }

        self.upsert.upsert_against(draft.clone(), found.as_ref()).await
    }
}
