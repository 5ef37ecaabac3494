#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use reelsync_core::{
    ProviderError, StoreError,
    config::{ReconcileConfig, SeasonCountStrategy},
    persistence::{ContentStore, InMemoryContentStore},
    ports::{
        ArtworkSet, EpisodeListing, ImageProvider, MetadataProvider,
        SeasonCatalog, SeasonListing, SummaryIds, TitleSummary,
    },
    reconcile::{CascadeStep, Reconciler},
    report::RecordingReporter,
};
use reelsync_model::{
    ContentId, ContentRecord, CrossReferenceIds, EpisodeTorrents, ImageSet,
    MediaKind, TorrentEntry,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("reelsync_core=debug")
        .try_init();
}

pub fn movie_summary() -> TitleSummary {
    TitleSummary {
        ids: SummaryIds {
            primary: Some("tt0133093".into()),
            secondary: Some("603".into()),
            tertiary: Some("603".into()),
        },
        title: "The Matrix".into(),
        overview: Some("A hacker learns the nature of his reality.".into()),
        rating: Some(8.7),
        votes: 24_000,
        genres: vec!["action".into(), "science-fiction".into()],
        runtime: Some(136),
        year: Some(1999),
        released: Some(922_233_600),
        certification: Some("R".into()),
        language: Some("en".into()),
        trailer: Some("https://youtube.com/watch?v=vKQi3bBA1y8".into()),
        ..Default::default()
    }
}

pub fn show_summary() -> TitleSummary {
    TitleSummary {
        ids: SummaryIds {
            primary: Some("tt0944947".into()),
            secondary: Some("1399".into()),
            tertiary: Some("121361".into()),
        },
        title: "Game of Thrones".into(),
        overview: Some("Seven noble families fight for the throne.".into()),
        rating: Some(9.0),
        votes: 111,
        genres: vec!["drama".into()],
        runtime: Some(60),
        year: Some(2011),
        network: Some("HBO".into()),
        status: Some("ended".into()),
        ..Default::default()
    }
}

/// Canonical catalog keyed by slug.
#[derive(Default)]
pub struct FakeMetadata {
    summaries: HashMap<String, TitleSummary>,
    pub watching_fails: bool,
}

impl FakeMetadata {
    pub fn with(mut self, slug: &str, summary: TitleSummary) -> Self {
        self.summaries.insert(slug.to_string(), summary);
        self
    }
}

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn summary(
        &self,
        _kind: MediaKind,
        slug: &str,
    ) -> Result<Option<TitleSummary>, ProviderError> {
        Ok(self.summaries.get(slug).cloned())
    }

    async fn watching(
        &self,
        _kind: MediaKind,
        _slug: &str,
    ) -> Result<u64, ProviderError> {
        if self.watching_fails {
            Err(ProviderError::Api("watching endpoint unavailable".into()))
        } else {
            Ok(3)
        }
    }
}

pub enum ImageAnswer {
    Artwork(ArtworkSet),
    RateLimited,
    NotFound,
}

pub struct FakeImages {
    name: &'static str,
    answer: ImageAnswer,
    calls: AtomicUsize,
}

impl FakeImages {
    pub fn new(name: &'static str, answer: ImageAnswer) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for FakeImages {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn images(
        &self,
        _kind: MediaKind,
        _ids: &CrossReferenceIds<'_>,
    ) -> Result<ArtworkSet, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            ImageAnswer::Artwork(artwork) => Ok(artwork.clone()),
            ImageAnswer::RateLimited => Err(ProviderError::RateLimited),
            ImageAnswer::NotFound => Err(ProviderError::NotFound),
        }
    }
}

pub fn artwork(
    provider: &str,
    fields: &[&str],
) -> ArtworkSet {
    let mut set = ArtworkSet::default();
    for field in fields {
        let url = format!("https://{provider}/{field}.jpg");
        let image = Some(ImageSet::uniform(url));
        match *field {
            "banner" => set.banner = image,
            "backdrop" => set.backdrop = image,
            "poster" => set.poster = image,
            "logo" => set.logo = image,
            other => panic!("unknown artwork field {other}"),
        }
    }
    set
}

/// Season catalog answering every season with episodes `1..=episodes`.
#[derive(Default)]
pub struct FakeSeasons {
    pub episodes_per_season: u32,
    pub failing: HashSet<u32>,
    calls: AtomicUsize,
}

impl FakeSeasons {
    pub fn new(episodes_per_season: u32) -> Self {
        Self {
            episodes_per_season,
            ..Default::default()
        }
    }

    pub fn failing(mut self, season: u32) -> Self {
        self.failing.insert(season);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SeasonCatalog for FakeSeasons {
    fn name(&self) -> &'static str {
        "fake-seasons"
    }

    async fn season(
        &self,
        _show_id: &str,
        season_number: u32,
    ) -> Result<SeasonListing, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&season_number) {
            return Err(ProviderError::Api("season endpoint exploded".into()));
        }

        let base = 1_300_000_000 + i64::from(season_number) * 31_536_000;
        Ok(SeasonListing {
            title: format!("Season {season_number}"),
            overview: Some(format!("Overview of season {season_number}")),
            air_date: Some(base),
            poster: Some(ImageSet::uniform(format!(
                "https://seasons/{season_number}.jpg"
            ))),
            episodes: (1..=self.episodes_per_season)
                .map(|number| EpisodeListing {
                    number,
                    title: format!("Episode {number}"),
                    overview: None,
                    air_date: Some(base + i64::from(number) * 604_800),
                    still: None,
                })
                .collect(),
        })
    }
}

/// Store whose reads succeed with nothing stored and whose writes fail.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl ContentStore for FailingStore {
    async fn find(
        &self,
        _id: &ContentId,
    ) -> Result<Option<ContentRecord>, StoreError> {
        Ok(None)
    }

    async fn write(
        &self,
        _record: &ContentRecord,
    ) -> Result<ContentRecord, StoreError> {
        Err(StoreError::Backend("disk full".into()))
    }

    async fn distinct_episode_seasons(
        &self,
        _id: &ContentId,
    ) -> Result<Vec<u32>, StoreError> {
        Ok(Vec::new())
    }
}

pub fn torrent(quality: &str, language: &str, seeds: u32) -> TorrentEntry {
    TorrentEntry {
        quality: quality.into(),
        language: language.into(),
        url: format!("magnet:?xt=urn:btih:{quality}-{language}-{seeds}"),
        seeds,
        peers: seeds / 3,
        size: 2_000_000_000,
        provider: Some("fake-scraper".into()),
    }
}

/// `season -> episode -> quality -> torrent` with one 720p torrent per
/// `(season, episode)` pair.
pub fn scraped_seasons(
    pairs: &[(u32, u32)],
    seeds: u32,
) -> BTreeMap<u32, BTreeMap<u32, EpisodeTorrents>> {
    let mut seasons: BTreeMap<u32, BTreeMap<u32, EpisodeTorrents>> =
        BTreeMap::new();
    for (season, episode) in pairs {
        let mut entry = torrent("720p", "en", seeds);
        entry.url = format!("magnet:?xt=urn:btih:s{season}e{episode}-{seeds}");
        seasons
            .entry(*season)
            .or_default()
            .insert(*episode, BTreeMap::from([("720p".to_string(), entry)]));
    }
    seasons
}

pub struct Harness {
    pub reconciler: Reconciler,
    pub store: InMemoryContentStore,
    pub reporter: RecordingReporter,
}

pub fn harness(
    metadata: FakeMetadata,
    steps: Vec<CascadeStep>,
    seasons: FakeSeasons,
    season_count: SeasonCountStrategy,
) -> Harness {
    init_tracing();
    let store = InMemoryContentStore::new();
    let reporter = RecordingReporter::new();
    let config = ReconcileConfig {
        season_count,
        ..Default::default()
    };

    let reconciler = Reconciler::new(
        Arc::new(metadata),
        steps,
        Arc::new(seasons),
        Arc::new(store.clone()),
        Arc::new(reporter.clone()),
        &config,
    );

    Harness {
        reconciler,
        store,
        reporter,
    }
}
