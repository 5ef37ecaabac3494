//! Persisted catalog documents.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    ids::{ContentId, CrossReferenceIds},
    image::{ImageSlot, Images},
    media_type::MediaKind,
    rating::Rating,
    torrent::TorrentEntry,
};

/// Genre used when the canonical provider lists none.
pub const UNKNOWN_GENRE: &str = "unknown";

/// Per-user flags the host application writes. The engine copies them from
/// the stored document on every update and never derives them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UserState {
    pub bookmarked: bool,
    pub bookmarked_on: Option<i64>,
    pub watched: bool,
    pub watched_on: Option<i64>,
    pub downloaded: bool,
    pub downloaded_on: Option<i64>,
    pub downloaded_path: Option<String>,
}

/// A movie or show document reconciled by the engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentRecord {
    pub id: ContentId,
    pub secondary_id: String,
    pub tertiary_id: String,
    pub title: String,
    pub slug: String,
    pub synopsis: String,
    pub genres: Vec<String>,
    pub rating: Rating,
    #[cfg_attr(feature = "serde", serde(default))]
    pub images: Images,
    pub year: Option<u16>,
    /// Minutes.
    pub runtime: Option<u32>,
    pub certification: Option<String>,
    pub language: Option<String>,
    /// Epoch seconds.
    pub created_at: i64,
    /// Epoch seconds.
    pub updated_at: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub user_state: UserState,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: ContentKind,
}

impl ContentRecord {
    pub fn media_kind(&self) -> MediaKind {
        match self.kind {
            ContentKind::Movie(_) => MediaKind::Movie,
            ContentKind::Show(_) => MediaKind::Show,
        }
    }

    pub fn cross_ids(&self) -> CrossReferenceIds<'_> {
        CrossReferenceIds {
            primary: self.id.as_str(),
            secondary: &self.secondary_id,
            tertiary: &self.tertiary_id,
        }
    }

    pub fn movie(&self) -> Option<&MovieFields> {
        match &self.kind {
            ContentKind::Movie(movie) => Some(movie),
            ContentKind::Show(_) => None,
        }
    }

    pub fn movie_mut(&mut self) -> Option<&mut MovieFields> {
        match &mut self.kind {
            ContentKind::Movie(movie) => Some(movie),
            ContentKind::Show(_) => None,
        }
    }

    pub fn show(&self) -> Option<&ShowFields> {
        match &self.kind {
            ContentKind::Show(show) => Some(show),
            ContentKind::Movie(_) => None,
        }
    }

    pub fn show_mut(&mut self) -> Option<&mut ShowFields> {
        match &mut self.kind {
            ContentKind::Show(show) => Some(show),
            ContentKind::Movie(_) => None,
        }
    }
}

/// Variant body selected by the content-type tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "lowercase")
)]
pub enum ContentKind {
    Movie(MovieFields),
    Show(ShowFields),
}

impl ContentKind {
    pub fn empty(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => ContentKind::Movie(MovieFields::default()),
            MediaKind::Show => ContentKind::Show(ShowFields::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovieFields {
    /// Unique by `(quality, language)`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub torrents: Vec<TorrentEntry>,
    /// Epoch seconds.
    pub released: Option<i64>,
    pub trailer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShowFields {
    #[cfg_attr(feature = "serde", serde(default))]
    pub seasons: Vec<Season>,
    /// Unique by `(season, number)`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub episodes: Vec<Episode>,
    /// Always derived from `episodes`, see
    /// [`ShowFields::recompute_num_seasons`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub num_seasons: u32,
    /// Epoch seconds.
    pub latest_episode_aired_at: Option<i64>,
    pub network: Option<String>,
    pub status: Option<String>,
    pub country: Option<String>,
    pub air_day: Option<String>,
    pub air_time: Option<String>,
}

impl ShowFields {
    pub fn episode(&self, season: u32, number: u32) -> Option<&Episode> {
        self.episodes
            .iter()
            .find(|ep| ep.season == season && ep.number == number)
    }

    /// Distinct season numbers present among the episodes.
    pub fn distinct_episode_seasons(&self) -> BTreeSet<u32> {
        self.episodes.iter().map(|ep| ep.season).collect()
    }

    pub fn recompute_num_seasons(&mut self) {
        self.num_seasons = self.distinct_episode_seasons().len() as u32;
    }

    pub fn recompute_latest_aired(&mut self) {
        let latest = self.episodes.iter().filter_map(|ep| ep.first_aired).max();
        self.latest_episode_aired_at =
            match (self.latest_episode_aired_at, latest) {
                (Some(current), Some(latest)) => Some(current.max(latest)),
                (current, latest) => current.or(latest),
            };
    }

    /// Insert `episode`, replacing any entry with the same `(season, number)`.
    pub fn upsert_episode(&mut self, episode: Episode) {
        match self.episodes.iter_mut().find(|ep| {
            ep.season == episode.season && ep.number == episode.number
        }) {
            Some(existing) => *existing = episode,
            None => self.episodes.push(episode),
        }
    }

    /// Insert `season`, replacing any header with the same number, and keep
    /// the list ordered by season number.
    pub fn upsert_season(&mut self, season: Season) {
        match self.seasons.iter_mut().find(|s| s.number == season.number) {
            Some(existing) => *existing = season,
            None => self.seasons.push(season),
        }
        self.seasons.sort_by_key(|s| s.number);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Season {
    pub number: u32,
    pub title: String,
    pub synopsis: String,
    /// Epoch seconds.
    pub first_aired: Option<i64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: ImageSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Episode {
    pub season: u32,
    pub number: u32,
    pub title: String,
    pub synopsis: String,
    /// Epoch seconds.
    pub first_aired: Option<i64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: ImageSlot,
    /// Keyed by quality.
    #[cfg_attr(feature = "serde", serde(default))]
    pub torrents: BTreeMap<String, TorrentEntry>,
}
