use std::fmt;

use async_trait::async_trait;
use reelsync_model::{CrossReferenceIds, ImageSet, MediaKind};
use serde::Deserialize;

use super::http::{ProviderHttp, non_empty, parse_air_date};
use crate::{
    error::ProviderError,
    ports::{
        ArtworkSet, EpisodeListing, ImageCandidate, ImageProvider,
        SeasonCatalog, SeasonListing, pick_localized,
    },
};

const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const TMDB_V3_BASE: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Clone, Copy)]
pub enum PosterSize {
    W92,
    W154,
    W185,
    W342,
    W500,
    W780,
    Original,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W92 => "w92",
            PosterSize::W154 => "w154",
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
            PosterSize::Original => "original",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum BackdropSize {
    W300,
    W780,
    W1280,
    Original,
}

impl BackdropSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackdropSize::W300 => "w300",
            BackdropSize::W780 => "w780",
            BackdropSize::W1280 => "w1280",
            BackdropSize::Original => "original",
        }
    }
}

/// Episode still sizes.
#[derive(Debug, Clone, Copy)]
pub enum StillSize {
    W92,
    W185,
    W300,
    Original,
}

impl StillSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            StillSize::W92 => "w92",
            StillSize::W185 => "w185",
            StillSize::W300 => "w300",
            StillSize::Original => "original",
        }
    }
}

/// Build a poster url from a poster path
pub fn poster_url(path: &str, size: PosterSize) -> String {
    format!("{}/{}{}", TMDB_IMAGE_BASE, size.as_str(), path)
}

/// Build a backdrop url from a backdrop path
pub fn backdrop_url(path: &str, size: BackdropSize) -> String {
    format!("{}/{}{}", TMDB_IMAGE_BASE, size.as_str(), path)
}

pub fn still_url(path: &str, size: StillSize) -> String {
    format!("{}/{}{}", TMDB_IMAGE_BASE, size.as_str(), path)
}

fn poster_set(path: &str) -> ImageSet {
    ImageSet {
        full: poster_url(path, PosterSize::Original),
        high: poster_url(path, PosterSize::W780),
        medium: poster_url(path, PosterSize::W500),
        thumb: poster_url(path, PosterSize::W185),
    }
}

fn backdrop_set(path: &str) -> ImageSet {
    ImageSet {
        full: backdrop_url(path, BackdropSize::Original),
        high: backdrop_url(path, BackdropSize::W1280),
        medium: backdrop_url(path, BackdropSize::W780),
        thumb: backdrop_url(path, BackdropSize::W300),
    }
}

// Logos share the poster buckets up to w500.
fn logo_set(path: &str) -> ImageSet {
    ImageSet {
        full: poster_url(path, PosterSize::Original),
        high: poster_url(path, PosterSize::W500),
        medium: poster_url(path, PosterSize::W185),
        thumb: poster_url(path, PosterSize::W92),
    }
}

fn still_set(path: &str) -> ImageSet {
    ImageSet {
        full: still_url(path, StillSize::Original),
        high: still_url(path, StillSize::W300),
        medium: still_url(path, StillSize::W185),
        thumb: still_url(path, StillSize::W92),
    }
}

/// TMDB artwork (keyed by the secondary id) and season catalog.
#[derive(Clone)]
pub struct TmdbClient {
    http: ProviderHttp,
    api_key: String,
    language: String,
    base_url: String,
}

impl fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbClient")
            .field("language", &self.language)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl TmdbClient {
    pub fn new(
        http: ProviderHttp,
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            language: language.into(),
            base_url: TMDB_V3_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ImageProvider for TmdbClient {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn images(
        &self,
        kind: MediaKind,
        ids: &CrossReferenceIds<'_>,
    ) -> Result<ArtworkSet, ProviderError> {
        let tmdb_id = ids
            .secondary()
            .ok_or(ProviderError::MissingIdentifier("secondary"))?;
        let segment = match kind {
            MediaKind::Movie => "movie",
            MediaKind::Show => "tv",
        };
        let url = format!("{}/{}/{}/images", self.base_url, segment, tmdb_id);
        let languages = format!("{},null", self.language);

        let response: TmdbImagesResponse = self
            .http
            .get_json(
                &url,
                &[
                    ("api_key", self.api_key.as_str()),
                    ("include_image_language", languages.as_str()),
                ],
                &[],
            )
            .await?;

        Ok(response.into_artwork(&self.language))
    }
}

#[async_trait]
impl SeasonCatalog for TmdbClient {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn season(
        &self,
        show_id: &str,
        season_number: u32,
    ) -> Result<SeasonListing, ProviderError> {
        if show_id.trim().is_empty() {
            return Err(ProviderError::MissingIdentifier("secondary"));
        }
        let url = format!(
            "{}/tv/{}/season/{}",
            self.base_url, show_id, season_number
        );

        let response: TmdbSeason = self
            .http
            .get_json(
                &url,
                &[
                    ("api_key", self.api_key.as_str()),
                    ("language", self.language.as_str()),
                ],
                &[],
            )
            .await?;

        Ok(response.into_listing())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TmdbImage {
    file_path: String,
    #[serde(default)]
    iso_639_1: Option<String>,
    #[serde(default)]
    vote_average: f64,
}

impl TmdbImage {
    fn candidate(&self) -> ImageCandidate {
        ImageCandidate {
            url: self.file_path.clone(),
            language: self.iso_639_1.clone(),
            score: self.vote_average,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct TmdbImagesResponse {
    backdrops: Vec<TmdbImage>,
    posters: Vec<TmdbImage>,
    logos: Vec<TmdbImage>,
}

impl TmdbImagesResponse {
    fn into_artwork(self, language: &str) -> ArtworkSet {
        let pick = |images: &[TmdbImage]| {
            let candidates: Vec<ImageCandidate> =
                images.iter().map(TmdbImage::candidate).collect();
            pick_localized(&candidates, language)
                .map(|candidate| candidate.url.clone())
        };

        // TMDB has no banner artwork.
        ArtworkSet {
            banner: None,
            backdrop: pick(&self.backdrops).map(|path| backdrop_set(&path)),
            poster: pick(&self.posters).map(|path| poster_set(&path)),
            logo: pick(&self.logos).map(|path| logo_set(&path)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TmdbEpisode {
    episode_number: u32,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    air_date: Option<String>,
    #[serde(default)]
    still_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct TmdbSeason {
    name: Option<String>,
    overview: Option<String>,
    air_date: Option<String>,
    poster_path: Option<String>,
    episodes: Vec<TmdbEpisode>,
}

impl TmdbSeason {
    fn into_listing(self) -> SeasonListing {
        SeasonListing {
            title: self.name.unwrap_or_default(),
            overview: non_empty(self.overview),
            air_date: self.air_date.as_deref().and_then(parse_air_date),
            poster: non_empty(self.poster_path).map(|path| poster_set(&path)),
            episodes: self
                .episodes
                .into_iter()
                .map(|episode| EpisodeListing {
                    number: episode.episode_number,
                    title: episode.name.unwrap_or_default(),
                    overview: non_empty(episode.overview),
                    air_date: episode
                        .air_date
                        .as_deref()
                        .and_then(parse_air_date),
                    still: non_empty(episode.still_path)
                        .map(|path| still_set(&path)),
                })
                .collect(),
        }
    }
}
