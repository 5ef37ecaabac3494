use std::fmt;

use async_trait::async_trait;
use reelsync_model::MediaKind;
use serde::{Deserialize, de::IgnoredAny};

use super::http::{ProviderHttp, non_empty, parse_air_date};
use crate::{
    error::ProviderError,
    ports::{MetadataProvider, SummaryIds, TitleSummary},
};

const TRAKT_BASE: &str = "https://api.trakt.tv";
const TRAKT_API_VERSION: &str = "2";

/// Canonical metadata from Trakt.
///
/// Ids are mapped as primary = IMDb, secondary = TMDB and tertiary = the
/// artwork catalog id (TVDB for shows, TMDB for movies).
#[derive(Clone)]
pub struct TraktClient {
    http: ProviderHttp,
    client_id: String,
    base_url: String,
}

impl fmt::Debug for TraktClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraktClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl TraktClient {
    pub fn new(http: ProviderHttp, client_id: impl Into<String>) -> Self {
        Self {
            http,
            client_id: client_id.into(),
            base_url: TRAKT_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn headers(&self) -> [(&'static str, &str); 3] {
        [
            ("content-type", "application/json"),
            ("trakt-api-version", TRAKT_API_VERSION),
            ("trakt-api-key", self.client_id.as_str()),
        ]
    }
}

#[async_trait]
impl MetadataProvider for TraktClient {
    async fn summary(
        &self,
        kind: MediaKind,
        slug: &str,
    ) -> Result<Option<TitleSummary>, ProviderError> {
        let url = format!("{}/{}/{}", self.base_url, kind.plural(), slug);
        let result = self
            .http
            .get_json::<_, TraktTitle>(
                &url,
                &[("extended", "full")],
                &self.headers(),
            )
            .await;

        match result {
            Ok(title) => Ok(Some(title.into_summary(kind))),
            Err(ProviderError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn watching(
        &self,
        kind: MediaKind,
        slug: &str,
    ) -> Result<u64, ProviderError> {
        let url =
            format!("{}/{}/{}/watching", self.base_url, kind.plural(), slug);
        let watchers: Vec<IgnoredAny> = self
            .http
            .get_json(&url, &[] as &[(&str, &str)], &self.headers())
            .await?;
        Ok(watchers.len() as u64)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TraktIds {
    #[serde(default)]
    imdb: Option<String>,
    #[serde(default)]
    tmdb: Option<u64>,
    #[serde(default)]
    tvdb: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TraktAirs {
    #[serde(default)]
    day: Option<String>,
    #[serde(default)]
    time: Option<String>,
}

/// Movie and show summaries share enough shape to use one payload.
#[derive(Debug, Clone, Default, Deserialize)]
struct TraktTitle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<u16>,
    #[serde(default)]
    ids: TraktIds,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    released: Option<String>,
    #[serde(default)]
    first_aired: Option<String>,
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(default)]
    certification: Option<String>,
    #[serde(default)]
    trailer: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    votes: Option<u64>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    genres: Option<Vec<String>>,
    #[serde(default)]
    network: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    airs: Option<TraktAirs>,
}

impl TraktTitle {
    fn into_summary(self, kind: MediaKind) -> TitleSummary {
        let tmdb = self.ids.tmdb.map(|id| id.to_string());
        let tertiary = match kind {
            MediaKind::Movie => tmdb.clone(),
            MediaKind::Show => self.ids.tvdb.map(|id| id.to_string()),
        };
        let released = match kind {
            MediaKind::Movie => self.released.as_deref(),
            MediaKind::Show => self.first_aired.as_deref(),
        }
        .and_then(parse_air_date);
        let airs = self.airs.unwrap_or_default();

        TitleSummary {
            ids: SummaryIds {
                primary: non_empty(self.ids.imdb),
                secondary: tmdb,
                tertiary,
            },
            title: self.title.unwrap_or_default(),
            overview: non_empty(self.overview),
            rating: self.rating,
            votes: self.votes.unwrap_or_default(),
            genres: self.genres.unwrap_or_default(),
            runtime: self.runtime,
            year: self.year,
            released,
            certification: non_empty(self.certification),
            language: non_empty(self.language),
            trailer: non_empty(self.trailer),
            network: non_empty(self.network),
            status: non_empty(self.status),
            country: non_empty(self.country),
            air_day: non_empty(airs.day),
            air_time: non_empty(airs.time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW: &str = r#"{
        "title": "Game of Thrones",
        "year": 2011,
        "ids": {"trakt": 1390, "slug": "game-of-thrones", "tvdb": 121361,
                "imdb": "tt0944947", "tmdb": 1399},
        "overview": "Seven noble families fight for control.",
        "first_aired": "2011-04-18T01:00:00.000Z",
        "airs": {"day": "Sunday", "time": "21:00", "timezone": "America/New_York"},
        "runtime": 60,
        "certification": "TV-MA",
        "network": "HBO",
        "country": "us",
        "trailer": null,
        "status": "ended",
        "rating": 9.0,
        "votes": 111,
        "language": "en",
        "genres": ["drama", "fantasy"]
    }"#;

    const MOVIE: &str = r#"{
        "title": "TRON: Legacy",
        "year": 2010,
        "ids": {"trakt": 1, "slug": "tron-legacy-2010", "imdb": "tt1104001",
                "tmdb": 20526},
        "released": "2010-12-16",
        "runtime": 125,
        "rating": 7.3,
        "votes": 42,
        "genres": [],
        "certification": ""
    }"#;

    #[test]
    fn show_ids_use_tvdb_for_artwork() {
        let title: TraktTitle = serde_json::from_str(SHOW).unwrap();
        let summary = title.into_summary(MediaKind::Show);

        assert_eq!(
            summary.ids.complete(),
            Some(("tt0944947", "1399", "121361"))
        );
        assert_eq!(summary.network.as_deref(), Some("HBO"));
        assert_eq!(summary.air_day.as_deref(), Some("Sunday"));
        assert_eq!(summary.released, Some(1_303_084_800));
        assert_eq!(summary.genres, vec!["drama", "fantasy"]);
    }

    #[test]
    fn movie_ids_use_tmdb_for_artwork() {
        let title: TraktTitle = serde_json::from_str(MOVIE).unwrap();
        let summary = title.into_summary(MediaKind::Movie);

        assert_eq!(
            summary.ids.complete(),
            Some(("tt1104001", "20526", "20526"))
        );
        assert_eq!(summary.runtime, Some(125));
        assert_eq!(summary.certification, None);
        assert!(summary.genres.is_empty());
    }

    #[test]
    fn missing_imdb_leaves_ids_incomplete() {
        let title: TraktTitle =
            serde_json::from_str(r#"{"title": "x", "ids": {"tmdb": 5}}"#)
                .unwrap();
        let summary = title.into_summary(MediaKind::Movie);

        assert_eq!(summary.ids.complete(), None);
    }
}
