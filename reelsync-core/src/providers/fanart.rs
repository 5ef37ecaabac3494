use std::fmt;

use async_trait::async_trait;
use reelsync_model::{CrossReferenceIds, ImageSet, MediaKind};
use serde::Deserialize;

use super::http::ProviderHttp;
use crate::{
    error::ProviderError,
    ports::{ArtworkSet, ImageCandidate, ImageProvider, pick_localized},
};

const FANART_BASE: &str = "https://webservice.fanart.tv/v3";

/// Artwork from fanart.tv, keyed by the tertiary id (TVDB for shows, TMDB
/// for movies).
#[derive(Clone)]
pub struct FanartClient {
    http: ProviderHttp,
    api_key: String,
    language: String,
    base_url: String,
}

impl fmt::Debug for FanartClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanartClient")
            .field("language", &self.language)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FanartClient {
    pub fn new(
        http: ProviderHttp,
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            language: language.into(),
            base_url: FANART_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ImageProvider for FanartClient {
    fn name(&self) -> &'static str {
        "fanart"
    }

    async fn images(
        &self,
        kind: MediaKind,
        ids: &CrossReferenceIds<'_>,
    ) -> Result<ArtworkSet, ProviderError> {
        let id = ids
            .tertiary()
            .ok_or(ProviderError::MissingIdentifier("tertiary"))?;
        let segment = match kind {
            MediaKind::Movie => "movies",
            MediaKind::Show => "tv",
        };
        let url = format!("{}/{}/{}", self.base_url, segment, id);

        let response: FanartResponse = self
            .http
            .get_json(&url, &[("api_key", self.api_key.as_str())], &[])
            .await?;

        Ok(response.into_artwork(kind, &self.language))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct FanartImage {
    url: String,
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    likes: Option<String>,
}

impl FanartImage {
    fn candidate(&self) -> ImageCandidate {
        // fanart.tv tags language-neutral art as "00".
        let language = self
            .lang
            .clone()
            .filter(|lang| !lang.is_empty() && lang != "00");
        ImageCandidate {
            url: self.url.clone(),
            language,
            score: self
                .likes
                .as_deref()
                .and_then(|likes| likes.parse::<f64>().ok())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FanartResponse {
    moviebanner: Vec<FanartImage>,
    moviebackground: Vec<FanartImage>,
    movieposter: Vec<FanartImage>,
    hdmovielogo: Vec<FanartImage>,
    movielogo: Vec<FanartImage>,
    tvbanner: Vec<FanartImage>,
    showbackground: Vec<FanartImage>,
    tvposter: Vec<FanartImage>,
    hdtvlogo: Vec<FanartImage>,
    clearlogo: Vec<FanartImage>,
}

impl FanartResponse {
    fn into_artwork(self, kind: MediaKind, language: &str) -> ArtworkSet {
        let pick = |images: &[FanartImage]| {
            let candidates: Vec<ImageCandidate> =
                images.iter().map(FanartImage::candidate).collect();
            pick_localized(&candidates, language)
                .map(|candidate| fanart_image_set(&candidate.url))
        };

        match kind {
            MediaKind::Movie => ArtworkSet {
                banner: pick(&self.moviebanner),
                backdrop: pick(&self.moviebackground),
                poster: pick(&self.movieposter),
                logo: pick(&self.hdmovielogo).or_else(|| pick(&self.movielogo)),
            },
            MediaKind::Show => ArtworkSet {
                banner: pick(&self.tvbanner),
                backdrop: pick(&self.showbackground),
                poster: pick(&self.tvposter),
                logo: pick(&self.hdtvlogo).or_else(|| pick(&self.clearlogo)),
            },
        }
    }
}

/// fanart.tv serves a downscaled copy of every asset under `/preview/`.
fn fanart_image_set(url: &str) -> ImageSet {
    let preview = url.replacen("/fanart/", "/preview/", 1);
    ImageSet {
        full: url.to_string(),
        high: url.to_string(),
        medium: preview.clone(),
        thumb: preview,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TV: &str = r#"{
        "name": "Game of Thrones",
        "thetvdb_id": "121361",
        "hdtvlogo": [
            {"id": "1", "url": "https://assets.fanart.tv/fanart/tv/121361/hdtvlogo/de.png", "lang": "de", "likes": "40"},
            {"id": "2", "url": "https://assets.fanart.tv/fanart/tv/121361/hdtvlogo/en.png", "lang": "en", "likes": "3"}
        ],
        "tvposter": [
            {"id": "3", "url": "https://assets.fanart.tv/fanart/tv/121361/tvposter/neutral.jpg", "lang": "00", "likes": "7"}
        ],
        "showbackground": []
    }"#;

    #[test]
    fn show_artwork_prefers_english_and_neutral_entries() {
        let response: FanartResponse = serde_json::from_str(TV).unwrap();
        let artwork = response.into_artwork(MediaKind::Show, "en");

        let logo = artwork.logo.expect("logo");
        assert!(logo.full.ends_with("/hdtvlogo/en.png"));
        assert!(logo.thumb.contains("/preview/tv/121361/"));

        let poster = artwork.poster.expect("poster");
        assert!(poster.full.ends_with("/tvposter/neutral.jpg"));

        assert!(artwork.backdrop.is_none());
        assert!(artwork.banner.is_none());
    }

    #[test]
    fn movie_logo_falls_back_to_standard_logo() {
        let response: FanartResponse = serde_json::from_str(
            r#"{"movielogo": [{"id": "9", "url": "https://assets.fanart.tv/fanart/movies/603/movielogo/a.png", "lang": "en", "likes": "1"}]}"#,
        )
        .unwrap();
        let artwork = response.into_artwork(MediaKind::Movie, "en");

        assert!(artwork.logo.is_some());
        assert!(artwork.poster.is_none());
    }

    #[tokio::test]
    async fn blank_tertiary_id_is_a_missing_identifier() {
        let http = ProviderHttp::with_client(reqwest::Client::new());
        let client = FanartClient::new(http, "key", "en")
            .with_base_url("http://127.0.0.1:9");
        let ids = CrossReferenceIds {
            primary: "tt0944947",
            secondary: "1399",
            tertiary: "",
        };

        let err = client
            .images(MediaKind::Show, &ids)
            .await
            .expect_err("no tertiary id");
        assert!(matches!(err, ProviderError::MissingIdentifier("tertiary")));
    }
}
