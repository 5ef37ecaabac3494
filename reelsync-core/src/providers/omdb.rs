use std::fmt;

use async_trait::async_trait;
use reelsync_model::{CrossReferenceIds, ImageSet, MediaKind};
use serde::Deserialize;

use super::http::ProviderHttp;
use crate::{
    error::ProviderError,
    ports::{ArtworkSet, ImageProvider},
};

const OMDB_BASE: &str = "https://www.omdbapi.com/";
const OMDB_MISSING: &str = "N/A";

/// Poster fallback from OMDb, keyed by the primary (IMDb) id.
///
/// OMDb only knows posters, so this step never fills the other slots.
#[derive(Clone)]
pub struct OmdbClient {
    http: ProviderHttp,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OmdbClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OmdbClient {
    pub fn new(http: ProviderHttp, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: OMDB_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ImageProvider for OmdbClient {
    fn name(&self) -> &'static str {
        "omdb"
    }

    async fn images(
        &self,
        _kind: MediaKind,
        ids: &CrossReferenceIds<'_>,
    ) -> Result<ArtworkSet, ProviderError> {
        let imdb_id = ids
            .primary()
            .ok_or(ProviderError::MissingIdentifier("primary"))?;

        let response: OmdbResponse = self
            .http
            .get_json(
                &self.base_url,
                &[("i", imdb_id), ("apikey", self.api_key.as_str())],
                &[],
            )
            .await?;

        response.into_artwork()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
}

impl OmdbResponse {
    fn into_artwork(self) -> Result<ArtworkSet, ProviderError> {
        if self.response.as_deref() == Some("False") {
            // OMDb answers 200 with an error payload for unknown ids and
            // exhausted daily quotas alike.
            return Err(match self.error.as_deref() {
                Some(message) if message.contains("limit") => {
                    ProviderError::RateLimited
                }
                Some(message) if message.contains("API key") => {
                    ProviderError::InvalidApiKey
                }
                _ => ProviderError::NotFound,
            });
        }

        let poster = self
            .poster
            .filter(|url| !url.trim().is_empty() && url != OMDB_MISSING)
            .map(|url| amazon_image_set(&url));

        Ok(ArtworkSet {
            poster,
            ..Default::default()
        })
    }
}

/// OMDb posters are Amazon media urls sized with an `SX300` token.
fn amazon_image_set(url: &str) -> ImageSet {
    if !url.contains("SX300") {
        return ImageSet::uniform(url);
    }

    ImageSet {
        full: url.replacen("SX300", "SX1500", 1),
        high: url.replacen("SX300", "SX1000", 1),
        medium: url.to_string(),
        thumb: url.replacen("SX300", "SX150", 1),
    }
}
