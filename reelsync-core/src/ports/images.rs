use async_trait::async_trait;
use reelsync_model::{CrossReferenceIds, ImageField, ImageSet, MediaKind};

use crate::error::ProviderError;

/// Artwork a provider could supply for one title. `None` means the provider
/// has nothing usable for that slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtworkSet {
    pub banner: Option<ImageSet>,
    pub backdrop: Option<ImageSet>,
    pub poster: Option<ImageSet>,
    pub logo: Option<ImageSet>,
}

impl ArtworkSet {
    pub fn get(&self, field: ImageField) -> Option<&ImageSet> {
        match field {
            ImageField::Banner => self.banner.as_ref(),
            ImageField::Backdrop => self.backdrop.as_ref(),
            ImageField::Poster => self.poster.as_ref(),
            ImageField::Logo => self.logo.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        ImageField::ALL.iter().all(|field| self.get(*field).is_none())
    }
}

/// One artwork catalog consulted by the image cascade.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Short, lowercase identifier (`"tmdb"`, `"fanart"`, ...).
    fn name(&self) -> &'static str;

    /// Look up artwork. Implementations pick the cross-reference id they are
    /// keyed by and answer [`ProviderError::MissingIdentifier`] when it is
    /// blank.
    async fn images(
        &self,
        kind: MediaKind,
        ids: &CrossReferenceIds<'_>,
    ) -> Result<ArtworkSet, ProviderError>;
}

/// A raw image entry as listed by an artwork catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCandidate {
    pub url: String,
    /// ISO-639-1 tag, `None` for language-neutral artwork.
    pub language: Option<String>,
    /// Provider-specific popularity (votes, likes).
    pub score: f64,
}

/// Pick the candidate to use for a slot.
///
/// Entries tagged with `language` or untagged are preferred over any other
/// language; within the preferred group the highest score wins and the
/// earlier entry wins ties. Falls back to the best entry overall when no
/// entry is preferred.
pub fn pick_localized<'a>(
    candidates: &'a [ImageCandidate],
    language: &str,
) -> Option<&'a ImageCandidate> {
    let usable = || {
        candidates
            .iter()
            .filter(|candidate| !candidate.url.trim().is_empty())
    };

    let preferred = best_by_score(usable().filter(|candidate| {
        match candidate.language.as_deref() {
            None | Some("") => true,
            Some(tag) => tag.eq_ignore_ascii_case(language),
        }
    }));

    preferred.or_else(|| best_by_score(usable()))
}

fn best_by_score<'a>(
    candidates: impl Iterator<Item = &'a ImageCandidate>,
) -> Option<&'a ImageCandidate> {
    candidates.fold(None, |best: Option<&ImageCandidate>, candidate| {
        match best {
            Some(current) if current.score >= candidate.score => Some(current),
            _ => Some(candidate),
        }
    })
}
