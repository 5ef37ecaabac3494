use std::{any::type_name_of_val, fmt, sync::Arc};

use chrono::Utc;
use reelsync_model::{
    ContentId, ContentKind, ContentRecord, Images, MediaKind, MovieFields,
    Rating, ShowFields, UNKNOWN_GENRE, UserState,
};
use tracing::{debug, info};

use crate::{
    error::{ProviderError, ReconcileError, Result},
    ports::{MetadataProvider, TitleSummary},
    report::{Incident, Reporter},
};

/// Builds the draft record of one title from the canonical catalog.
#[derive(Clone)]
pub struct MetadataFetcher {
    provider: Arc<dyn MetadataProvider>,
    reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for MetadataFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataFetcher")
            .field("provider", &type_name_of_val(self.provider.as_ref()))
            .finish()
    }
}

impl MetadataFetcher {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self { provider, reporter }
    }

    /// Fetch the canonical summary and watcher count for `slug`.
    ///
    /// Fails with [`ReconcileError::NotFound`] when the catalog has no record
    /// or the record lacks any of the three cross-reference ids. Other
    /// summary failures are [`ReconcileError::TransientProvider`]. A failed
    /// watcher lookup only degrades the count to 0.
    pub async fn fetch(
        &self,
        kind: MediaKind,
        slug: &str,
    ) -> Result<ContentRecord> {
        let summary = match self.provider.summary(kind, slug).await {
            Ok(Some(summary)) => summary,
            Ok(None) | Err(ProviderError::NotFound) => {
                info!(slug, %kind, "canonical catalog has no record");
                return Err(ReconcileError::NotFound {
                    slug: slug.to_string(),
                });
            }
            Err(source) => {
                return Err(ReconcileError::TransientProvider {
                    slug: slug.to_string(),
                    source,
                });
            }
        };

        let Some((primary, secondary, tertiary)) = summary.ids.complete()
        else {
            info!(slug, ids = ?summary.ids, "record lacks cross-reference ids");
            return Err(ReconcileError::NotFound {
                slug: slug.to_string(),
            });
        };
        let (primary, secondary, tertiary) = (
            primary.to_string(),
            secondary.to_string(),
            tertiary.to_string(),
        );

        let watching = match self.provider.watching(kind, slug).await {
            Ok(count) => count,
            Err(err) => {
                self.reporter.report(&Incident::WatchingUnavailable {
                    slug: slug.to_string(),
                    error: err.to_string(),
                });
                0
            }
        };

        debug!(slug, id = %primary, watching, "fetched canonical summary");
        Ok(draft_record(
            kind,
            slug,
            ContentId::new(primary),
            secondary,
            tertiary,
            summary,
            watching,
        ))
    }
}

fn draft_record(
    kind: MediaKind,
    slug: &str,
    id: ContentId,
    secondary_id: String,
    tertiary_id: String,
    summary: TitleSummary,
    watching: u64,
) -> ContentRecord {
    let now = Utc::now().timestamp();

    let mut genres: Vec<String> = summary
        .genres
        .into_iter()
        .filter(|genre| !genre.trim().is_empty())
        .collect();
    if genres.is_empty() {
        genres.push(UNKNOWN_GENRE.to_string());
    }

    let rating = Rating::from_raw(
        summary.rating.unwrap_or_default(),
        summary.votes,
        watching,
    );

    let body = match kind {
        MediaKind::Movie => ContentKind::Movie(MovieFields {
            torrents: Vec::new(),
            released: summary.released,
            trailer: summary.trailer,
        }),
        MediaKind::Show => ContentKind::Show(ShowFields {
            network: summary.network,
            status: summary.status,
            country: summary.country,
            air_day: summary.air_day,
            air_time: summary.air_time,
            ..Default::default()
        }),
    };

    ContentRecord {
        id,
        secondary_id,
        tertiary_id,
        title: summary.title,
        slug: slug.to_string(),
        synopsis: summary.overview.unwrap_or_default(),
        genres,
        rating,
        images: Images::placeholder(),
        year: summary.year,
        runtime: summary.runtime.filter(|minutes| *minutes > 0),
        certification: summary.certification,
        language: summary.language,
        created_at: now,
        updated_at: now,
        user_state: UserState::default(),
        kind: body,
    }
}
