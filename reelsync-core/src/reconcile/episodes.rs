use std::sync::Arc;

use reelsync_model::{ContentRecord, EpisodeTorrents, ShowFields};
use tracing::{debug, info};

use crate::{
    config::SeasonCountStrategy,
    error::StoreError,
    persistence::ContentUpsert,
    report::{Incident, Reporter},
};

/// Reconciles an assembled show with its stored document and persists it.
#[derive(Clone)]
pub struct EpisodeMerger {
    upsert: ContentUpsert,
    reporter: Arc<dyn Reporter>,
    season_count: SeasonCountStrategy,
}

impl std::fmt::Debug for EpisodeMerger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpisodeMerger")
            .field("upsert", &self.upsert)
            .field("season_count", &self.season_count)
            .finish()
    }
}

impl EpisodeMerger {
    pub fn new(
        upsert: ContentUpsert,
        reporter: Arc<dyn Reporter>,
        season_count: SeasonCountStrategy,
    ) -> Self {
        Self {
            upsert,
            reporter,
            season_count,
        }
    }

    /// Merge `show` into the stored document and persist the result.
    ///
    /// Returns `None` when the merge or the write failed; the failure is
    /// reported and the cycle counts as not committed.
    pub async fn merge(&self, show: ContentRecord) -> Option<ContentRecord> {
        let id = show.id.clone();
        match self.try_merge(show).await {
            Ok(saved) => Some(saved),
            Err(err) => {
                self.reporter.report(&Incident::store_failure(id, &err));
                None
            }
        }
    }

    async fn try_merge(
        &self,
        mut show: ContentRecord,
    ) -> Result<ContentRecord, StoreError> {
        let found = self.upsert.store().find(&show.id).await?;

        if let Some(stored) = found.as_ref() {
            let incoming_kind = show.media_kind();
            let (Some(incoming), Some(stored_fields)) =
                (show.show_mut(), stored.show())
            else {
                return Err(StoreError::KindMismatch {
                    id: stored.id.clone(),
                    stored: stored.media_kind(),
                    incoming: incoming_kind,
                });
            };
            merge_show(incoming, stored_fields);
        } else {
            debug!(id = %show.id, "first save of show");
        }

        self.persist(show, found.as_ref()).await
    }

    async fn persist(
        &self,
        mut show: ContentRecord,
        found: Option<&ContentRecord>,
    ) -> Result<ContentRecord, StoreError> {
        match self.season_count {
            SeasonCountStrategy::InMemory => {
                if let Some(fields) = show.show_mut() {
                    fields.recompute_num_seasons();
                }
                let saved = self.upsert.upsert_against(show, found).await?;
                info!(id = %saved.id, "show reconciled");
                Ok(saved)
            }
            SeasonCountStrategy::StoreQuery => {
                let mut saved = self.upsert.upsert_against(show, found).await?;
                let store = self.upsert.store();
                let seasons = store.distinct_episode_seasons(&saved.id).await?;
                if let Some(fields) = saved.show_mut() {
                    fields.num_seasons = seasons.len() as u32;
                }
                let saved = store.write(&saved).await?;
                info!(
                    id = %saved.id,
                    seasons = seasons.len(),
                    "show reconciled"
                );
                Ok(saved)
            }
        }
    }
}

/// Fold the stored show into the incoming one.
///
/// Stored episodes matched by `(season, number)` are reconciled tier by
/// tier and replace the incoming entry in place; unmatched stored episodes
/// and seasons are appended unchanged.
pub fn merge_show(incoming: &mut ShowFields, stored: &ShowFields) {
    for stored_episode in &stored.episodes {
        let matched = incoming.episodes.iter_mut().find(|episode| {
            episode.season == stored_episode.season
                && episode.number == stored_episode.number
        });

        match matched {
            Some(episode) => {
                incoming.latest_episode_aired_at = later(
                    incoming.latest_episode_aired_at,
                    stored_episode.first_aired,
                );
                merge_torrents(&mut episode.torrents, &stored_episode.torrents);
            }
            None => incoming.episodes.push(stored_episode.clone()),
        }
    }

    for season in &stored.seasons {
        if !incoming.seasons.iter().any(|s| s.number == season.number) {
            incoming.seasons.push(season.clone());
        }
    }
    incoming.seasons.sort_by_key(|season| season.number);
}

fn later(current: Option<i64>, aired: Option<i64>) -> Option<i64> {
    match (current, aired) {
        (Some(current), Some(aired)) => Some(current.max(aired)),
        (current, aired) => current.or(aired),
    }
}

/// Per quality tier: the stored torrent replaces the incoming one when it
/// has strictly more seeds or is the same release. Tiers only the stored
/// side has are carried over.
pub fn merge_torrents(
    incoming: &mut EpisodeTorrents,
    stored: &EpisodeTorrents,
) {
    for (quality, stored_torrent) in stored {
        match incoming.get_mut(quality) {
            Some(current) => {
                if stored_torrent.seeds > current.seeds
                    || stored_torrent.same_release(current)
                {
                    *current = stored_torrent.clone();
                }
            }
            None => {
                incoming.insert(quality.clone(), stored_torrent.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsync_model::{Episode, Season, TorrentEntry};
    use std::collections::BTreeMap;

    fn torrent(quality: &str, url: &str, seeds: u32) -> TorrentEntry {
        TorrentEntry {
            quality: quality.into(),
            language: "en".into(),
            url: url.into(),
            seeds,
            ..Default::default()
        }
    }

    fn episode(season: u32, number: u32, torrents: &[TorrentEntry]) -> Episode {
        Episode {
            season,
            number,
            title: format!("S{season:02}E{number:02}"),
            first_aired: Some(i64::from(season * 100 + number)),
            torrents: torrents
                .iter()
                .map(|t| (t.quality.clone(), t.clone()))
                .collect::<BTreeMap<_, _>>(),
            ..Default::default()
        }
    }

    #[test]
    fn tiers_are_reconciled_independently() {
        let mut incoming = BTreeMap::from([
            ("720p".to_string(), torrent("720p", "magnet:new-720", 40)),
            ("1080p".to_string(), torrent("1080p", "magnet:new-1080", 40)),
            ("480p".to_string(), torrent("480p", "magnet:same", 90)),
        ]);
        let stored = BTreeMap::from([
            ("720p".to_string(), torrent("720p", "magnet:old-720", 80)),
            ("1080p".to_string(), torrent("1080p", "magnet:old-1080", 10)),
            ("480p".to_string(), torrent("480p", "magnet:same", 1)),
            ("2160p".to_string(), torrent("2160p", "magnet:old-2160", 3)),
        ]);

        merge_torrents(&mut incoming, &stored);

        assert_eq!(incoming["720p"].url, "magnet:old-720");
        assert_eq!(incoming["1080p"].url, "magnet:new-1080");
        assert_eq!(incoming["480p"].seeds, 1);
        assert_eq!(incoming["2160p"].url, "magnet:old-2160");
    }

    #[test]
    fn equal_seeds_keep_the_incoming_release() {
        let mut incoming = BTreeMap::from([(
            "1080p".to_string(),
            torrent("1080p", "magnet:fresh", 25),
        )]);
        let stored = BTreeMap::from([(
            "1080p".to_string(),
            torrent("1080p", "magnet:previous", 25),
        )]);

        merge_torrents(&mut incoming, &stored);

        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming["1080p"].url, "magnet:fresh");
        assert_eq!(incoming["1080p"].seeds, 25);
    }

    #[test]
    fn stored_only_episodes_and_seasons_are_kept() {
        let mut incoming = ShowFields {
            seasons: vec![Season {
                number: 2,
                ..Default::default()
            }],
            episodes: vec![episode(2, 1, &[torrent("720p", "magnet:a", 5)])],
            latest_episode_aired_at: Some(201),
            ..Default::default()
        };
        let stored = ShowFields {
            seasons: vec![
                Season {
                    number: 1,
                    ..Default::default()
                },
                Season {
                    number: 2,
                    title: "stale".into(),
                    ..Default::default()
                },
            ],
            episodes: vec![
                episode(1, 1, &[torrent("720p", "magnet:b", 5)]),
                episode(2, 1, &[torrent("720p", "magnet:c", 50)]),
            ],
            ..Default::default()
        };

        merge_show(&mut incoming, &stored);
        incoming.recompute_num_seasons();

        assert_eq!(incoming.episodes.len(), 2);
        assert_eq!(incoming.episodes[0].torrents["720p"].url, "magnet:c");
        assert_eq!(incoming.episodes[1].season, 1);
        let numbers: Vec<u32> =
            incoming.seasons.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(incoming.seasons[1].title, "");
        assert_eq!(incoming.num_seasons, 2);
        assert_eq!(incoming.latest_episode_aired_at, Some(201));
    }
}
