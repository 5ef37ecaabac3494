use reelsync_model::TorrentEntry;

/// Reconciles the flat torrent list of a movie.
#[derive(Debug, Clone, Copy, Default)]
pub struct TorrentMerger;

impl TorrentMerger {
    /// Merge a freshly scraped torrent list into the stored one.
    ///
    /// Entries are keyed by `(quality, language)`. Incoming entries come
    /// first in their scrape order (duplicates keep the first occurrence),
    /// followed by stored entries this scrape missed. When both sides carry
    /// the same key the stored entry wins only with strictly more seeds.
    pub fn merge(
        incoming: &[TorrentEntry],
        stored: &[TorrentEntry],
    ) -> Vec<TorrentEntry> {
        let mut merged: Vec<TorrentEntry> =
            Vec::with_capacity(incoming.len() + stored.len());

        for entry in incoming {
            if !merged.iter().any(|m| m.movie_key() == entry.movie_key()) {
                merged.push(entry.clone());
            }
        }

        for entry in stored {
            // Match on quality AND language; a quality-only or language-only
            // match is a different slot.
            match merged
                .iter()
                .position(|m| m.movie_key() == entry.movie_key())
            {
                None => merged.push(entry.clone()),
                Some(index) if entry.seeds > merged[index].seeds => {
                    merged[index] = entry.clone();
                }
                Some(_) => {}
            }
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torrent(quality: &str, language: &str, seeds: u32) -> TorrentEntry {
        TorrentEntry {
            quality: quality.into(),
            language: language.into(),
            url: format!("magnet:?xt=urn:btih:{quality}{language}{seeds}"),
            seeds,
            peers: seeds / 2,
            size: 1_500_000_000,
            provider: None,
        }
    }

    #[test]
    fn stored_entry_with_more_seeds_wins() {
        let stored = vec![torrent("720p", "en", 50)];
        let incoming = vec![torrent("720p", "en", 10)];

        let merged = TorrentMerger::merge(&incoming, &stored);
        assert_eq!(merged, stored);
    }

    #[test]
    fn ties_keep_the_incoming_entry() {
        let stored = vec![torrent("720p", "en", 10)];
        let mut fresh = torrent("720p", "en", 10);
        fresh.url = "magnet:?xt=urn:btih:fresh".into();

        let merged =
            TorrentMerger::merge(std::slice::from_ref(&fresh), &stored);
        assert_eq!(merged, vec![fresh]);
    }

    #[test]
    fn stored_entries_missing_from_the_scrape_are_kept() {
        let stored = vec![torrent("1080p", "en", 5)];
        let incoming = vec![torrent("720p", "en", 30)];

        let merged = TorrentMerger::merge(&incoming, &stored);
        assert_eq!(
            merged,
            vec![torrent("720p", "en", 30), torrent("1080p", "en", 5)]
        );
    }

    #[test]
    fn replacement_only_touches_the_exact_key() {
        let stored = vec![torrent("720p", "en", 50)];
        let incoming = vec![
            torrent("720p", "fr", 5),
            torrent("720p", "en", 10),
            torrent("1080p", "en", 3),
        ];

        let merged = TorrentMerger::merge(&incoming, &stored);
        assert_eq!(
            merged,
            vec![
                torrent("720p", "fr", 5),
                torrent("720p", "en", 50),
                torrent("1080p", "en", 3),
            ]
        );
    }

    #[test]
    fn duplicate_incoming_keys_keep_the_first() {
        let incoming =
            vec![torrent("720p", "en", 1), torrent("720p", "en", 99)];

        let merged = TorrentMerger::merge(&incoming, &[]);
        assert_eq!(merged, vec![torrent("720p", "en", 1)]);
    }

    #[test]
    fn merging_twice_is_idempotent() {
        let stored = vec![torrent("720p", "en", 50), torrent("480p", "de", 2)];
        let incoming =
            vec![torrent("720p", "en", 10), torrent("1080p", "en", 7)];

        let once = TorrentMerger::merge(&incoming, &stored);
        let twice = TorrentMerger::merge(&incoming, &stored);
        assert_eq!(once, twice);

        let again = TorrentMerger::merge(&incoming, &once);
        assert_eq!(again, once);
    }
}
