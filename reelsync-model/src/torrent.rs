/// A single torrent release attached to a movie or an episode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TorrentEntry {
    /// Resolution bucket such as `480p`, `720p` or `1080p`.
    pub quality: String,
    /// ISO-639-1 language of the audio track.
    pub language: String,
    /// Magnet link or `.torrent` url.
    pub url: String,
    pub seeds: u32,
    pub peers: u32,
    /// Payload size in bytes.
    pub size: u64,
    /// Discovery provider that reported the release.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub provider: Option<String>,
}

impl TorrentEntry {
    pub fn movie_key(&self) -> MovieTorrentKey<'_> {
        MovieTorrentKey {
            quality: &self.quality,
            language: &self.language,
        }
    }

    pub fn same_release(&self, other: &TorrentEntry) -> bool {
        self.url == other.url
    }
}

/// Identity of a movie torrent. Two entries with the same quality *and* the
/// same language describe the same slot of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MovieTorrentKey<'a> {
    pub quality: &'a str,
    pub language: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torrent(quality: &str, language: &str) -> TorrentEntry {
        TorrentEntry {
            quality: quality.into(),
            language: language.into(),
            url: format!("magnet:?xt={quality}-{language}"),
            ..Default::default()
        }
    }

    #[test]
    fn movie_key_needs_both_quality_and_language() {
        let a = torrent("720p", "en");
        let b = torrent("720p", "fr");
        let c = torrent("1080p", "en");

        assert_eq!(a.movie_key(), torrent("720p", "en").movie_key());
        assert_ne!(a.movie_key(), b.movie_key());
        assert_ne!(a.movie_key(), c.movie_key());
    }
}
