//! Input handed to the engine by the discovery providers.

use std::collections::BTreeMap;

use crate::{media_type::MediaKind, torrent::TorrentEntry};

/// Torrents of one episode, keyed by quality.
pub type EpisodeTorrents = BTreeMap<String, TorrentEntry>;

/// One title as found by a scrape cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrapedTitle {
    /// Slug understood by the canonical metadata provider.
    pub slug: String,
    pub payload: ScrapedPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "lowercase")
)]
pub enum ScrapedPayload {
    Movie {
        torrents: Vec<TorrentEntry>,
    },
    /// season -> episode -> quality -> torrent
    Show {
        #[cfg_attr(
            feature = "serde",
            serde(deserialize_with = "numbered_keys::deserialize")
        )]
        seasons: BTreeMap<u32, BTreeMap<u32, EpisodeTorrents>>,
    },
}

impl ScrapedTitle {
    pub fn movie(slug: impl Into<String>, torrents: Vec<TorrentEntry>) -> Self {
        Self {
            slug: slug.into(),
            payload: ScrapedPayload::Movie { torrents },
        }
    }

    pub fn show(
        slug: impl Into<String>,
        seasons: BTreeMap<u32, BTreeMap<u32, EpisodeTorrents>>,
    ) -> Self {
        Self {
            slug: slug.into(),
            payload: ScrapedPayload::Show { seasons },
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self.payload {
            ScrapedPayload::Movie { .. } => MediaKind::Movie,
            ScrapedPayload::Show { .. } => MediaKind::Show,
        }
    }
}

// Internally tagged content is buffered, so numeric map keys reach us as
// strings and have to be parsed by hand.
#[cfg(feature = "serde")]
mod numbered_keys {
    use std::{collections::BTreeMap, fmt};

    use serde::{Deserialize, Deserializer, de};

    use super::EpisodeTorrents;

    #[derive(PartialEq, Eq, PartialOrd, Ord)]
    struct Number(u32);

    impl<'de> Deserialize<'de> for Number {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct NumberVisitor;

            impl de::Visitor<'_> for NumberVisitor {
                type Value = Number;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a season or episode number")
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> Result<Number, E> {
                    u32::try_from(v).map(Number).map_err(|_| {
                        E::invalid_value(de::Unexpected::Unsigned(v), &self)
                    })
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> Result<Number, E> {
                    u32::try_from(v).map(Number).map_err(|_| {
                        E::invalid_value(de::Unexpected::Signed(v), &self)
                    })
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<Number, E> {
                    v.trim().parse().map(Number).map_err(|_| {
                        E::invalid_value(de::Unexpected::Str(v), &self)
                    })
                }
            }

            deserializer.deserialize_any(NumberVisitor)
        }
    }

    pub(super) fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<u32, BTreeMap<u32, EpisodeTorrents>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw =
            BTreeMap::<Number, BTreeMap<Number, EpisodeTorrents>>::deserialize(
                deserializer,
            )?;

        Ok(raw
            .into_iter()
            .map(|(season, episodes)| {
                let episodes = episodes
                    .into_iter()
                    .map(|(number, torrents)| (number.0, torrents))
                    .collect();
                (season.0, episodes)
            })
            .collect())
    }
}
