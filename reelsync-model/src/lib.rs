//! Core data model definitions shared across reelsync crates.
#![allow(missing_docs)]

pub mod ids;
pub mod image;
pub mod media_type;
pub mod rating;
pub mod record;
pub mod scraped;
pub mod torrent;

// Re-exports for downstream consumers.
pub use ids::{ContentId, CrossReferenceIds};
pub use image::{ImageField, ImageSet, ImageSlot, Images};
pub use media_type::MediaKind;
pub use rating::Rating;
pub use record::{
    ContentKind, ContentRecord, Episode, MovieFields, Season, ShowFields,
    UserState, UNKNOWN_GENRE,
};
pub use scraped::{EpisodeTorrents, ScrapedPayload, ScrapedTitle};
pub use torrent::{MovieTorrentKey, TorrentEntry};
