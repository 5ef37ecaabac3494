//! Upstream catalog contracts the engine calls.
//!
//! Concrete HTTP adapters live in [`crate::providers`]; hosts may plug in
//! their own implementations.

pub mod images;
pub mod metadata;
pub mod seasons;

pub use images::{ArtworkSet, ImageCandidate, ImageProvider, pick_localized};
pub use metadata::{MetadataProvider, SummaryIds, TitleSummary};
pub use seasons::{EpisodeListing, SeasonCatalog, SeasonListing};
