//! # Reelsync Core
//!
//! Content reconciliation engine. Takes freshly scraped torrent listings for
//! one movie or show, enriches them with canonical metadata and artwork from
//! third-party catalogs and merges the result into the persisted record, so
//! repeated scrape cycles converge on a de-duplicated catalog.
//!
//! ## Overview
//!
//! - **Fetch**: [`reconcile::MetadataFetcher`] builds a draft record from the
//!   canonical metadata provider.
//! - **Artwork**: [`reconcile::ImageResolutionCascade`] walks an ordered list
//!   of image providers and fills only slots that are still placeholders.
//! - **Movies**: [`reconcile::TorrentMerger`] keeps the better-seeded torrent
//!   per `(quality, language)` and never drops a stored one.
//! - **Shows**: [`reconcile::SeasonAssembler`] and
//!   [`reconcile::EpisodeMerger`] rebuild the season tree and fold it into
//!   the stored document.
//! - **Persistence**: [`persistence::ContentUpsert`] is the single write
//!   path and preserves user state.
//!
//! ## Feature Flags
//!
//! - `database`: Enables the Postgres document store (SQLx).
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use reelsync_core::{
//!     config::ReconcileConfig,
//!     persistence::InMemoryContentStore,
//!     reconcile::Reconciler,
//!     report::TracingReporter,
//! };
//! use reelsync_model::{ScrapedTitle, TorrentEntry};
//!
//! async fn run() -> anyhow::Result<()> {
//!     let (config, _source) = ReconcileConfig::load_from_env()?;
//!     let reconciler = Reconciler::from_config(
//!         &config,
//!         Arc::new(InMemoryContentStore::new()),
//!         Arc::new(TracingReporter),
//!     )?;
//!
//!     let title = ScrapedTitle::movie(
//!         "the-matrix-1999",
//!         vec![TorrentEntry {
//!             quality: "1080p".into(),
//!             language: "en".into(),
//!             url: "magnet:?xt=urn:btih:example".into(),
//!             seeds: 120,
//!             ..Default::default()
//!         }],
//!     );
//!     reconciler.reconcile(&title).await?;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Engine configuration loading
pub mod config;
/// Error taxonomy
pub mod error;
/// Content store contracts, stores and the upsert path
pub mod persistence;
/// Upstream catalog contracts
pub mod ports;
/// HTTP adapters for the bundled catalogs
pub mod providers;
/// Reconciliation cycle components
pub mod reconcile;
/// Reporting port for absorbed failures
pub mod report;

pub use error::{ProviderError, ReconcileError, Result, StoreError};
pub use reconcile::Reconciler;

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
