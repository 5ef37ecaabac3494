//! Reporting port for failures the engine absorbs.
//!
//! Image lookups, season fetches and writes may fail without aborting the
//! cycle. Each such failure becomes an [`Incident`] handed to the
//! [`Reporter`] the component was built with.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use reelsync_model::ContentId;
use tracing::{debug, error, warn};

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Warn,
    Error,
}

/// Something that went wrong but did not abort the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incident {
    /// The "currently watching" lookup failed; the count degrades to 0.
    WatchingUnavailable { slug: String, error: String },
    /// An image provider needs an id the record does not carry.
    ImageIdentifierMissing {
        provider: &'static str,
        id: ContentId,
        identifier: &'static str,
    },
    ImageNotFound { provider: &'static str, id: ContentId },
    /// Rate-limit or rejected-key answer from a fallback provider.
    ImageProviderRefused {
        provider: &'static str,
        id: ContentId,
        error: String,
    },
    ImageProviderFailed {
        provider: &'static str,
        id: ContentId,
        error: String,
    },
    SeasonFetchFailed {
        id: ContentId,
        season: u32,
        error: String,
    },
    MergeFailed { id: ContentId, error: String },
    PersistFailed { id: ContentId, error: String },
}

impl Incident {
    /// A failed commit of `id`. A kind change is a merge failure; anything
    /// else went wrong in the store.
    pub fn store_failure(id: ContentId, err: &StoreError) -> Self {
        let error = err.to_string();
        match err {
            StoreError::KindMismatch { .. } => {
                Incident::MergeFailed { id, error }
            }
            _ => Incident::PersistFailed { id, error },
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Incident::ImageIdentifierMissing { .. } => Severity::Debug,
            Incident::WatchingUnavailable { .. }
            | Incident::ImageNotFound { .. }
            | Incident::ImageProviderRefused { .. } => Severity::Warn,
            Incident::ImageProviderFailed { .. }
            | Incident::SeasonFetchFailed { .. }
            | Incident::MergeFailed { .. }
            | Incident::PersistFailed { .. } => Severity::Error,
        }
    }

    /// Slug or content id the incident is about.
    pub fn subject(&self) -> &str {
        match self {
            Incident::WatchingUnavailable { slug, .. } => slug,
            Incident::ImageIdentifierMissing { id, .. }
            | Incident::ImageNotFound { id, .. }
            | Incident::ImageProviderRefused { id, .. }
            | Incident::ImageProviderFailed { id, .. }
            | Incident::SeasonFetchFailed { id, .. }
            | Incident::MergeFailed { id, .. }
            | Incident::PersistFailed { id, .. } => id.as_str(),
        }
    }
}

impl fmt::Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Incident::WatchingUnavailable { slug, error } => {
                write!(f, "watching count unavailable for {slug}: {error}")
            }
            Incident::ImageIdentifierMissing {
                provider,
                id,
                identifier,
            } => write!(f, "{provider} skipped for {id}: no {identifier} id"),
            Incident::ImageNotFound { provider, id } => {
                write!(f, "{provider} has no images for {id}")
            }
            Incident::ImageProviderRefused {
                provider,
                id,
                error,
            } => write!(f, "{provider} refused images for {id}: {error}"),
            Incident::ImageProviderFailed {
                provider,
                id,
                error,
            } => write!(f, "{provider} image lookup failed for {id}: {error}"),
            Incident::SeasonFetchFailed { id, season, error } => {
                write!(
                    f,
                    "season {season} of {id} could not be fetched: {error}"
                )
            }
            Incident::MergeFailed { id, error } => {
                write!(f, "merge of {id} failed: {error}")
            }
            Incident::PersistFailed { id, error } => {
                write!(f, "persisting {id} failed: {error}")
            }
        }
    }
}

/// Logging port injected into every engine component.
pub trait Reporter: Send + Sync {
    fn report(&self, incident: &Incident);
}

/// Forwards incidents to `tracing` at their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, incident: &Incident) {
        let subject = incident.subject();
        match incident.severity() {
            Severity::Debug => debug!(subject, "{incident}"),
            Severity::Warn => warn!(subject, "{incident}"),
            Severity::Error => error!(subject, "{incident}"),
        }
    }
}

/// Keeps every incident in memory. Useful for hosts that batch diagnostics
/// and for asserting on absorbed failures in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    incidents: Arc<Mutex<Vec<Incident>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incidents(&self) -> Vec<Incident> {
        match self.incidents.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.incidents()
            .iter()
            .filter(|incident| incident.severity() == severity)
            .count()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, incident: &Incident) {
        match self.incidents.lock() {
            Ok(mut guard) => guard.push(incident.clone()),
            Err(poisoned) => poisoned.into_inner().push(incident.clone()),
        }
    }
}
