use reelsync_model::{ContentId, MediaKind};
use thiserror::Error;

/// Failures of a single upstream catalog call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    /// The record lacks the cross-reference id this provider is keyed by.
    #[error("Missing {0} identifier")]
    MissingIdentifier(&'static str),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ProviderError {
    /// 401/429-equivalent answers: the provider refused to serve us right now.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited | ProviderError::InvalidApiKey
        )
    }
}

/// Failures of the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A content id is bound to one kind for the lifetime of the record.
    #[error("{id} is stored as a {stored}, refusing to overwrite it with a {incoming}")]
    KindMismatch {
        id: ContentId,
        stored: MediaKind,
        incoming: MediaKind,
    },

    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors a reconciliation cycle hands back to its caller.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The canonical catalog has no usable record for the title. Retrying
    /// will not help until the catalog changes.
    #[error("No canonical record for '{slug}'")]
    NotFound { slug: String },

    #[error("Provider failure while fetching '{slug}': {source}")]
    TransientProvider {
        slug: String,
        #[source]
        source: ProviderError,
    },

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
