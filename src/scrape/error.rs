//! Dispatch-level error taxonomy.
//!
//! Callers map these kinds to different user-facing responses, so each
//! condition is a distinct variant carrying the scraper id and operation
//! context rather than a flattened message.

use super::client::MAX_REDIRECTS;

/// Errors surfaced by the scraper registry and dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// No scraper with the given id is registered.
    #[error("scraper not found: {id}")]
    NotFound { id: String },

    /// The scraper exists but does not declare the requested content type, or
    /// lacks the capability needed for the requested dispatch style.
    #[error("scraper {id} not supported: {detail}")]
    NotSupported { id: String, detail: String },

    /// The HTTP client gave up following redirects.
    #[error("gave up after {limit} redirects")]
    MaxRedirects { limit: usize },

    /// The scene or gallery referenced by an id-based dispatch does not exist.
    #[error("{kind} with id {id} not found")]
    EntityNotFound { kind: &'static str, id: i64 },

    /// A scraper failed while servicing a dispatch.
    #[error("scraper {id}: error while scraping by {operation}: {source}")]
    Scraper {
        id: String,
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A storage operation failed while loading an entity.
    #[error("storage error: {0}")]
    Storage(#[from] metaforge_models::Error),

    /// The shared HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// The scraper definitions directory could not be walked.
    #[error("error reading scraper directory: {0}")]
    Directory(#[from] walkdir::Error),
}

impl ScrapeError {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a new NotSupported error.
    pub fn not_supported<S: Into<String>, D: Into<String>>(id: S, detail: D) -> Self {
        Self::NotSupported {
            id: id.into(),
            detail: detail.into(),
        }
    }

    /// Wrap an error returned by a scraper, attaching the scraper id and the
    /// attempted operation. Redirect-cap failures anywhere in the source
    /// chain are promoted to [`ScrapeError::MaxRedirects`] so callers can
    /// branch on them.
    pub fn scraper<S: Into<String>>(id: S, operation: &'static str, source: anyhow::Error) -> Self {
        let redirect_cap = source.chain().any(|cause| {
            cause
                .downcast_ref::<reqwest::Error>()
                .is_some_and(|e| e.is_redirect())
        });
        if redirect_cap {
            return Self::MaxRedirects {
                limit: MAX_REDIRECTS,
            };
        }

        Self::Scraper {
            id: id.into(),
            operation,
            source,
        }
    }
}

/// Result type alias for dispatch operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;
