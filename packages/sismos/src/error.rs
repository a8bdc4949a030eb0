//! Typed errors for the snapshot ETL.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Each pipeline stage has its
//! own error type; [`EtlError`] combines them for callers that want one.

use thiserror::Error;

/// Boxed source error, used where the underlying cause can vary by backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while fetching the report page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

/// The page markup no longer contains a recognizable seismic table.
///
/// Raised when no `<table>` in the document matches the marker-text
/// heuristic, which means the upstream page structure changed.
#[derive(Debug, Error)]
#[error("seismic table not found, page structure changed")]
pub struct TableNotFoundError;

/// Errors from the durable snapshot store.
///
/// The variant names the replace phase that failed. A `Purge` or `Load`
/// failure can leave the store empty or partially loaded; there is no
/// rollback (see `SnapshotStore` docs).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading the set of existing keys failed.
    #[error("snapshot scan failed: {0}")]
    Scan(#[source] BoxError),

    /// Deleting existing items failed.
    #[error("snapshot purge failed: {0}")]
    Purge(#[source] BoxError),

    /// Inserting new items failed.
    #[error("snapshot load failed: {0}")]
    Load(#[source] BoxError),

    /// The store could not be opened or migrated.
    #[error("store setup failed: {0}")]
    Setup(#[source] BoxError),
}

/// Umbrella error for a whole run.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    TableNotFound(#[from] TableNotFoundError),

    #[error("store failed: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
