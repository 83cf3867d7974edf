//! Backend error types.

use thiserror::Error;

/// Errors that can occur during backend operations.
///
/// These stay internal to the ingestion/search layer: public façade
/// methods swallow them (logging via `tracing`) and return best-effort
/// results. They surface only through the explicitly fallible operations
/// such as [`crate::FavoriteStore::toggle`].
#[derive(Error, Debug)]
pub enum BackendError {
    /// Catalog store operation failed
    #[error("store error: {0}")]
    Store(#[from] cityseek_core::StoreError),

    /// Dataset parse failed at the stream level
    #[error("parse error: {0}")]
    Parse(#[from] cityseek_core::ParseError),

    /// Dataset transport failed
    #[error("dataset fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Dataset endpoint answered with a non-success status
    #[error("dataset endpoint returned status {status}")]
    FetchStatus { status: u16 },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
