//! Trait seams for the backend's external collaborators.
//!
//! The network transport and the favorite-key persistence are consumed
//! through these traits so tests can substitute in-memory fakes and the
//! pipeline stays independent of reqwest and the on-disk format.

use crate::error::BackendError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;

/// Acquires the raw dataset over some transport.
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    /// Stream the dataset into the file at `dest`, creating parent
    /// directories as needed.
    ///
    /// # Returns
    /// Bytes written. A transport failure or non-success status is an
    /// error; the pipeline treats either as "fall through to the bundled
    /// asset".
    async fn fetch_dataset(&self, dest: &Path) -> Result<u64, BackendError>;
}

/// Persistent set of favorite city ids (stringified decimal).
///
/// Eventually-consistent read-after-write is acceptable. The rest of the
/// system never writes to this store except via [`toggle`](Self::toggle).
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Add `id` to the set if absent, remove it if present.
    async fn toggle(&self, id: &str) -> Result<(), BackendError>;

    /// Snapshot of every favorite id. Read failures degrade to an empty
    /// set rather than erroring.
    async fn get_all(&self) -> HashSet<String>;

    /// Whether `id` is currently a favorite.
    async fn contains(&self, id: &str) -> bool;
}
