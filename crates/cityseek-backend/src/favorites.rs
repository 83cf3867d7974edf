//! Favorite-id overlay store persisted as a JSON file.

use crate::error::BackendError;
use crate::traits::FavoriteStore;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::warn;

/// Favorite city ids kept in memory behind an `RwLock` and mirrored to a
/// JSON array on disk after every toggle.
pub struct JsonFavoriteStore {
    path: PathBuf,
    cache: RwLock<HashSet<String>>,
}

impl JsonFavoriteStore {
    /// Open the store at `path`, loading any existing set.
    ///
    /// A missing or unreadable file yields an empty set; corruption is
    /// logged, not propagated.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<HashSet<String>>(&bytes).unwrap_or_else(|err| {
                warn!(path = %path.display(), "favorites file unreadable, starting empty: {err}");
                HashSet::new()
            }),
            Err(_) => HashSet::new(),
        };

        Self {
            path,
            cache: RwLock::new(cache),
        }
    }

    async fn persist(&self, favorites: &HashSet<String>) -> Result<(), BackendError> {
        let bytes = serde_json::to_vec(favorites)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl FavoriteStore for JsonFavoriteStore {
    async fn toggle(&self, id: &str) -> Result<(), BackendError> {
        let mut cache = self.cache.write().await;
        if !cache.remove(id) {
            cache.insert(id.to_string());
        }
        self.persist(&cache).await
    }

    async fn get_all(&self) -> HashSet<String> {
        self.cache.read().await.clone()
    }

    async fn contains(&self, id: &str) -> bool {
        self.cache.read().await.contains(id)
    }
}
