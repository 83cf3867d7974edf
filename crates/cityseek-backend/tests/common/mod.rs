//! Shared fakes and fixtures for backend integration tests.

use async_trait::async_trait;
use cityseek_backend::{BackendError, DatasetFetcher, FavoriteStore};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Fetcher that "downloads" a canned body into the destination file.
pub struct StaticFetcher {
    body: Vec<u8>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetFetcher for StaticFetcher {
    async fn fetch_dataset(&self, dest: &Path) -> Result<u64, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &self.body).await?;
        Ok(self.body.len() as u64)
    }
}

/// Fetcher whose transport always fails.
pub struct FailingFetcher {
    calls: AtomicUsize,
}

impl FailingFetcher {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetFetcher for FailingFetcher {
    async fn fetch_dataset(&self, _dest: &Path) -> Result<u64, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BackendError::FetchStatus { status: 503 })
    }
}

/// Fetcher that writes part of a body into the destination, then reports a
/// transport failure, as a download dying mid-stream would.
pub struct PartialFetcher {
    partial_body: Vec<u8>,
    calls: AtomicUsize,
}

impl PartialFetcher {
    pub fn new(partial_body: impl Into<Vec<u8>>) -> Self {
        Self {
            partial_body: partial_body.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetFetcher for PartialFetcher {
    async fn fetch_dataset(&self, dest: &Path) -> Result<u64, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &self.partial_body).await?;
        Err(BackendError::FetchStatus { status: 503 })
    }
}

/// In-memory favorite store, no disk involved.
#[derive(Default)]
pub struct MemoryFavoriteStore {
    ids: RwLock<HashSet<String>>,
}

impl MemoryFavoriteStore {
    pub fn with_ids<I: IntoIterator<Item = &'static str>>(ids: I) -> Self {
        Self {
            ids: RwLock::new(ids.into_iter().map(String::from).collect()),
        }
    }
}

#[async_trait]
impl FavoriteStore for MemoryFavoriteStore {
    async fn toggle(&self, id: &str) -> Result<(), BackendError> {
        let mut ids = self.ids.write().await;
        if !ids.remove(id) {
            ids.insert(id.to_string());
        }
        Ok(())
    }

    async fn get_all(&self) -> HashSet<String> {
        self.ids.read().await.clone()
    }

    async fn contains(&self, id: &str) -> bool {
        self.ids.read().await.contains(id)
    }
}

/// The one-record dataset used across the download scenarios.
pub const MENDOZA_JSON: &str =
    r#"[{"_id":1,"name":"Mendoza","country":"AR","coord":{"lon":-68.9,"lat":-32.9}}]"#;
