//! Ingestion pipeline: guarantees a queryable local catalog exists.
//!
//! Sources are tried strictly in order, short-circuiting on the first one
//! that yields a non-empty catalog:
//!
//! 1. the catalog store itself (already populated → no I/O),
//! 2. a previously downloaded cache file,
//! 3. a fresh network download (persisted to the cache file first),
//! 4. the bundled seed asset, when the download fails and the store is
//!    still empty.
//!
//! Every I/O or parse failure along the way is caught and logged; the
//! pipeline returns whatever the store currently holds, possibly nothing.
//! Ingestion failure degrades to "search over an empty or partial
//! catalog", never a hard error.

use crate::traits::DatasetFetcher;
use cityseek_core::{parse_dataset, CatalogStore, City};
use std::borrow::Cow;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Last-resort dataset compiled into the binary.
pub const BUNDLED_CITIES: &[u8] = include_bytes!("../assets/cities_seed.json");

/// Drives the source fallback chain and feeds the record parser into the
/// catalog store. Idempotent per process; safe to call before every query.
pub struct IngestionPipeline {
    store: Arc<CatalogStore>,
    fetcher: Arc<dyn DatasetFetcher>,
    cache_file: PathBuf,
    bundled: Cow<'static, [u8]>,
    batch_size: usize,
    query_limit: usize,
}

impl IngestionPipeline {
    pub fn new(
        store: Arc<CatalogStore>,
        fetcher: Arc<dyn DatasetFetcher>,
        cache_file: impl Into<PathBuf>,
        batch_size: usize,
        query_limit: usize,
    ) -> Self {
        Self {
            store,
            fetcher,
            cache_file: cache_file.into(),
            bundled: Cow::Borrowed(BUNDLED_CITIES),
            batch_size,
            query_limit,
        }
    }

    /// Replace the bundled fallback asset (primarily for tests).
    pub fn with_bundled(mut self, bundled: impl Into<Vec<u8>>) -> Self {
        self.bundled = Cow::Owned(bundled.into());
        self
    }

    /// Ensure the catalog holds data, falling through the source chain as
    /// needed, and return its current contents (bounded by the query
    /// limit). Never errors; an empty vec means every source failed.
    pub async fn ensure_catalog_populated(&self) -> Vec<City> {
        // 1. Store check: populated catalog means no I/O at all.
        let existing = self.snapshot();
        if !existing.is_empty() {
            debug!(count = existing.len(), "catalog already populated");
            return existing;
        }

        // 2. Cache-file replay.
        if self.cache_file_usable().await {
            debug!(path = %self.cache_file.display(), "replaying cached dataset");
            self.replay_cache_file().await;
            return self.snapshot();
        }

        // 3. Network download, persisted through the cache file.
        match self.fetcher.fetch_dataset(&self.cache_file).await {
            Ok(bytes) => {
                debug!(bytes, "dataset fetched, ingesting");
                self.replay_cache_file().await;
            }
            Err(err) => {
                // 4. Bundled fallback; the store is known empty here. A
                // misbehaving fetcher may have left partial bytes at the
                // cache path; those must not masquerade as a completed
                // download on the next run.
                warn!("dataset download failed, falling back to bundled asset: {err}");
                let _ = tokio::fs::remove_file(&self.cache_file).await;
                self.ingest_bundled().await;
            }
        }

        self.snapshot()
    }

    /// Current catalog contents, empty on store failure.
    fn snapshot(&self) -> Vec<City> {
        self.store.query_all(self.query_limit).unwrap_or_else(|err| {
            error!("catalog query failed: {err}");
            Vec::new()
        })
    }

    async fn cache_file_usable(&self) -> bool {
        match tokio::fs::metadata(&self.cache_file).await {
            Ok(meta) => meta.is_file() && meta.len() > 0,
            Err(_) => false,
        }
    }

    /// Parse the cached dataset into the store on a blocking worker.
    ///
    /// The parse loop is plain file reads plus rusqlite inserts; run inline
    /// it would pin a scheduler thread for the whole multi-megabyte pass.
    async fn replay_cache_file(&self) {
        let path = self.cache_file.clone();
        let store = Arc::clone(&self.store);
        let batch_size = self.batch_size;

        let joined = tokio::task::spawn_blocking(move || {
            let file = match std::fs::File::open(&path) {
                Ok(file) => file,
                Err(err) => {
                    warn!(path = %path.display(), "cannot open cached dataset: {err}");
                    return;
                }
            };
            parse_into_store(&store, std::io::BufReader::new(file), batch_size);
        })
        .await;

        if let Err(err) = joined {
            error!("dataset ingestion task failed: {err}");
        }
    }

    /// Parse the compiled-in seed dataset, also on a blocking worker.
    async fn ingest_bundled(&self) {
        let bundled = self.bundled.clone();
        let store = Arc::clone(&self.store);
        let batch_size = self.batch_size;

        let joined = tokio::task::spawn_blocking(move || {
            parse_into_store(&store, bundled.as_ref(), batch_size);
        })
        .await;

        if let Err(err) = joined {
            error!("dataset ingestion task failed: {err}");
        }
    }
}

/// Parse a dataset stream into the store in batches. Stream-level failures
/// abort the remaining parse but keep already-flushed batches.
fn parse_into_store<R: Read>(store: &CatalogStore, reader: R, batch_size: usize) {
    match parse_dataset(reader, batch_size, |batch| store.insert_batch(batch)) {
        Ok(stats) => info!(
            parsed = stats.parsed,
            skipped = stats.skipped,
            batches = stats.batches,
            "dataset ingested"
        ),
        Err(err) => warn!("dataset parse aborted, catalog may be partial: {err}"),
    }
}
