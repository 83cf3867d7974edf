//! Integration tests for the ingestion pipeline's source fallback chain.

mod common;

use common::{FailingFetcher, PartialFetcher, StaticFetcher, MENDOZA_JSON};

use cityseek_backend::IngestionPipeline;
use cityseek_core::CatalogStore;
use std::sync::Arc;
use tempfile::TempDir;

const BATCH: usize = 10_000;
const LIMIT: usize = 10_000;

fn cache_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("cities.json")
}

#[tokio::test]
async fn empty_everything_downloads_and_populates() {
    // Scenario: empty store, no cache file, network succeeds.
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(CatalogStore::in_memory().expect("store"));
    let fetcher = Arc::new(StaticFetcher::new(MENDOZA_JSON));
    let pipeline = IngestionPipeline::new(
        Arc::clone(&store),
        Arc::clone(&fetcher) as Arc<dyn cityseek_backend::DatasetFetcher>,
        cache_path(&dir),
        BATCH,
        LIMIT,
    );

    let cities = pipeline.ensure_catalog_populated().await;
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].name, "Mendoza");
    assert_eq!(fetcher.calls(), 1);

    // Download was persisted through the cache file.
    let cached = std::fs::read_to_string(cache_path(&dir)).expect("cache file");
    assert_eq!(cached, MENDOZA_JSON);
}

#[tokio::test]
async fn populated_store_short_circuits_without_io() {
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(CatalogStore::in_memory().expect("store"));
    store
        .insert_batch(&[cityseek_core::City {
            id: 7,
            name: "Quito".to_string(),
            country: "EC".to_string(),
            latitude: -0.2,
            longitude: -78.5,
        }])
        .expect("insert");

    let fetcher = Arc::new(FailingFetcher::new());
    let pipeline = IngestionPipeline::new(
        Arc::clone(&store),
        Arc::clone(&fetcher) as Arc<dyn cityseek_backend::DatasetFetcher>,
        cache_path(&dir),
        BATCH,
        LIMIT,
    );

    let cities = pipeline.ensure_catalog_populated().await;
    assert_eq!(cities.len(), 1);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn existing_cache_file_is_replayed_not_redownloaded() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(cache_path(&dir), MENDOZA_JSON).expect("seed cache");

    let store = Arc::new(CatalogStore::in_memory().expect("store"));
    let fetcher = Arc::new(FailingFetcher::new());
    let pipeline = IngestionPipeline::new(
        Arc::clone(&store),
        Arc::clone(&fetcher) as Arc<dyn cityseek_backend::DatasetFetcher>,
        cache_path(&dir),
        BATCH,
        LIMIT,
    );

    let cities = pipeline.ensure_catalog_populated().await;
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].name, "Mendoza");
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn empty_cache_file_does_not_block_download() {
    // A zero-length cache file signals "not downloaded yet".
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(cache_path(&dir), b"").expect("touch cache");

    let store = Arc::new(CatalogStore::in_memory().expect("store"));
    let fetcher = Arc::new(StaticFetcher::new(MENDOZA_JSON));
    let pipeline = IngestionPipeline::new(
        Arc::clone(&store),
        Arc::clone(&fetcher) as Arc<dyn cityseek_backend::DatasetFetcher>,
        cache_path(&dir),
        BATCH,
        LIMIT,
    );

    let cities = pipeline.ensure_catalog_populated().await;
    assert_eq!(cities.len(), 1);
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn failed_download_falls_back_to_bundled_asset() {
    // Scenario: transport error, no cache file. The bundled seed is the
    // dataset of last resort.
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(CatalogStore::in_memory().expect("store"));
    let fetcher = Arc::new(FailingFetcher::new());
    let pipeline = IngestionPipeline::new(
        Arc::clone(&store),
        Arc::clone(&fetcher) as Arc<dyn cityseek_backend::DatasetFetcher>,
        cache_path(&dir),
        BATCH,
        LIMIT,
    );

    let cities = pipeline.ensure_catalog_populated().await;
    assert!(!cities.is_empty());
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn bundled_override_is_used_on_fallback() {
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(CatalogStore::in_memory().expect("store"));
    let fetcher = Arc::new(FailingFetcher::new());
    let pipeline = IngestionPipeline::new(
        Arc::clone(&store),
        Arc::clone(&fetcher) as Arc<dyn cityseek_backend::DatasetFetcher>,
        cache_path(&dir),
        BATCH,
        LIMIT,
    )
    .with_bundled(MENDOZA_JSON.as_bytes().to_vec());

    let cities = pipeline.ensure_catalog_populated().await;
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].name, "Mendoza");
}

#[tokio::test]
async fn repeated_ingestion_never_duplicates_ids() {
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(CatalogStore::in_memory().expect("store"));
    let fetcher = Arc::new(StaticFetcher::new(MENDOZA_JSON));
    let pipeline = IngestionPipeline::new(
        Arc::clone(&store),
        Arc::clone(&fetcher) as Arc<dyn cityseek_backend::DatasetFetcher>,
        cache_path(&dir),
        BATCH,
        LIMIT,
    );

    pipeline.ensure_catalog_populated().await;
    pipeline.ensure_catalog_populated().await;

    assert_eq!(store.count().expect("count"), 1);
    // Second call hit the populated-store short circuit.
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn aborted_download_does_not_poison_the_cache() {
    // The fetcher dies mid-stream after writing partial bytes. Those bytes
    // must not survive as a cache file, or the next run would replay a
    // truncated dataset instead of retrying the download.
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(CatalogStore::in_memory().expect("store"));
    let half = &MENDOZA_JSON[..MENDOZA_JSON.len() / 2];
    let fetcher = Arc::new(PartialFetcher::new(half));
    let pipeline = IngestionPipeline::new(
        Arc::clone(&store),
        Arc::clone(&fetcher) as Arc<dyn cityseek_backend::DatasetFetcher>,
        cache_path(&dir),
        BATCH,
        LIMIT,
    )
    .with_bundled(b"[]".to_vec());

    let cities = pipeline.ensure_catalog_populated().await;
    assert!(cities.is_empty());
    assert!(!cache_path(&dir).exists());

    // Store still empty, no cache: the next run downloads again rather
    // than replaying leftovers.
    pipeline.ensure_catalog_populated().await;
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn cache_replay_does_not_starve_the_runtime() {
    // Replaying a large cached dataset must leave the scheduler free: on a
    // single-threaded runtime a short timer still fires while the parse
    // and inserts run on a blocking worker.
    let dir = TempDir::new().expect("tempdir");
    let records: Vec<String> = (1..=20_000)
        .map(|i| format!(r#"{{"_id":{i},"name":"City{i}","country":"AR","coord":{{"lon":0,"lat":0}}}}"#))
        .collect();
    std::fs::write(cache_path(&dir), format!("[{}]", records.join(","))).expect("seed cache");

    let store = Arc::new(CatalogStore::in_memory().expect("store"));
    let fetcher = Arc::new(FailingFetcher::new());
    let pipeline = IngestionPipeline::new(
        Arc::clone(&store),
        Arc::clone(&fetcher) as Arc<dyn cityseek_backend::DatasetFetcher>,
        cache_path(&dir),
        1_000,
        25_000,
    );

    let ingest = pipeline.ensure_catalog_populated();
    tokio::pin!(ingest);

    let mut timer_fired = false;
    let cities = tokio::select! {
        biased;
        cities = &mut ingest => cities,
        _ = tokio::time::sleep(std::time::Duration::from_millis(1)) => {
            timer_fired = true;
            ingest.await
        }
    };

    assert!(timer_fired, "timer was starved during cache replay");
    assert_eq!(cities.len(), 20_000);
}

#[tokio::test]
async fn truncated_cache_keeps_flushed_batches() {
    // A stream that dies mid-array keeps whatever batches already
    // committed; the pipeline reports the partial catalog.
    let dir = TempDir::new().expect("tempdir");
    let truncated = r#"[
        {"_id":1,"name":"Mendoza","country":"AR","coord":{"lon":-68.9,"lat":-32.9}},
        {"_id":2,"name":"San Juan","country":"AR","coord":{"lon":-68.5,"#;
    std::fs::write(cache_path(&dir), truncated).expect("seed cache");

    let store = Arc::new(CatalogStore::in_memory().expect("store"));
    let fetcher = Arc::new(FailingFetcher::new());
    // Batch size 1 so the first record commits before the stream breaks.
    let pipeline = IngestionPipeline::new(
        Arc::clone(&store),
        Arc::clone(&fetcher) as Arc<dyn cityseek_backend::DatasetFetcher>,
        cache_path(&dir),
        1,
        LIMIT,
    );

    let cities = pipeline.ensure_catalog_populated().await;
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].name, "Mendoza");
}
