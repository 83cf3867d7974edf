//! CLI command implementations
//!
//! This module contains all CitySeek CLI command implementations.

pub mod favorite;
pub mod ingest;
pub mod search;
pub mod show;
pub mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use cityseek_backend::{
    CitySearcher, DatasetFetcher, HttpDatasetFetcher, IngestionPipeline, JsonFavoriteStore,
};
use cityseek_config::{ConfigLoader, SeekerConfig};
use cityseek_core::CatalogStore;

use crate::GlobalOptions;

/// File name of the catalog database inside the data dir.
const CATALOG_DB_FILE: &str = "catalog.db";

/// File name of the favorites overlay inside the data dir.
const FAVORITES_FILE: &str = "favorites.json";

/// Load configuration with CLI overrides applied.
pub fn load_config(global: &GlobalOptions) -> Result<SeekerConfig> {
    ConfigLoader::new()
        .load(&global.to_config_overrides())
        .context("Failed to load configuration")
}

/// Resolve the effective data directory, creating it if needed.
pub fn resolve_data_dir(config: &SeekerConfig) -> Result<PathBuf> {
    let dir = config
        .storage
        .data_dir()
        .context("Failed to resolve data directory")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    Ok(dir)
}

/// Wire up the searcher over the on-disk catalog, cache file, and
/// favorites file for the resolved configuration.
pub async fn create_searcher(global: &GlobalOptions) -> Result<(CitySearcher, SeekerConfig)> {
    let config = load_config(global)?;
    let data_dir = resolve_data_dir(&config)?;

    let store = Arc::new(
        CatalogStore::open(&data_dir.join(CATALOG_DB_FILE))
            .context("Failed to open catalog database")?,
    );
    let favorites = Arc::new(JsonFavoriteStore::open(data_dir.join(FAVORITES_FILE)).await);
    let fetcher =
        Arc::new(HttpDatasetFetcher::new(&config.dataset.url)) as Arc<dyn DatasetFetcher>;
    let pipeline = IngestionPipeline::new(
        Arc::clone(&store),
        fetcher,
        data_dir.join(&config.dataset.cache_file_name),
        config.dataset.batch_size,
        config.dataset.query_limit,
    );

    let searcher = CitySearcher::new(
        store,
        favorites,
        pipeline,
        config.dataset.query_limit,
        config.dataset.page_size,
    );
    Ok((searcher, config))
}

/// Print an info message (respects quiet flag).
pub fn print_info(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", message);
    }
}
