//! Status command - Show catalog status and configuration

use anyhow::Result;
use clap::Args;
use cityseek_backend::{FavoriteStore, JsonFavoriteStore};
use cityseek_core::CatalogStore;

use super::{load_config, CATALOG_DB_FILE, FAVORITES_FILE};
use crate::GlobalOptions;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show configuration details
    #[arg(long = "show-config")]
    show_config: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the status command
pub async fn execute(args: StatusArgs, global: GlobalOptions) -> Result<()> {
    let config = load_config(&global)?;
    let data_dir = config.storage.data_dir()?;

    let db_path = data_dir.join(CATALOG_DB_FILE);
    let cache_path = data_dir.join(&config.dataset.cache_file_name);
    let favorites_path = data_dir.join(FAVORITES_FILE);

    // Counts are best-effort; a missing database just means "not ingested".
    let city_count = if db_path.is_file() {
        CatalogStore::open(&db_path).and_then(|s| s.count()).ok()
    } else {
        None
    };
    let cache_bytes = std::fs::metadata(&cache_path).ok().map(|m| m.len());
    let favorite_count = if favorites_path.is_file() {
        Some(JsonFavoriteStore::open(&favorites_path).await.get_all().await.len())
    } else {
        None
    };

    if args.json {
        let mut status = serde_json::json!({
            "data_dir": data_dir,
            "catalog": {
                "path": db_path,
                "cities": city_count,
            },
            "dataset_cache": {
                "path": cache_path,
                "bytes": cache_bytes,
            },
            "favorites": favorite_count.unwrap_or(0),
        });

        if args.show_config {
            status["config"] = serde_json::json!({
                "dataset_url": config.dataset.url,
                "batch_size": config.dataset.batch_size,
                "query_limit": config.dataset.query_limit,
                "page_size": config.dataset.page_size,
                "log_level": config.logging.level,
            });
        }

        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    // Human-readable output
    println!("CitySeek Status");
    println!("===============\n");

    println!("Data dir:  {}", data_dir.display());
    match city_count {
        Some(count) => println!("Catalog:   {} cities", count),
        None => println!("Catalog:   not ingested (run 'cityseek ingest')"),
    }
    match cache_bytes {
        Some(bytes) => println!("Cache:     {} ({} bytes)", cache_path.display(), bytes),
        None => println!("Cache:     no cached dataset"),
    }
    println!("Favorites: {}", favorite_count.unwrap_or(0));

    if args.show_config {
        println!("\nConfiguration:");
        println!("  Dataset URL: {}", config.dataset.url);
        println!("  Batch size:  {}", config.dataset.batch_size);
        println!("  Query limit: {}", config.dataset.query_limit);
        println!("  Page size:   {}", config.dataset.page_size);
        println!("  Log level:   {}", config.logging.level);
    }

    Ok(())
}
