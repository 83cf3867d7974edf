//! Ingest command - Download the dataset and populate the catalog

use anyhow::Result;
use clap::Args;

use super::{create_searcher, load_config, print_info, resolve_data_dir};
use crate::progress::{finish_spinner, finish_spinner_warn, spinner};
use crate::GlobalOptions;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Discard the existing catalog and rebuild from the cached dataset
    #[arg(long)]
    force: bool,

    /// Also discard the cached dataset, forcing a fresh download
    #[arg(long, requires = "force")]
    refresh: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the ingest command
pub async fn execute(args: IngestArgs, global: GlobalOptions) -> Result<()> {
    if args.force {
        let config = load_config(&global)?;
        let data_dir = resolve_data_dir(&config)?;
        let mut names = vec![
            super::CATALOG_DB_FILE.to_string(),
            format!("{}-wal", super::CATALOG_DB_FILE),
            format!("{}-shm", super::CATALOG_DB_FILE),
        ];
        if args.refresh {
            names.push(config.dataset.cache_file_name.clone());
        }
        for name in names {
            // Missing files are fine; force just means "start clean".
            let _ = std::fs::remove_file(data_dir.join(name));
        }
        print_info("Discarded existing catalog", global.quiet);
    }

    let (searcher, config) = create_searcher(&global).await?;

    let pb = spinner("Ingesting city dataset...", args.json || global.quiet);
    let count = searcher.warm_up().await;

    if count == 0 {
        finish_spinner_warn(pb, "Ingestion produced an empty catalog");
    } else {
        finish_spinner(pb, &format!("Catalog ready: {} cities", count));
    }

    if args.json {
        let status = serde_json::json!({
            "cities": count,
            "dataset_url": config.dataset.url,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else if !global.quiet {
        println!("Indexed {} cities", count);
    }

    Ok(())
}
