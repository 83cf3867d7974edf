//! Favorite command - Toggle a city's favorite flag

use anyhow::{Context, Result};
use clap::Args;

use super::create_searcher;
use crate::GlobalOptions;

/// Arguments for the favorite command
#[derive(Args, Debug)]
pub struct FavoriteArgs {
    /// City id to toggle
    id: i64,
}

/// Execute the favorite command
pub async fn execute(args: FavoriteArgs, global: GlobalOptions) -> Result<()> {
    let (searcher, _config) = create_searcher(&global).await?;

    let found = searcher.city_by_id(args.id).await;
    if found.is_none() {
        anyhow::bail!("No city with id {} in the catalog", args.id);
    }

    searcher
        .toggle_favorite(args.id)
        .await
        .context("Failed to persist favorites")?;

    if let Some(m) = searcher.city_by_id(args.id).await {
        if !global.quiet {
            let state = if m.favorite { "favorite" } else { "no longer favorite" };
            println!("{} is now {}", m.city.title(), state);
        }
    }

    Ok(())
}
