//! Search command - Prefix search over the city catalog

use anyhow::Result;
use clap::Args;

use super::create_searcher;
use crate::progress::{finish_spinner, spinner};
use crate::GlobalOptions;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Name or country prefix; omit to list the whole catalog
    #[arg(default_value = "")]
    query: String,

    /// Only show favorite cities
    #[arg(long, short = 'f')]
    favorites: bool,

    /// Show one page of results (1-based)
    #[arg(long, short = 'p')]
    page: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the search command
pub async fn execute(args: SearchArgs, global: GlobalOptions) -> Result<()> {
    let (searcher, _config) = create_searcher(&global).await?;

    let pb = spinner("Searching...", args.json || global.quiet);

    let (matches, page_info) = match args.page {
        Some(page) => {
            let page = searcher.page(&args.query, args.favorites, page).await;
            let info = (page.prev_key, page.next_key);
            (page.items, Some(info))
        }
        None => (searcher.query(&args.query, args.favorites).await, None),
    };

    finish_spinner(pb, &format!("{} matches", matches.len()));

    if args.json {
        let results: Vec<serde_json::Value> = matches
            .iter()
            .map(|m| {
                serde_json::json!({
                    "id": m.city.id,
                    "name": m.city.name,
                    "country": m.city.country,
                    "latitude": m.city.latitude,
                    "longitude": m.city.longitude,
                    "favorite": m.favorite,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No cities match '{}'", args.query);
        return Ok(());
    }

    for m in &matches {
        let marker = if m.favorite { " ★" } else { "" };
        println!("{:>10}  {}{}", m.city.id, m.city.title(), marker);
        if global.verbose {
            println!("            {}", m.city.subtitle());
        }
    }

    if let Some((prev, next)) = page_info {
        match (prev, next) {
            (Some(p), Some(n)) => println!("\nPages: previous {}, next {}", p, n),
            (None, Some(n)) => println!("\nPages: next {}", n),
            (Some(p), None) => println!("\nPages: previous {} (end of results)", p),
            (None, None) => {}
        }
    }

    Ok(())
}
