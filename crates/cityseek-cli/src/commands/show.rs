//! Show command - Display a single city by id

use anyhow::Result;
use clap::Args;

use super::create_searcher;
use crate::GlobalOptions;

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// City id to display
    id: i64,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the show command
pub async fn execute(args: ShowArgs, global: GlobalOptions) -> Result<()> {
    let (searcher, _config) = create_searcher(&global).await?;

    let Some(m) = searcher.city_by_id(args.id).await else {
        anyhow::bail!("No city with id {} in the catalog", args.id);
    };

    if args.json {
        let city = serde_json::json!({
            "id": m.city.id,
            "name": m.city.name,
            "country": m.city.country,
            "latitude": m.city.latitude,
            "longitude": m.city.longitude,
            "favorite": m.favorite,
        });
        println!("{}", serde_json::to_string_pretty(&city)?);
        return Ok(());
    }

    println!("{}", m.city.title());
    println!("  {}", m.city.subtitle());
    println!("  Id:       {}", m.city.id);
    println!("  Favorite: {}", if m.favorite { "yes" } else { "no" });
    if global.verbose {
        println!(
            "  Map:      https://www.openstreetmap.org/?mlat={}&mlon={}",
            m.city.latitude, m.city.longitude
        );
    }

    Ok(())
}
