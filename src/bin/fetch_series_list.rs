use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use ipl_ingest::cli_args::{args, flag_value};
use ipl_ingest::config::IngestConfig;
use ipl_ingest::cricapi::CricApiClient;
use ipl_ingest::listing::{MatchListing, parse_series_listing, write_listing_csv};
use ipl_ingest::logging;

const PREVIEW_ROWS: usize = 80;

fn main() -> Result<()> {
    logging::init();
    let cfg = IngestConfig::load();
    let args = args();

    let series_id = flag_value(&args, "series-id").unwrap_or_else(|| cfg.series_id.clone());
    let out = flag_value(&args, "out")
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.match_list_csv.clone());

    let client = CricApiClient::from_config(&cfg);
    let data = client
        .fetch_series_info(&series_id)
        .with_context(|| format!("fetch series info for {series_id}"))?;
    let rows = parse_series_listing(&data);
    if rows.is_empty() {
        return Err(anyhow!("series {series_id} returned no matches"));
    }

    preview(&rows);
    let written = write_listing_csv(&out, &rows)?;
    println!("Saved {written} matches to {}", out.display());
    Ok(())
}

fn preview(rows: &[MatchListing]) {
    println!("Sorted match list preview:");
    for row in rows.iter().take(PREVIEW_ROWS) {
        println!(
            "{:<12} {:<60} {:<40} {}",
            row.match_number.as_deref().unwrap_or("-"),
            row.name.as_deref().unwrap_or("-"),
            row.venue.as_deref().unwrap_or("-"),
            row.date
        );
    }
    if rows.len() > PREVIEW_ROWS {
        println!("... {} more", rows.len() - PREVIEW_ROWS);
    }
}
