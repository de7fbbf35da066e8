use anyhow::Result;
use tracing::warn;

use ipl_ingest::cli_args::{args, parse_cutoff, parse_limit};
use ipl_ingest::config::IngestConfig;
use ipl_ingest::cricapi::CricApiClient;
use ipl_ingest::logging;
use ipl_ingest::pipeline::{OutputMode, RunOptions, run_daily};

fn main() -> Result<()> {
    logging::init();
    let cfg = IngestConfig::load();
    let args = args();

    let mut opts = RunOptions::from_config(&cfg);
    opts.mode = OutputMode::Json;
    if let Some(limit) = parse_limit(&args)? {
        opts.fetch_limit = limit;
    }
    if let Some(cutoff) = parse_cutoff(&args)? {
        opts.cutoff = cutoff;
    }
    if cfg.api_key.is_none() {
        warn!("API_KEY is not set; the upstream will reject every request");
    }

    println!("Running daily JSON fetch for {}", opts.cutoff);
    let client = CricApiClient::from_config(&cfg);
    let report = run_daily(&client, &cfg, &opts)?;
    report.print_summary();
    println!("JSON dir: {}", cfg.match_json_dir.display());
    Ok(())
}
