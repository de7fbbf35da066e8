use anyhow::{Result, anyhow};
use tracing::{debug, warn};

use ipl_ingest::cli_args::{args, flag_value, has_flag, parse_cutoff, parse_limit};
use ipl_ingest::config::IngestConfig;
use ipl_ingest::cricapi::CricApiClient;
use ipl_ingest::logging;
use ipl_ingest::pipeline::{OutputMode, RunOptions, run_daily_with_progress};

fn main() -> Result<()> {
    logging::init();
    let cfg = IngestConfig::load();
    let args = args();

    let mut opts = RunOptions::from_config(&cfg);
    if let Some(limit) = parse_limit(&args)? {
        opts.fetch_limit = limit;
    }
    if let Some(cutoff) = parse_cutoff(&args)? {
        opts.cutoff = cutoff;
    }
    if let Some(raw) = flag_value(&args, "mode") {
        opts.mode = OutputMode::parse(&raw)
            .ok_or_else(|| anyhow!("--mode expects tables or json, got {raw:?}"))?;
    }
    opts.reflatten_cache = has_flag(&args, "reflatten");

    if cfg.api_key.is_none() {
        warn!("API_KEY is not set; the upstream will reject every request");
    }

    println!("Running daily fetch for {}", opts.cutoff);
    let client = CricApiClient::from_config(&cfg);
    let report = run_daily_with_progress(&client, &cfg, &opts, |stage| {
        debug!(%stage, "stage");
    })?;
    report.print_summary();
    Ok(())
}
