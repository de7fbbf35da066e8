use std::fmt;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::IngestConfig;
use crate::cricapi::ScorecardSource;
use crate::flatten::{Table, flatten};
use crate::ledger::{pending_identifiers, today};
use crate::listing::{MatchListing, read_listing_csv};
use crate::store::{load_cached_records, materialized_ids, save_match_json, write_tables};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Persist each scorecard as `<id>.json` and stop there.
    Json,
    /// Persist the JSON documents, then flatten the batch into the six CSV tables.
    Tables,
}

impl OutputMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "tables" | "csv" => Some(Self::Tables),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub cutoff: NaiveDate,
    pub fetch_limit: usize,
    pub mode: OutputMode,
    /// Flatten every cached document instead of only this run's fetches.
    pub reflatten_cache: bool,
}

impl RunOptions {
    pub fn from_config(cfg: &IngestConfig) -> Self {
        Self {
            cutoff: today(),
            fetch_limit: cfg.fetch_limit,
            mode: OutputMode::Tables,
            reflatten_cache: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Listing,
    Fetching { index: usize, total: usize },
    Flattening { records: usize },
    Persisting,
    Done,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStage::Listing => write!(f, "listing"),
            RunStage::Fetching { index, total } => write!(f, "fetching {index}/{total}"),
            RunStage::Flattening { records } => write!(f, "flattening {records} records"),
            RunStage::Persisting => write!(f, "persisting tables"),
            RunStage::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub match_id: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub cutoff: NaiveDate,
    pub pending: usize,
    pub attempted: Vec<String>,
    pub fetched: Vec<String>,
    pub failures: Vec<FetchFailure>,
    pub tables: Vec<(Table, usize)>,
}

impl RunReport {
    fn new(cutoff: NaiveDate) -> Self {
        Self {
            cutoff,
            pending: 0,
            attempted: Vec::new(),
            fetched: Vec::new(),
            failures: Vec::new(),
            tables: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.attempted.is_empty() && self.tables.is_empty()
    }

    pub fn rows_in(&self, table: Table) -> Option<usize> {
        self.tables
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, count)| *count)
    }

    pub fn print_summary(&self) {
        println!("Cutoff: {}", self.cutoff);
        println!("Pending matches: {}", self.pending);
        if self.pending == 0 && self.tables.is_empty() {
            println!("No new matches to fetch.");
            return;
        }
        println!(
            "Fetched: {}/{}",
            self.fetched.len(),
            self.attempted.len()
        );
        if !self.failures.is_empty() {
            println!("Failures: {}", self.failures.len());
            for failure in self.failures.iter().take(10) {
                println!(" - {}: {}", failure.match_id, failure.error);
            }
        }
        for (table, rows) in &self.tables {
            println!("Saved {} with {} records", table.file_name(), rows);
        }
    }
}

pub fn run_daily<S: ScorecardSource>(
    source: &S,
    cfg: &IngestConfig,
    opts: &RunOptions,
) -> Result<RunReport> {
    run_daily_with_progress(source, cfg, opts, |_| {})
}

/// Reads the listing CSV named by `cfg` and runs one batch.
pub fn run_daily_with_progress<S: ScorecardSource>(
    source: &S,
    cfg: &IngestConfig,
    opts: &RunOptions,
    mut on_stage: impl FnMut(RunStage),
) -> Result<RunReport> {
    on_stage(RunStage::Listing);
    let listing = read_listing_csv(&cfg.match_list_csv)?;
    run_batch(source, &listing, cfg, opts, on_stage)
}

/// One pass of listing -> fetching -> flattening -> persisting. Fetch and
/// per-match save failures are recorded and skipped; other local I/O
/// failures abort the run.
pub fn run_batch<S: ScorecardSource>(
    source: &S,
    listing: &[MatchListing],
    cfg: &IngestConfig,
    opts: &RunOptions,
    mut on_stage: impl FnMut(RunStage),
) -> Result<RunReport> {
    if opts.fetch_limit == 0 {
        return Err(anyhow!("fetch limit must be at least 1"));
    }
    let mut report = RunReport::new(opts.cutoff);

    let materialized = materialized_ids(&cfg.match_json_dir)?;
    let pending = pending_identifiers(listing, &materialized, opts.cutoff);
    report.pending = pending.len();
    info!(cutoff = %opts.cutoff, pending = report.pending, "pending matches resolved");

    let selected = pending.into_iter().take(opts.fetch_limit).collect::<Vec<_>>();
    let total = selected.len();
    let mut records: Vec<Value> = Vec::new();

    for (idx, match_id) in selected.into_iter().enumerate() {
        on_stage(RunStage::Fetching {
            index: idx + 1,
            total,
        });
        report.attempted.push(match_id.clone());
        match source.fetch_scorecard(&match_id) {
            Ok(data) => match save_match_json(&cfg.match_json_dir, &match_id, &data) {
                Ok(path) => {
                    info!(match_id = %match_id, path = %path.display(), "saved match data");
                    if opts.mode == OutputMode::Tables && !opts.reflatten_cache {
                        records.push(data);
                    }
                    report.fetched.push(match_id);
                }
                Err(err) => {
                    let error = format!("{err:#}");
                    warn!(match_id = %match_id, error = %error, "save failed; left pending");
                    report.failures.push(FetchFailure { match_id, error });
                }
            },
            Err(err) => {
                warn!(match_id = %match_id, error = %err, "fetch failed; left pending");
                report.failures.push(FetchFailure {
                    match_id,
                    error: err.to_string(),
                });
            }
        }
    }

    if opts.mode == OutputMode::Tables {
        if opts.reflatten_cache {
            records = load_cached_records(&cfg.match_json_dir)?;
        }
        if !records.is_empty() {
            on_stage(RunStage::Flattening {
                records: records.len(),
            });
            let tables = flatten(&records);
            on_stage(RunStage::Persisting);
            report.tables = write_tables(&cfg.parsed_csv_dir, &tables)?;
        }
    }

    on_stage(RunStage::Done);
    info!(
        attempted = report.attempted.len(),
        fetched = report.fetched.len(),
        failed = report.failures.len(),
        "batch finished"
    );
    Ok(report)
}
