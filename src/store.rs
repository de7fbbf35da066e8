use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{debug, warn};

use crate::flatten::{FlattenedTables, Table, TableRow};

const JSON_EXT: &str = "json";

/// Identifiers that already have a `<id>.json` document in `dir`.
/// A directory that does not exist yet holds nothing.
pub fn materialized_ids(dir: &Path) -> Result<HashSet<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(err) => {
            return Err(err).with_context(|| format!("list match json dir {}", dir.display()));
        }
    };

    let mut ids = HashSet::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        if let Some(id) = id_from_path(&entry.path()) {
            ids.insert(id);
        }
    }
    Ok(ids)
}

pub fn match_json_path(dir: &Path, match_id: &str) -> Result<PathBuf> {
    if !is_safe_id(match_id) {
        return Err(anyhow!("refusing to use {match_id:?} as a file name"));
    }
    Ok(dir.join(format!("{match_id}.{JSON_EXT}")))
}

/// Writes one scorecard as pretty JSON (2-space indent). The write goes to a
/// temp file first so a half-written document never counts as materialized.
pub fn save_match_json(dir: &Path, match_id: &str, data: &Value) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = match_json_path(dir, match_id)?;
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(data).context("serialize match json")?;
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    if let Err(err) = fs::rename(&tmp, &path) {
        let _ = fs::remove_file(&tmp);
        return Err(err).with_context(|| format!("swap {}", path.display()));
    }
    Ok(path)
}

/// Every cached scorecard in `dir`, ordered by identifier. Documents that no
/// longer parse are skipped with a warning.
pub fn load_cached_records(dir: &Path) -> Result<Vec<Value>> {
    let mut ids = materialized_ids(dir)?.into_iter().collect::<Vec<_>>();
    ids.sort_unstable();

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        let path = match_json_path(dir, &id)?;
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => out.push(value),
            Err(err) => warn!(match_id = %id, error = %err, "skipping unreadable cached scorecard"),
        }
    }
    Ok(out)
}

/// Writes `rows` with a header line, replacing whatever was at `path`.
/// The header is written even when there are no rows.
pub fn write_table<T: TableRow>(path: &Path, rows: &[T]) -> Result<usize> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    writer
        .write_record(T::HEADERS)
        .with_context(|| format!("write header to {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(rows.len())
}

/// Writes all six tables into `dir`. Tables are written one after another;
/// a failure part way leaves the earlier files in place.
pub fn write_tables(dir: &Path, tables: &FlattenedTables) -> Result<Vec<(Table, usize)>> {
    let mut written = Vec::with_capacity(Table::ALL.len());
    for table in Table::ALL {
        let path = dir.join(table.file_name());
        let count = match table {
            Table::Matches => write_table(&path, &tables.matches)?,
            Table::Innings => write_table(&path, &tables.innings)?,
            Table::Batting => write_table(&path, &tables.batting)?,
            Table::Bowling => write_table(&path, &tables.bowling)?,
            Table::Fielding => write_table(&path, &tables.fielding)?,
            Table::Extras => write_table(&path, &tables.extras)?,
        };
        debug!(file = table.file_name(), rows = count, "table written");
        written.push((table, count));
    }
    Ok(written)
}

fn id_from_path(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(JSON_EXT) {
        return None;
    }
    let id = path.file_stem()?.to_str()?;
    (!id.is_empty()).then(|| id.to_string())
}

/// Whether `id` can be used verbatim as a file name in the match JSON dir.
pub fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', '\0'])
}
