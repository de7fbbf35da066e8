//! Hand-rolled `--flag value` / `--flag=value` lookup shared by the binaries.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;

pub fn args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

pub fn flag_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("--{name}=");
    let bare = format!("--{name}");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == bare
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
            && !next.starts_with("--")
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    let bare = format!("--{name}");
    args.iter().any(|arg| *arg == bare)
}

pub fn parse_limit(args: &[String]) -> Result<Option<usize>> {
    let Some(raw) = flag_value(args, "limit") else {
        return Ok(None);
    };
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(anyhow!("--limit expects a positive integer, got {raw:?}")),
    }
}

pub fn parse_cutoff(args: &[String]) -> Result<Option<NaiveDate>> {
    let Some(raw) = flag_value(args, "cutoff") else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|err| anyhow!("--cutoff expects YYYY-MM-DD, got {raw:?}: {err}"))
}
