use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::field::Field;
use crate::flatten::TableRow;

static MATCH_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,3})(?:st|nd|rd|th) Match").expect("match number pattern is valid")
});

/// One scheduled match from the series listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchListing {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "matchType")]
    pub match_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    pub date: String,
    #[serde(default, alias = "dateTimeGMT")]
    pub date_time_gmt: Option<String>,
    #[serde(default)]
    pub team1: Option<String>,
    #[serde(default)]
    pub team2: Option<String>,
    #[serde(default, alias = "tossWinner")]
    pub toss_winner: Option<String>,
    #[serde(default, alias = "tossChoice")]
    pub toss_choice: Option<String>,
    #[serde(default, alias = "matchWinner")]
    pub match_winner: Option<String>,
    #[serde(default, alias = "matchStarted", deserialize_with = "lenient_bool")]
    pub match_started: Option<bool>,
    #[serde(default, alias = "matchEnded", deserialize_with = "lenient_bool")]
    pub match_ended: Option<bool>,
    #[serde(default, alias = "Match Number")]
    pub match_number: Option<String>,
}

impl TableRow for MatchListing {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "name",
        "match_type",
        "status",
        "venue",
        "date",
        "date_time_gmt",
        "team1",
        "team2",
        "toss_winner",
        "toss_choice",
        "match_winner",
        "match_started",
        "match_ended",
        "match_number",
    ];
}

impl MatchListing {
    /// Calendar date of the fixture. Accepts a bare `YYYY-MM-DD` or any
    /// timestamp that starts with one.
    pub fn scheduled_date(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub fn match_number_int(&self) -> Option<u32> {
        self.match_number.as_deref().and_then(match_number_from_name)
    }
}

/// Pulls the ordinal out of names like "Royal Challengers vs Kings, 12th Match".
pub fn extract_match_number(name: &str) -> Option<String> {
    MATCH_NUMBER_RE
        .find(name)
        .map(|m| m.as_str().to_string())
}

fn match_number_from_name(name: &str) -> Option<u32> {
    MATCH_NUMBER_RE
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Builds the listing from a `series_info` data object, ordered by match
/// number. Entries without a number (playoffs, finals) keep their upstream
/// order after the numbered ones.
pub fn parse_series_listing(data: &Value) -> Vec<MatchListing> {
    let mut rows = Field::of(data)
        .get("matchList")
        .items()
        .iter()
        .filter_map(listing_from_value)
        .collect::<Vec<_>>();
    rows.sort_by_key(|row| (row.match_number_int().is_none(), row.match_number_int()));
    rows
}

fn listing_from_value(value: &Value) -> Option<MatchListing> {
    let f = Field::of(value);
    let id = f
        .get("id")
        .string()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;
    let name = f.get("name").string();
    let teams = f.get("teams");
    Some(MatchListing {
        id,
        match_number: name.as_deref().and_then(extract_match_number),
        name,
        match_type: f.get("matchType").string(),
        status: f.get("status").string(),
        venue: f.get("venue").string(),
        date: f.get("date").string().unwrap_or_default(),
        date_time_gmt: f.get("dateTimeGMT").string(),
        team1: teams.at(0).string(),
        team2: teams.at(1).string(),
        toss_winner: f.get("tossWinner").string(),
        toss_choice: f.get("tossChoice").string(),
        match_winner: f.get("matchWinner").string(),
        match_started: f.get("matchStarted").bool(),
        match_ended: f.get("matchEnded").bool(),
    })
}

pub fn read_listing_csv(path: &Path) -> Result<Vec<MatchListing>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open listing csv {}", path.display()))?;
    let mut out = Vec::new();
    for (idx, row) in reader.deserialize::<MatchListing>().enumerate() {
        let row = row.with_context(|| format!("decode listing row {}", idx + 1))?;
        out.push(row);
    }
    Ok(out)
}

pub fn write_listing_csv(path: &Path, rows: &[MatchListing]) -> Result<usize> {
    crate::store::write_table(path, rows)
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }))
}
