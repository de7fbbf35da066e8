use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::listing::{MatchListing, read_listing_csv};
use crate::store::{is_safe_id, materialized_ids};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Ids scheduled on or before `cutoff`. Rows with no id, an id that cannot
/// name a JSON document, or no readable date are left out.
pub fn eligible_identifiers(listing: &[MatchListing], cutoff: NaiveDate) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for row in listing {
        let id = row.id.trim();
        if id.is_empty() {
            continue;
        }
        if !is_safe_id(id) {
            warn!(match_id = %id, "listing id is not usable as a file name");
            continue;
        }
        let Some(date) = row.scheduled_date() else {
            warn!(match_id = %id, date = %row.date, "listing row has no usable date");
            continue;
        };
        if date <= cutoff {
            out.insert(id.to_string());
        }
    }
    out
}

/// `eligible(listing, cutoff) - materialized`.
///
/// The result is ordered by identifier only so that truncating it to a batch
/// is reproducible; the order carries no meaning.
pub fn pending_identifiers(
    listing: &[MatchListing],
    materialized: &HashSet<String>,
    cutoff: NaiveDate,
) -> BTreeSet<String> {
    eligible_identifiers(listing, cutoff)
        .into_iter()
        .filter(|id| !materialized.contains(id))
        .collect()
}

/// Reads the listing CSV and the JSON directory as they are right now and
/// returns what is still pending.
pub fn pending_from_disk(
    listing_csv: &Path,
    json_dir: &Path,
    cutoff: NaiveDate,
) -> Result<BTreeSet<String>> {
    let listing = read_listing_csv(listing_csv)?;
    let materialized = materialized_ids(json_dir)?;
    debug!(
        listed = listing.len(),
        materialized = materialized.len(),
        "ledger inputs loaded"
    );
    Ok(pending_identifiers(&listing, &materialized, cutoff))
}
