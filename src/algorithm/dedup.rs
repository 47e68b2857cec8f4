//! Duplicate claim identifiers
//!
//! The claims table is expected to hold one row per claim identifier but
//! the source data does not guarantee it. Rows are reduced to one per
//! identifier under an explicit policy before any aggregation.

use rustc_hash::FxHashSet;

use crate::config::DuplicatePolicy;
use crate::error::{PipelineError, Result};

/// Rows kept after deduplication and how many were dropped
#[derive(Debug, Clone)]
pub struct Deduplicated<T> {
    /// One row per identifier, in input order
    pub rows: Vec<T>,
    /// Number of rows dropped as duplicates
    pub dropped: usize,
}

/// Reduce `rows` to one per key, keeping input order
///
/// `FirstWins` keeps the first row seen for each key. `Reject` fails on the
/// first repeated key.
pub fn deduplicate<T, F>(rows: Vec<T>, key: F, policy: DuplicatePolicy) -> Result<Deduplicated<T>>
where
    F: Fn(&T) -> &str,
{
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut kept = Vec::with_capacity(rows.len());
    let mut dropped = 0;

    for row in rows {
        if seen.insert(key(&row).to_string()) {
            kept.push(row);
            continue;
        }
        match policy {
            DuplicatePolicy::FirstWins => dropped += 1,
            DuplicatePolicy::Reject => {
                return Err(PipelineError::DuplicateClaim(key(&row).to_string()));
            }
        }
    }

    if dropped > 0 {
        log::warn!("Dropped {dropped} rows with a repeated claim identifier (first row kept)");
    }

    Ok(Deduplicated { rows: kept, dropped })
}
