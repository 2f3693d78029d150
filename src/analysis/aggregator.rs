//! Activity aggregation.
//!
//! This module collapses a batch of raw activity records into one entry per
//! distinct title, summing durations and collecting the URLs seen under it.

use crate::models::{ActivityRecord, AggregatedEntry};
use std::collections::BTreeMap;

/// Group activity records by title.
///
/// No record is dropped: zero durations still create (or extend) an entry.
/// The map is ordered by title so every later stage sees a stable order.
pub fn aggregate_records(records: &[ActivityRecord]) -> BTreeMap<String, AggregatedEntry> {
    let mut grouped: BTreeMap<String, AggregatedEntry> = BTreeMap::new();

    for record in records {
        let title = record.effective_title();
        let entry = grouped
            .entry(title.to_string())
            .or_insert_with(|| AggregatedEntry::new(title.to_string()));

        entry.total_duration = entry
            .total_duration
            .saturating_add(record.effective_duration());
        entry.urls.insert(record.effective_url().to_string());
    }

    grouped
}

/// Distinct titles in the order the aggregation yields them.
pub fn distinct_titles(entries: &BTreeMap<String, AggregatedEntry>) -> Vec<String> {
    entries.keys().cloned().collect()
}

/// Total duration across a batch of raw records.
pub fn total_duration(records: &[ActivityRecord]) -> u64 {
    records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.effective_duration()))
}
