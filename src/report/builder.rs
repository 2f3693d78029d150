//! Detail record construction.
//!
//! Merges classifier output onto aggregated entries and stamps each result
//! with the request instant.

use crate::models::{AggregatedEntry, Classification, DetailRecord};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

/// Detail records for one request, with batch totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBatch {
    /// One record per aggregated entry, in aggregation order.
    pub records: Vec<DetailRecord>,
    /// Duration classified Productive.
    pub productive_time: u64,
    /// Duration classified Distracting.
    pub distracting_time: u64,
}

/// Build one detail record per aggregated entry.
///
/// Titles missing from `classifications` are Distracting. Entries with zero
/// duration still produce a record.
pub fn build_records(
    entries: BTreeMap<String, AggregatedEntry>,
    classifications: &HashMap<String, Classification>,
    timestamp: DateTime<Utc>,
) -> RecordBatch {
    let mut batch = RecordBatch::default();

    for (title, entry) in entries {
        let classification = classifications
            .get(&title)
            .copied()
            .unwrap_or(Classification::Distracting);

        match classification {
            Classification::Productive => {
                batch.productive_time = batch.productive_time.saturating_add(entry.total_duration)
            }
            Classification::Distracting => {
                batch.distracting_time =
                    batch.distracting_time.saturating_add(entry.total_duration)
            }
        }

        batch.records.push(DetailRecord {
            title,
            urls: entry.urls.into_iter().collect(),
            duration: entry.total_duration,
            classification,
            timestamp,
        });
    }

    batch
}

/// Sort records longest first. Stable, so ties keep their relative order.
pub fn sort_by_duration_desc(records: &mut [DetailRecord]) {
    records.sort_by(|a, b| b.duration.cmp(&a.duration));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate_records;
    use crate::models::ActivityRecord;

    fn entries() -> BTreeMap<String, AggregatedEntry> {
        aggregate_records(&[
            ActivityRecord::new("Docs", "https://docs.example.com", 120),
            ActivityRecord::new("Docs", "https://docs.example.com/2", 30),
            ActivityRecord::new("Cat Videos", "https://video.example.com", 300),
            ActivityRecord::new("Idle Tab", "https://idle.example.com", 0),
        ])
    }

    #[test]
    fn test_build_records_applies_classifications() {
        let classifications = HashMap::from([
            ("Docs".to_string(), Classification::Productive),
            ("Cat Videos".to_string(), Classification::Distracting),
        ]);
        let now = Utc::now();

        let batch = build_records(entries(), &classifications, now);

        assert_eq!(batch.records.len(), 3);
        assert_eq!(batch.productive_time, 150);
        assert_eq!(batch.distracting_time, 300);

        let docs = batch.records.iter().find(|r| r.title == "Docs").unwrap();
        assert_eq!(docs.classification, Classification::Productive);
        assert_eq!(docs.urls.len(), 2);
        assert_eq!(docs.timestamp, now);

        let idle = batch.records.iter().find(|r| r.title == "Idle Tab").unwrap();
        assert_eq!(idle.duration, 0);
        assert_eq!(idle.classification, Classification::Distracting);
    }

    #[test]
    fn test_empty_mapping_falls_back_to_distracting() {
        let batch = build_records(entries(), &HashMap::new(), Utc::now());

        assert!(batch
            .records
            .iter()
            .all(|r| r.classification == Classification::Distracting));
        assert_eq!(batch.productive_time, 0);
        assert_eq!(batch.distracting_time, 450);
    }

    #[test]
    fn test_sort_by_duration_desc_is_stable() {
        let mut batch = build_records(entries(), &HashMap::new(), Utc::now());
        batch.records.push(DetailRecord {
            title: "Another Idle Tab".to_string(),
            urls: vec![],
            duration: 0,
            classification: Classification::Distracting,
            timestamp: Utc::now(),
        });

        sort_by_duration_desc(&mut batch.records);

        let titles: Vec<&str> = batch.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Cat Videos", "Docs", "Idle Tab", "Another Idle Tab"]
        );
    }
}
