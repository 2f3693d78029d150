//! Response assembly for the classify operation.

use super::builder::{sort_by_duration_desc, RecordBatch};
use crate::models::{ClassifyResponse, DayRollup, SessionReport};

/// Combine the batch just built with the day rollup.
pub fn compose(batch: RecordBatch, today: DayRollup) -> ClassifyResponse {
    let mut details = batch.records;
    sort_by_duration_desc(&mut details);

    ClassifyResponse {
        current_session: SessionReport {
            productive_time: batch.productive_time,
            distracting_time: batch.distracting_time,
            details,
        },
        today_total: today,
    }
}

/// Response for an empty submission: zero session totals, no details.
pub fn empty_report(today: DayRollup) -> ClassifyResponse {
    compose(RecordBatch::default(), today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, DetailRecord};
    use chrono::Utc;

    fn detail(title: &str, duration: u64, classification: Classification) -> DetailRecord {
        DetailRecord {
            title: title.to_string(),
            urls: vec![],
            duration,
            classification,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_compose_sorts_details_and_copies_totals() {
        let batch = RecordBatch {
            records: vec![
                detail("Docs", 150, Classification::Productive),
                detail("Cat Videos", 300, Classification::Distracting),
            ],
            productive_time: 150,
            distracting_time: 300,
        };
        let today = DayRollup {
            productive_total: 1000,
            distracting_total: 2000,
        };

        let response = compose(batch, today);

        assert_eq!(response.current_session.productive_time, 150);
        assert_eq!(response.current_session.distracting_time, 300);
        assert_eq!(response.current_session.details[0].title, "Cat Videos");
        assert_eq!(response.current_session.details[1].title, "Docs");
        assert_eq!(response.today_total, today);
    }

    #[test]
    fn test_empty_report() {
        let today = DayRollup {
            productive_total: 42,
            distracting_total: 7,
        };

        let response = empty_report(today);
        assert_eq!(response.current_session, SessionReport::default());
        assert_eq!(response.today_total, today);
    }
}
