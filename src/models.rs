//! Data models for the activity classifier.
//!
//! This module contains the core data structures that flow through the
//! classify pipeline: raw activity records from the extension, per-title
//! aggregates, classified detail records and the report payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Title used when an activity record carries none.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Upper bound for a single activity record, in seconds (one day).
pub const MAX_RECORD_DURATION: u64 = 86_400;

/// Productivity verdict for a page title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Work, learning, tooling.
    Productive,
    /// Entertainment, social media, anything uncertain.
    Distracting,
}

impl Classification {
    /// Interpret a raw label produced by the language model.
    ///
    /// Any label containing "productive" (case-insensitive) is productive,
    /// everything else is distracting.
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("productive") {
            Classification::Productive
        } else {
            Classification::Distracting
        }
    }

    /// Canonical spelling used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Productive => "Productive",
            Classification::Distracting => "Distracting",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = String;

    /// Strict parse of the canonical spelling (used when reading storage).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Productive" => Ok(Classification::Productive),
            "Distracting" => Ok(Classification::Distracting),
            other => Err(format!("unknown classification '{}'", other)),
        }
    }
}

/// One raw observation of time spent on a titled page.
///
/// Every field is optional on the wire; defaults are applied during
/// aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Page title.
    #[serde(default)]
    pub title: Option<String>,
    /// Page URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Whole seconds spent on the page.
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: Option<u64>,
}

impl ActivityRecord {
    /// Convenience constructor with every field present.
    pub fn new(title: &str, url: &str, duration: u64) -> Self {
        Self {
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            duration: Some(duration),
        }
    }

    /// The title with the "Unknown" default applied (also for blank titles).
    pub fn effective_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => UNKNOWN_TITLE,
        }
    }

    /// The URL, or an empty string when absent.
    pub fn effective_url(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }

    /// The duration, or zero when absent.
    pub fn effective_duration(&self) -> u64 {
        self.duration.unwrap_or(0)
    }
}

/// Accept any JSON number for a duration.
///
/// The browser extension measures fractional seconds, so values are rounded
/// to whole seconds. Negative values clamp to zero and values above
/// [`MAX_RECORD_DURATION`] clamp to it.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = Option::<f64>::deserialize(deserializer)?;
    Ok(seconds.map(normalize_duration))
}

/// Round a duration in seconds to a whole number in `0..=MAX_RECORD_DURATION`.
pub fn normalize_duration(seconds: f64) -> u64 {
    if seconds.is_nan() || seconds <= 0.0 {
        return 0;
    }
    seconds.round().min(MAX_RECORD_DURATION as f64) as u64
}

/// Per-title rollup of duration and URLs within a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedEntry {
    /// The distinct title.
    pub title: String,
    /// Sum of the durations of every record with this title.
    pub total_duration: u64,
    /// Distinct URLs seen under this title.
    pub urls: BTreeSet<String>,
}

impl AggregatedEntry {
    /// Creates an empty entry for a title.
    pub fn new(title: String) -> Self {
        Self {
            title,
            total_duration: 0,
            urls: BTreeSet::new(),
        }
    }
}

/// The persisted, classified, timestamped unit of history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub title: String,
    pub urls: Vec<String>,
    pub duration: u64,
    pub classification: Classification,
    pub timestamp: DateTime<Utc>,
}

/// A detail record as read back from storage, with its row id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    #[serde(flatten)]
    pub record: DetailRecord,
}

/// Sum of persisted durations per classification since a day boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRollup {
    #[serde(rename = "productive_time")]
    pub productive_total: u64,
    #[serde(rename = "distracting_time")]
    pub distracting_total: u64,
}

/// Request body of the classify operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub history: Vec<ActivityRecord>,
}

/// Totals and details for the batch just submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub productive_time: u64,
    pub distracting_time: u64,
    /// Detail records, longest duration first.
    pub details: Vec<DetailRecord>,
}

/// Response of the classify operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub current_session: SessionReport,
    pub today_total: DayRollup,
}
