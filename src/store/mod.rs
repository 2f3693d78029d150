//! Time-series store for classified detail records.
//!
//! Append-and-wipe persistence on SQLite. Records are never updated; the
//! only deletion is a full wipe.

use crate::models::{Classification, DayRollup, DetailRecord, HistoryEntry};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS browsing_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    urls TEXT NOT NULL,
    duration INTEGER NOT NULL,
    classification TEXT NOT NULL,
    timestamp INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_browsing_history_timestamp
    ON browsing_history (timestamp);
";

/// Row shape as read from SQLite, before conversion.
type RawRow = (i64, String, String, i64, String, i64);

/// Shared handle to the history database.
///
/// Cloning shares the connection. The handle is opened once at startup and
/// closed at shutdown; operations after [`HistoryStore::close`] fail.
#[derive(Clone)]
pub struct HistoryStore {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl HistoryStore {
    /// Open (or create) the database file and ensure the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .context("Failed to enable WAL mode")?;
        debug!("SQLite journal mode: {}", mode);

        info!("Opened history database at {}", path.display());
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .context("Failed to initialize history schema")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Persist records as new rows in one transaction.
    ///
    /// No deduplication; an empty slice issues no statement at all.
    pub async fn append_all(&self, records: &[DetailRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(closed)?;

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO browsing_history (title, urls, duration, classification, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in records {
                let urls = serde_json::to_string(&record.urls)?;
                stmt.execute(params![
                    record.title,
                    urls,
                    saturating_i64(record.duration),
                    record.classification.as_str(),
                    record.timestamp.timestamp_millis(),
                ])?;
            }
        }
        tx.commit().context("Failed to commit history records")?;

        debug!("Persisted {} detail records", records.len());
        Ok(())
    }

    /// Sum durations per classification for records at or after `day_start`.
    ///
    /// Classifications with no records report zero. Sums saturate instead of
    /// overflowing, so one oversized row cannot break later rollups.
    pub async fn query_day_rollup(&self, day_start: DateTime<Utc>) -> Result<DayRollup> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(closed)?;

        let mut stmt = conn.prepare(
            "SELECT classification, duration FROM browsing_history
             WHERE timestamp >= ?1",
        )?;
        let rows = stmt.query_map(params![day_start.timestamp_millis()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut rollup = DayRollup::default();
        for row in rows {
            let (classification, duration) = row?;
            let duration = to_u64(duration)?;
            match classification.parse::<Classification>() {
                Ok(Classification::Productive) => {
                    rollup.productive_total = rollup.productive_total.saturating_add(duration)
                }
                Ok(Classification::Distracting) => {
                    rollup.distracting_total = rollup.distracting_total.saturating_add(duration)
                }
                Err(e) => return Err(anyhow!(e)),
            }
        }

        Ok(rollup)
    }

    /// Most recently persisted records, newest first.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(closed)?;

        let mut stmt = conn.prepare(
            "SELECT id, title, urls, duration, classification, timestamp
             FROM browsing_history
             ORDER BY timestamp DESC, id DESC
             LIMIT ?1",
        )?;
        let limit = to_i64(limit as u64)?;
        let rows = stmt.query_map(params![limit], |row| -> rusqlite::Result<RawRow> {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row_to_entry(row?)?);
        }
        Ok(results)
    }

    /// Delete every persisted record. Returns the number removed.
    pub async fn wipe_all(&self) -> Result<usize> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(closed)?;

        let rows_deleted = conn.execute("DELETE FROM browsing_history", [])?;
        info!("Wiped {} history records", rows_deleted);
        Ok(rows_deleted)
    }

    /// Close the underlying connection.
    pub async fn close(&self) -> Result<()> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.take() {
            conn.close()
                .map_err(|(_, e)| e)
                .context("Failed to close history database")?;
            info!("Closed history database");
        }
        Ok(())
    }
}

/// Start of the UTC calendar day containing `instant`.
pub fn day_start(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(instant)
}

fn closed() -> anyhow::Error {
    anyhow!("history store is closed")
}

fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_u64(value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("value {value} is negative"))
}

fn row_to_entry(row: RawRow) -> Result<HistoryEntry> {
    let (id, title, urls, duration, classification, timestamp) = row;

    let urls: Vec<String> = serde_json::from_str(&urls)
        .with_context(|| format!("invalid urls column for record {id}"))?;
    let classification = classification.parse::<Classification>().map_err(|e| anyhow!(e))?;
    let timestamp = DateTime::from_timestamp_millis(timestamp)
        .ok_or_else(|| anyhow!("invalid timestamp {timestamp} for record {id}"))?;

    Ok(HistoryEntry {
        id,
        record: DetailRecord {
            title,
            urls,
            duration: to_u64(duration)?,
            classification,
            timestamp,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn record(
        title: &str,
        duration: u64,
        classification: Classification,
        at: DateTime<Utc>,
    ) -> DetailRecord {
        DetailRecord {
            title: title.to_string(),
            urls: vec![format!("https://{}.example.com", title.to_lowercase())],
            duration,
            classification,
            timestamp: at,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_day_start() {
        let start = day_start(noon());
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap());
        assert_eq!(day_start(start), start);
    }

    #[tokio::test]
    async fn test_append_and_list_recent() {
        let store = HistoryStore::open_in_memory().unwrap();
        let now = noon();

        store
            .append_all(&[
                record("Docs", 150, Classification::Productive, now - Duration::minutes(5)),
                record("Cats", 300, Classification::Distracting, now),
            ])
            .await
            .unwrap();

        let recent = store.list_recent(100).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].record.title, "Cats");
        assert_eq!(recent[0].record.timestamp, now);
        assert_eq!(recent[1].record.title, "Docs");
        assert_eq!(recent[1].record.urls, vec!["https://docs.example.com"]);
        assert_eq!(recent[1].record.classification, Classification::Productive);
    }

    #[tokio::test]
    async fn test_list_recent_truncates() {
        let store = HistoryStore::open_in_memory().unwrap();
        let records: Vec<DetailRecord> = (0..5)
            .map(|i| {
                record(
                    &format!("Page{}", i),
                    10,
                    Classification::Distracting,
                    noon() + Duration::seconds(i),
                )
            })
            .collect();
        store.append_all(&records).await.unwrap();

        let recent = store.list_recent(3).await.unwrap();
        let titles: Vec<&str> = recent.iter().map(|e| e.record.title.as_str()).collect();
        assert_eq!(titles, vec!["Page4", "Page3", "Page2"]);
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let store = HistoryStore::open_in_memory().unwrap();
        let docs = record("Docs", 60, Classification::Productive, noon());

        store.append_all(&[docs.clone()]).await.unwrap();
        store.append_all(&[docs]).await.unwrap();

        assert_eq!(store.list_recent(100).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_day_rollup_respects_boundary() {
        let store = HistoryStore::open_in_memory().unwrap();
        let now = noon();
        let midnight = day_start(now);

        store
            .append_all(&[
                record(
                    "Old",
                    1000,
                    Classification::Productive,
                    midnight - Duration::milliseconds(1),
                ),
                record("Early", 40, Classification::Productive, midnight),
                record("Docs", 60, Classification::Productive, now),
                record("Cats", 300, Classification::Distracting, now),
            ])
            .await
            .unwrap();

        let rollup = store.query_day_rollup(midnight).await.unwrap();
        assert_eq!(rollup.productive_total, 100);
        assert_eq!(rollup.distracting_total, 300);
    }

    #[tokio::test]
    async fn test_day_rollup_missing_group_is_zero() {
        let store = HistoryStore::open_in_memory().unwrap();
        store
            .append_all(&[record("Docs", 60, Classification::Productive, noon())])
            .await
            .unwrap();

        let rollup = store.query_day_rollup(day_start(noon())).await.unwrap();
        assert_eq!(rollup.productive_total, 60);
        assert_eq!(rollup.distracting_total, 0);

        let empty = HistoryStore::open_in_memory().unwrap();
        assert_eq!(
            empty.query_day_rollup(day_start(noon())).await.unwrap(),
            DayRollup::default()
        );
    }

    #[tokio::test]
    async fn test_oversized_durations_saturate() {
        let store = HistoryStore::open_in_memory().unwrap();
        let midnight = day_start(noon());

        store
            .append_all(&[record("A", u64::MAX, Classification::Distracting, noon())])
            .await
            .unwrap();
        store
            .append_all(&[record("B", u64::MAX, Classification::Distracting, noon())])
            .await
            .unwrap();
        store
            .append_all(&[record("C", i64::MAX as u64, Classification::Distracting, noon())])
            .await
            .unwrap();

        let recent = store.list_recent(10).await.unwrap();
        assert_eq!(recent[0].record.duration, i64::MAX as u64);

        let rollup = store.query_day_rollup(midnight).await.unwrap();
        assert_eq!(rollup.distracting_total, u64::MAX);
        assert_eq!(rollup.productive_total, 0);

        store
            .append_all(&[record("Docs", 10, Classification::Productive, noon())])
            .await
            .unwrap();
        let rollup = store.query_day_rollup(midnight).await.unwrap();
        assert_eq!(rollup.productive_total, 10);
        assert_eq!(rollup.distracting_total, u64::MAX);
    }

    #[tokio::test]
    async fn test_wipe_all() {
        let store = HistoryStore::open_in_memory().unwrap();
        store
            .append_all(&[
                record("Docs", 60, Classification::Productive, noon()),
                record("Cats", 30, Classification::Distracting, noon()),
            ])
            .await
            .unwrap();

        assert_eq!(store.wipe_all().await.unwrap(), 2);
        assert!(store.list_recent(100).await.unwrap().is_empty());
        assert_eq!(
            store.query_day_rollup(day_start(noon())).await.unwrap(),
            DayRollup::default()
        );
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("history.db");

        let store = HistoryStore::open(&path).unwrap();
        store
            .append_all(&[record("Docs", 60, Classification::Productive, noon())])
            .await
            .unwrap();
        store.close().await.unwrap();

        let reopened = HistoryStore::open(&path).unwrap();
        let recent = reopened.list_recent(10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].record.title, "Docs");
    }

    #[tokio::test]
    async fn test_closed_store_rejects_operations() {
        let store = HistoryStore::open_in_memory().unwrap();
        store.close().await.unwrap();
        store.close().await.unwrap();

        assert!(store.list_recent(10).await.is_err());
        assert!(store.wipe_all().await.is_err());
        assert!(store
            .append_all(&[record("Docs", 60, Classification::Productive, noon())])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_empty_append_on_closed_store_is_noop() {
        let store = HistoryStore::open_in_memory().unwrap();
        store.close().await.unwrap();
        assert!(store.append_all(&[]).await.is_ok());
    }
}
