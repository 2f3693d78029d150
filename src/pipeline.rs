//! The classify-aggregate-persist pipeline.
//!
//! One synchronous flow per request: aggregate, classify with a single model
//! call, build detail records, persist them, then read the day rollup.

use crate::analysis::{aggregate_records, distinct_titles, total_duration};
use crate::classifier::{ClassifierError, ClassifierGateway};
use crate::models::{ActivityRecord, ClassifyResponse, HistoryEntry};
use crate::report::{build_records, compose, empty_report};
use crate::store::{day_start, HistoryStore};
use chrono::{DateTime, SubsecRound, Utc};
use thiserror::Error;
use tracing::{debug, error, info};

/// Failures of the classify operation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The model backend is not configured; nothing was processed.
    #[error("{0}")]
    Configuration(ClassifierError),

    /// Reading or writing history failed.
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

/// Classification pipeline bound to a store and a model gateway.
#[derive(Clone)]
pub struct Pipeline {
    gateway: ClassifierGateway,
    store: HistoryStore,
    history_limit: usize,
}

impl Pipeline {
    pub fn new(gateway: ClassifierGateway, store: HistoryStore, history_limit: usize) -> Self {
        Self {
            gateway,
            store,
            history_limit,
        }
    }

    /// Classify a submitted batch as of now.
    pub async fn classify(
        &self,
        records: Vec<ActivityRecord>,
    ) -> Result<ClassifyResponse, PipelineError> {
        self.classify_at(records, Utc::now()).await
    }

    /// Classify a submitted batch as of `now`.
    ///
    /// The same instant stamps every record and selects the day boundary.
    /// It is truncated to the millisecond precision the store keeps.
    pub async fn classify_at(
        &self,
        records: Vec<ActivityRecord>,
        now: DateTime<Utc>,
    ) -> Result<ClassifyResponse, PipelineError> {
        let now = now.trunc_subsecs(3);
        self.gateway
            .ensure_configured()
            .map_err(PipelineError::Configuration)?;

        let today_start = day_start(now);

        if records.is_empty() {
            debug!("Empty batch, skipping classification");
            let today = self.store.query_day_rollup(today_start).await?;
            return Ok(empty_report(today));
        }

        let entries = aggregate_records(&records);
        let titles = distinct_titles(&entries);
        info!(
            "Received {} activity records ({}s) covering {} distinct titles",
            records.len(),
            total_duration(&records),
            titles.len()
        );

        let classifications = self.gateway.classify(&titles).await;
        let batch = build_records(entries, &classifications, now);

        if let Err(e) = self.store.append_all(&batch.records).await {
            error!("Failed to persist {} detail records: {:#}", batch.records.len(), e);
            return Err(PipelineError::Storage(e));
        }

        let today = match self.store.query_day_rollup(today_start).await {
            Ok(today) => today,
            Err(e) => {
                error!("Failed to compute day rollup: {:#}", e);
                return Err(PipelineError::Storage(e));
            }
        };

        info!(
            "Batch: {}s productive, {}s distracting; today: {}s productive, {}s distracting",
            batch.productive_time,
            batch.distracting_time,
            today.productive_total,
            today.distracting_total
        );

        Ok(compose(batch, today))
    }

    /// Most recent detail records, newest first.
    pub async fn history(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        self.store.list_recent(self.history_limit).await
    }

    /// Delete all persisted history.
    pub async fn wipe(&self) -> anyhow::Result<usize> {
        self.store.wipe_all().await
    }
}
