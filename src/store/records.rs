//! Record store
//!
//! Durable append-only collection of consumption events. The full record set
//! lives in memory behind an async RwLock; every append is validated and
//! persisted to the record log before it is acknowledged, which gives
//! read-after-write visibility for the appending caller.
//!
//! The store exposes exactly two operations: `append` and range `scan`.
//! Aggregation and report formatting live in the query and export layers.

use crate::store::error::{StoreError, StoreResult};
use crate::store::log::RecordLog;
use crate::store::types::{
    is_aggregate_keyword, ConsumptionRecord, DateSpan, RecordDraft,
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Store configuration, injected at construction
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory for the record log
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    fn log_path(&self) -> PathBuf {
        self.data_dir.join("records.log")
    }
}

/// Durable store of consumption records
pub struct RecordStore {
    /// All records, in append order
    records: RwLock<Vec<ConsumptionRecord>>,
    /// Durability log; appends go here before the in-memory set
    log: Mutex<RecordLog>,
}

impl RecordStore {
    /// Open the store, replaying the record log into memory
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let mut log = RecordLog::open(config.log_path())?;
        let records = log.recover()?;

        tracing::info!(
            records = records.len(),
            data_dir = %config.data_dir.display(),
            "Record store opened"
        );

        Ok(Self {
            records: RwLock::new(records),
            log: Mutex::new(log),
        })
    }

    /// Append a new consumption record
    ///
    /// Validates the draft, assigns `id` and `created_at`, persists the
    /// record to the log, then makes it visible to scans. A single append is
    /// atomic: it is either fully durable and visible, or rejected.
    pub async fn append(&self, draft: RecordDraft) -> StoreResult<ConsumptionRecord> {
        validate_draft(&draft)?;

        let record = ConsumptionRecord {
            id: Uuid::new_v4(),
            property_id: draft.property_id,
            date: draft.date,
            kind: draft.kind,
            amount: draft.amount,
            created_at: Utc::now(),
        };

        // Durable before visible
        self.log.lock().await.append(&record)?;
        self.records.write().await.push(record.clone());

        tracing::debug!(
            record_id = %record.id,
            property_id = %record.property_id,
            kind = %record.kind,
            "Appended consumption record"
        );

        Ok(record)
    }

    /// Scan raw records for a single property
    ///
    /// Bounds are inclusive on both ends; `span.to` covers its whole day.
    /// A `kind` that is one of the aggregate keywords ("both", "combined")
    /// does not filter: those keywords change grouping policy upstream, not
    /// which records match.
    pub async fn scan(
        &self,
        property_id: Uuid,
        span: &DateSpan,
        kind: Option<&str>,
    ) -> StoreResult<Vec<ConsumptionRecord>> {
        self.scan_properties(std::slice::from_ref(&property_id), span, kind)
            .await
    }

    /// Scan raw records across a set of properties (owner-wide export path)
    pub async fn scan_properties(
        &self,
        property_ids: &[Uuid],
        span: &DateSpan,
        kind: Option<&str>,
    ) -> StoreResult<Vec<ConsumptionRecord>> {
        let kind = kind.filter(|k| !is_aggregate_keyword(k));

        let records = self.records.read().await;
        let matched = records
            .iter()
            .filter(|r| property_ids.contains(&r.property_id))
            .filter(|r| span.contains(r.date))
            .filter(|r| kind.map_or(true, |k| r.kind == k))
            .cloned()
            .collect();

        Ok(matched)
    }

    /// Total number of records held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Check whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// Validate caller-supplied fields, naming the offending field on failure
fn validate_draft(draft: &RecordDraft) -> StoreResult<()> {
    if draft.property_id.is_nil() {
        return Err(StoreError::validation("property_id", "must not be empty"));
    }
    if draft.kind.trim().is_empty() {
        return Err(StoreError::validation("type", "must not be empty"));
    }
    if is_aggregate_keyword(&draft.kind) {
        return Err(StoreError::validation(
            "type",
            "aggregate keywords cannot be stored as record types",
        ));
    }
    if draft.amount.is_sign_negative() {
        return Err(StoreError::validation("amount", "must be non-negative"));
    }
    Ok(())
}
