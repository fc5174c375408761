//! Query builder
//!
//! Turns a `FilterSpec` into an ordered series of rows, executing against the
//! record store:
//! 1. Scan matching raw records (inclusive date bounds, concrete type filter)
//! 2. Select the query plan from the `(resolution, type mode)` decision table
//! 3. Truncate dates to the bucket boundary and sum amounts per group
//! 4. Order descending by date, tying on type ascending
//!
//! Aggregation is a pure function of the scanned record set, so concurrent
//! queries need no coordination.

use crate::query::error::{QueryError, QueryResult};
use crate::query::plan::QueryPlan;
use crate::query::spec::FilterSpec;
use crate::store::{ConsumptionRecord, RecordStore, COMBINED_KIND};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// One row of query output: a raw record or an aggregated bucket
///
/// For raw queries `date` is the record's own timestamp and `kind` its stored
/// type. For aggregated queries `date` is the bucket start and `kind` is
/// either a stored type or the "combined" literal.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub property_id: Uuid,
    pub date: DateTime<Utc>,
    pub kind: String,
    pub amount: Decimal,
}

/// Executes consumption queries against the record store
pub struct QueryBuilder {
    store: Arc<RecordStore>,
}

impl QueryBuilder {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Run a query, returning rows ordered descending by date
    ///
    /// An empty matching set yields an empty vec, never an error.
    pub async fn query(&self, spec: &FilterSpec) -> QueryResult<Vec<SeriesRow>> {
        if !spec.span.is_ordered() {
            // is_ordered is only false when both bounds are present
            return Err(QueryError::InvalidRange {
                from: spec.span.from.unwrap(),
                to: spec.span.to.unwrap(),
            });
        }

        let records = self
            .store
            .scan(spec.property_id, &spec.span, spec.kind.scan_kind())
            .await?;

        let mut rows: Vec<SeriesRow> = match QueryPlan::select(spec.resolution, &spec.kind) {
            QueryPlan::RawScan => records.into_iter().map(raw_row).collect(),
            QueryPlan::GroupByBucket => {
                let mut groups: HashMap<(Uuid, DateTime<Utc>), Decimal> = HashMap::new();
                for record in records {
                    let bucket = spec.resolution.truncate(record.date);
                    *groups.entry((record.property_id, bucket)).or_default() += record.amount;
                }
                groups
                    .into_iter()
                    .map(|((property_id, date), amount)| SeriesRow {
                        property_id,
                        date,
                        kind: COMBINED_KIND.to_string(),
                        amount,
                    })
                    .collect()
            }
            QueryPlan::GroupByBucketAndType => {
                let mut groups: HashMap<(Uuid, DateTime<Utc>, String), Decimal> = HashMap::new();
                for record in records {
                    let bucket = spec.resolution.truncate(record.date);
                    *groups
                        .entry((record.property_id, bucket, record.kind))
                        .or_default() += record.amount;
                }
                groups
                    .into_iter()
                    .map(|((property_id, date, kind), amount)| SeriesRow {
                        property_id,
                        date,
                        kind,
                        amount,
                    })
                    .collect()
            }
        };

        // Descending by date; type ascending keeps equal-date ordering stable
        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.kind.cmp(&b.kind)));

        Ok(rows)
    }
}

fn raw_row(record: ConsumptionRecord) -> SeriesRow {
    SeriesRow {
        property_id: record.property_id,
        date: record.date,
        kind: record.kind,
        amount: record.amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::spec::{Resolution, TypeSelector};
    use crate::store::{DateSpan, RecordDraft, StoreConfig};
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    async fn seed_store() -> (QueryBuilder, Uuid, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = Arc::new(RecordStore::open(StoreConfig::new(dir.path())).unwrap());
        let property = Uuid::new_v4();

        // The worked example: two electric readings and one gas reading on
        // the same day
        for (hour, kind, amount) in [
            (10, "electric", dec!(5)),
            (14, "electric", dec!(3)),
            (9, "gas", dec!(2)),
        ] {
            store
                .append(RecordDraft::new(
                    property,
                    Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
                    kind,
                    amount,
                ))
                .await
                .unwrap();
        }

        (QueryBuilder::new(store), property, dir)
    }

    #[tokio::test]
    async fn test_combined_day_sums_across_types() {
        let (builder, property, _dir) = seed_store().await;

        let spec = FilterSpec::new(property)
            .resolution(Resolution::Day)
            .kind(TypeSelector::Combined);
        let rows = builder.query(&spec).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(rows[0].kind, "combined");
        assert_eq!(rows[0].amount, dec!(10));
    }

    #[tokio::test]
    async fn test_both_day_keeps_types_distinct() {
        let (builder, property, _dir) = seed_store().await;

        let spec = FilterSpec::new(property)
            .resolution(Resolution::Day)
            .kind(TypeSelector::from_param(Some("both")));
        let rows = builder.query(&spec).await.unwrap();

        assert_eq!(rows.len(), 2);
        // Same bucket date, tie broken by type ascending
        assert_eq!(rows[0].kind, "electric");
        assert_eq!(rows[0].amount, dec!(8));
        assert_eq!(rows[1].kind, "gas");
        assert_eq!(rows[1].amount, dec!(2));
    }

    #[tokio::test]
    async fn test_raw_returns_unaggregated_records() {
        let (builder, property, _dir) = seed_store().await;

        // Raw ignores aggregation even in combined mode
        for kind in [TypeSelector::Any, TypeSelector::Combined] {
            let spec = FilterSpec::new(property).kind(kind);
            let rows = builder.query(&spec).await.unwrap();

            assert_eq!(rows.len(), 3);
            // Descending by the records' own timestamps
            assert_eq!(rows[0].amount, dec!(3)); // 14:00 electric
            assert_eq!(rows[1].amount, dec!(5)); // 10:00 electric
            assert_eq!(rows[2].amount, dec!(2)); // 09:00 gas
        }
    }

    #[tokio::test]
    async fn test_specific_type_filters_and_sums() {
        let (builder, property, _dir) = seed_store().await;

        let spec = FilterSpec::new(property)
            .resolution(Resolution::Day)
            .kind(TypeSelector::Only("electric".to_string()));
        let rows = builder.query(&spec).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, "electric");
        assert_eq!(rows[0].amount, dec!(8));
    }

    #[tokio::test]
    async fn test_conservation_of_totals_across_resolutions() {
        let (builder, property, _dir) = seed_store().await;
        let raw_total = dec!(10);

        for resolution in [
            Resolution::Raw,
            Resolution::Hour,
            Resolution::Day,
            Resolution::Month,
        ] {
            let spec = FilterSpec::new(property).resolution(resolution);
            let rows = builder.query(&spec).await.unwrap();
            let total: Decimal = rows.iter().map(|r| r.amount).sum();
            assert_eq!(total, raw_total, "total must survive {resolution:?}");
        }
    }

    #[tokio::test]
    async fn test_hour_resolution_buckets() {
        let (builder, property, _dir) = seed_store().await;

        let spec = FilterSpec::new(property).resolution(Resolution::Hour);
        let rows = builder.query(&spec).await.unwrap();

        // 09:00 gas, 10:00 electric, 14:00 electric: three distinct buckets
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, Utc.with_ymd_and_hms(2024, 1, 1, 14, 0, 0).unwrap());
        assert_eq!(rows[2].date, Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_out_of_range_is_empty_not_error() {
        let (builder, property, _dir) = seed_store().await;

        let spec = FilterSpec::new(property)
            .span(DateSpan::new(NaiveDate::from_ymd_opt(2024, 1, 2), None))
            .resolution(Resolution::Day);
        let rows = builder.query(&spec).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_inverted_range_is_validation_error() {
        let (builder, property, _dir) = seed_store().await;

        let spec = FilterSpec::new(property).span(DateSpan::new(
            NaiveDate::from_ymd_opt(2024, 2, 1),
            NaiveDate::from_ymd_opt(2024, 1, 1),
        ));
        let err = builder.query(&spec).await.unwrap_err();
        assert!(matches!(err, QueryError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_moment_readings_are_summed() {
        let dir = tempdir().unwrap();
        let store = Arc::new(RecordStore::open(StoreConfig::new(dir.path())).unwrap());
        let property = Uuid::new_v4();
        let moment = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        for amount in [dec!(1.5), dec!(2.5)] {
            store
                .append(RecordDraft::new(property, moment, "electric", amount))
                .await
                .unwrap();
        }

        let builder = QueryBuilder::new(store);
        let spec = FilterSpec::new(property).resolution(Resolution::Hour);
        let rows = builder.query(&spec).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, dec!(4.0));
    }

    #[tokio::test]
    async fn test_month_resolution_merges_days() {
        let dir = tempdir().unwrap();
        let store = Arc::new(RecordStore::open(StoreConfig::new(dir.path())).unwrap());
        let property = Uuid::new_v4();

        for day in [1, 15, 31] {
            store
                .append(RecordDraft::new(
                    property,
                    Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
                    "gas",
                    dec!(1),
                ))
                .await
                .unwrap();
        }
        store
            .append(RecordDraft::new(
                property,
                Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
                "gas",
                dec!(7),
            ))
            .await
            .unwrap();

        let builder = QueryBuilder::new(store);
        let spec = FilterSpec::new(property).resolution(Resolution::Month);
        let rows = builder.query(&spec).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(rows[0].amount, dec!(7));
        assert_eq!(rows[1].date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(rows[1].amount, dec!(3));
    }

    #[tokio::test]
    async fn test_exact_decimal_sums() {
        let dir = tempdir().unwrap();
        let store = Arc::new(RecordStore::open(StoreConfig::new(dir.path())).unwrap());
        let property = Uuid::new_v4();

        // 0.1 + 0.2 must be exactly 0.3 in the aggregate
        for (hour, amount) in [(1, dec!(0.1)), (2, dec!(0.2))] {
            store
                .append(RecordDraft::new(
                    property,
                    Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
                    "electric",
                    amount,
                ))
                .await
                .unwrap();
        }

        let builder = QueryBuilder::new(store);
        let spec = FilterSpec::new(property).resolution(Resolution::Day);
        let rows = builder.query(&spec).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, dec!(0.3));
    }
}
