//! CSV export formatter
//!
//! Renders an owner-scoped flat report of consumption records joined with
//! property display names. In "combined" mode the report aggregates by
//! calendar day and property; otherwise it emits one row per raw record.
//!
//! Output contract: the fixed header `Date,Property,Type,Amount`, one plain
//! comma-joined line per row, dates rendered as `YYYY-MM-DD`, rows ordered
//! descending by date. An empty result is the header line alone.
//!
//! Fields are deliberately not quoted or escaped, matching the report format
//! this system has always produced. A property name containing a comma will
//! shift columns; strict CSV quoting, if ever needed, belongs to the
//! presentation layer.

use crate::query::{QueryError, QueryResult, TypeSelector};
use crate::store::{DateSpan, PropertyDirectory, RecordStore, COMBINED_KIND};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Fixed report header
pub const CSV_HEADER: &str = "Date,Property,Type,Amount";

/// Parameters for one export
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Owner whose properties scope the report
    pub owner_id: Uuid,
    /// Optional inclusive date bounds
    pub span: DateSpan,
    /// Type filter mode; `Combined` switches to per-day aggregation
    pub kind: TypeSelector,
    /// Restrict to one property (`None` means all owned properties)
    pub property_id: Option<Uuid>,
}

impl ExportRequest {
    pub fn new(owner_id: Uuid) -> Self {
        Self {
            owner_id,
            span: DateSpan::unbounded(),
            kind: TypeSelector::Any,
            property_id: None,
        }
    }
}

/// Renders owner-scoped CSV consumption reports
pub struct CsvExporter {
    store: Arc<RecordStore>,
    properties: Arc<PropertyDirectory>,
}

impl CsvExporter {
    pub fn new(store: Arc<RecordStore>, properties: Arc<PropertyDirectory>) -> Self {
        Self { store, properties }
    }

    /// Produce the CSV report
    ///
    /// An owner with no properties, or a property filter that resolves to
    /// nothing the owner holds, yields the bare header, never an error.
    pub async fn export_csv(&self, req: &ExportRequest) -> QueryResult<String> {
        if !req.span.is_ordered() {
            return Err(QueryError::InvalidRange {
                from: req.span.from.unwrap(),
                to: req.span.to.unwrap(),
            });
        }

        // The join through owned properties is also the ownership check: a
        // property id the owner does not hold scopes to nothing.
        let owned = self.properties.list_owned(req.owner_id).await;
        let scoped: Vec<_> = match req.property_id {
            Some(pid) => owned.into_iter().filter(|p| p.id == pid).collect(),
            None => owned,
        };

        if scoped.is_empty() {
            return Ok(format!("{CSV_HEADER}\n"));
        }

        let ids: Vec<Uuid> = scoped.iter().map(|p| p.id).collect();
        let names: HashMap<Uuid, String> =
            scoped.into_iter().map(|p| (p.id, p.name)).collect();

        let records = self
            .store
            .scan_properties(&ids, &req.span, req.kind.scan_kind())
            .await?;

        // (sort timestamp, property name, type, amount)
        let mut rows: Vec<(DateTime<Utc>, String, String, Decimal)> =
            if req.kind == TypeSelector::Combined {
                let mut groups: HashMap<(NaiveDate, Uuid), Decimal> = HashMap::new();
                for record in records {
                    *groups
                        .entry((record.date.date_naive(), record.property_id))
                        .or_default() += record.amount;
                }
                groups
                    .into_iter()
                    .map(|((day, property_id), amount)| {
                        let name = names.get(&property_id).cloned().unwrap_or_default();
                        let day_start = day.and_hms_opt(0, 0, 0).unwrap().and_utc();
                        (day_start, name, COMBINED_KIND.to_string(), amount)
                    })
                    .collect()
            } else {
                records
                    .into_iter()
                    .map(|record| {
                        let name = names.get(&record.property_id).cloned().unwrap_or_default();
                        (record.date, name, record.kind, record.amount)
                    })
                    .collect()
            };

        // Descending by date; property name then type keep equal dates stable
        rows.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| a.1.cmp(&b.1))
                .then_with(|| a.2.cmp(&b.2))
        });

        let mut csv = String::with_capacity(CSV_HEADER.len() + 1 + rows.len() * 40);
        csv.push_str(CSV_HEADER);
        csv.push('\n');
        for (date, property, kind, amount) in rows {
            csv.push_str(&format!(
                "{},{},{},{}\n",
                date.format("%Y-%m-%d"),
                property,
                kind,
                amount
            ));
        }

        Ok(csv)
    }
}
