//! Core data types for the Meterdeck record store
//!
//! This module defines the fundamental types used throughout the store layer:
//! - `ConsumptionRecord`: a single persisted meter reading
//! - `RecordDraft`: caller-supplied fields for an append
//! - `Property`: a row in the property lookup directory
//! - `DateSpan`: inclusive date bounds for range scans

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Consumption type keyword meaning "sum every type into one series".
pub const COMBINED_KIND: &str = "combined";

/// Consumption type keyword meaning "no type filter, keep types distinct".
pub const BOTH_KIND: &str = "both";

/// Check whether a type string is one of the special aggregate keywords
/// rather than a real consumption type.
pub fn is_aggregate_keyword(kind: &str) -> bool {
    kind == COMBINED_KIND || kind == BOTH_KIND
}

/// A single persisted consumption reading for one property.
///
/// `(property_id, date, kind)` is not unique: repeated readings for the same
/// moment are valid and are all retained, then summed on aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionRecord {
    /// Unique identifier, assigned at append time
    pub id: Uuid,
    /// Owning property (foreign lifecycle, not managed here)
    pub property_id: Uuid,
    /// Reading timestamp (date + time-of-day), caller supplied, UTC
    pub date: DateTime<Utc>,
    /// Consumption type ("electric", "gas", ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Non-negative consumed quantity
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// System-assigned creation timestamp, informational only
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for appending a new record.
///
/// The store assigns `id` and `created_at` on append.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub property_id: Uuid,
    pub date: DateTime<Utc>,
    pub kind: String,
    pub amount: Decimal,
}

impl RecordDraft {
    pub fn new(
        property_id: Uuid,
        date: DateTime<Utc>,
        kind: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            property_id,
            date,
            kind: kind.into(),
            amount,
        }
    }
}

/// A property in the lookup directory (read-only collaborator data).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl Property {
    pub fn new(owner_id: Uuid, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            location: location.into(),
            created_at: Utc::now(),
        }
    }
}

/// Inclusive date bounds for a range scan.
///
/// `from` starts at 00:00:00.000 and `to` is extended to 23:59:59.999 of its
/// day, so a record dated exactly at either boundary is included. All
/// comparisons are in UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateSpan {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateSpan {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Unbounded span matching every record.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// False when both bounds are present and `from` is after `to`.
    pub fn is_ordered(&self) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        }
    }

    /// Lower bound as a UTC instant (start of `from`'s day).
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.from
            .map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc())
    }

    /// Upper bound as a UTC instant (end of `to`'s day, 23:59:59.999).
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.to
            .map(|d| d.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc())
    }

    /// Check whether a timestamp falls within the (inclusive) bounds.
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        if let Some(start) = self.start() {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end() {
            if date > end {
                return false;
            }
        }
        true
    }
}
