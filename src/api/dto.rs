//! Data Transfer Objects
//!
//! Request and response types for the API endpoints, serialized to/from JSON.
//! The wire format keeps the original dashboard's conventions: camelCase
//! field names, the consumption type under `type`, and amounts as plain JSON
//! numbers. Internally amounts are `Decimal`; they only become floats here,
//! at the presentation edge.

use crate::query::SeriesRow;
use crate::store::{ConsumptionRecord, Property};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================
// CONSUMPTION DTOs
// ============================================

/// Append a single consumption reading
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsumptionRequest {
    pub property_id: Uuid,
    /// Reading timestamp; RFC 3339, `YYYY-MM-DDTHH:MM:SS`, or `YYYY-MM-DD`
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Decimal,
}

/// A stored consumption record
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: Uuid,
    pub property_id: Uuid,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub created_at: String,
}

impl From<&ConsumptionRecord> for RecordResponse {
    fn from(record: &ConsumptionRecord) -> Self {
        Self {
            id: record.id,
            property_id: record.property_id,
            date: record.date.to_rfc3339(),
            kind: record.kind.clone(),
            amount: record.amount.to_f64().unwrap_or(0.0),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Query string for GET /api/v1/consumption
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionQueryParams {
    pub property_id: Uuid,
    /// Inclusive lower date bound, `YYYY-MM-DD`
    pub from: Option<String>,
    /// Inclusive upper date bound, `YYYY-MM-DD` (covers its whole day)
    pub to: Option<String>,
    /// Consumption type, or the keywords "both" / "combined"
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// raw | hour | day | month; defaults to raw
    pub resolution: Option<String>,
}

/// One raw record or aggregated bucket in query output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRowDto {
    pub property_id: Uuid,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
}

impl From<&SeriesRow> for SeriesRowDto {
    fn from(row: &SeriesRow) -> Self {
        Self {
            property_id: row.property_id,
            date: row.date.to_rfc3339(),
            kind: row.kind.clone(),
            amount: row.amount.to_f64().unwrap_or(0.0),
        }
    }
}

/// Query response
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub rows: Vec<SeriesRowDto>,
    pub meta: QueryMeta,
}

/// Query metadata
#[derive(Debug, Serialize)]
pub struct QueryMeta {
    pub execution_time_ms: u64,
    pub row_count: usize,
}

// ============================================
// EXPORT DTOs
// ============================================

/// Body for POST /api/v1/consumption/export
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequestDto {
    pub owner_id: Uuid,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// A property id, or "all" (same as absent) for every owned property
    pub property_id: Option<String>,
}

/// The rendered CSV report
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub csv: String,
}

// ============================================
// ANALYTICS DTOs
// ============================================

/// Body for the trend and anomaly endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequestDto {
    pub property_id: Uuid,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// ============================================
// PROPERTY DTOs
// ============================================

/// Register a property in the lookup directory
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    pub owner_id: Uuid,
    pub name: String,
    pub location: String,
}

/// Query string for GET /api/v1/properties
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListParams {
    pub owner_id: Uuid,
}

/// A property in the lookup directory
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDto {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub location: String,
    pub created_at: String,
}

impl From<&Property> for PropertyDto {
    fn from(property: &Property) -> Self {
        Self {
            id: property.id,
            owner_id: property.owner_id,
            name: property.name.clone(),
            location: property.location.clone(),
            created_at: property.created_at.to_rfc3339(),
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub records: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_request_accepts_numeric_amount() {
        let req: CreateConsumptionRequest = serde_json::from_str(
            r#"{"propertyId": "a2b1f0c4-9a1e-4a2b-8c3d-5e6f7a8b9c0d",
                "date": "2024-01-01T10:00:00Z", "type": "electric", "amount": 5.25}"#,
        )
        .unwrap();
        assert_eq!(req.kind, "electric");
        assert_eq!(req.amount, dec!(5.25));
    }

    #[test]
    fn test_series_row_dto_wire_names() {
        use chrono::{TimeZone, Utc};
        let row = SeriesRow {
            property_id: Uuid::nil(),
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            kind: "combined".to_string(),
            amount: dec!(10),
        };
        let json = serde_json::to_value(SeriesRowDto::from(&row)).unwrap();
        assert_eq!(json["type"], "combined");
        assert_eq!(json["amount"], 10.0);
        assert!(json["propertyId"].is_string());
    }
}
