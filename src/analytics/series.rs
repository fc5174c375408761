//! Series payload mapping
//!
//! The external analytics service accepts `{data: [{date, value}]}` with
//! `date` as `YYYY-MM-DD` and `value` as a plain number. This module maps the
//! query builder's day-resolution output into that shape, preserving order.

use crate::query::SeriesRow;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// One point on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    /// Bucket sum as the float the service expects
    pub value: f64,
}

/// Request body for both trend and spike analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesPayload {
    pub data: Vec<SeriesPoint>,
}

impl SeriesPayload {
    /// Map query rows to wire points, preserving their order
    pub fn from_rows(rows: &[SeriesRow]) -> Self {
        let data = rows
            .iter()
            .map(|row| SeriesPoint {
                date: row.date.format("%Y-%m-%d").to_string(),
                value: row.amount.to_f64().unwrap_or(0.0),
            })
            .collect();
        Self { data }
    }
}
