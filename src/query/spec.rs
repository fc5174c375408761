//! Query specification
//!
//! The caller-facing description of a consumption query: which property,
//! which date bounds, which type mode, and the bucket resolution. Parsing of
//! the external keywords ("both", "combined", resolution names) lives here so
//! the executor only ever sees the typed forms.

use crate::store::{DateSpan, BOTH_KIND, COMBINED_KIND};
use chrono::{DateTime, Datelike, Timelike, Utc};
use uuid::Uuid;

/// Bucket width for aggregation
///
/// `Raw` returns records untouched; the other resolutions truncate each
/// record's timestamp down to the bucket start before grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resolution {
    #[default]
    Raw,
    Hour,
    Day,
    Month,
}

impl Resolution {
    /// Parse an external resolution name; `None` for anything unknown
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Some(Self::Raw),
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    /// Truncate a timestamp down to the start of its bucket
    pub fn truncate(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let truncated = match self {
            Resolution::Raw => return ts,
            Resolution::Hour => ts
                .with_minute(0)
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0)),
            Resolution::Day => ts
                .with_hour(0)
                .and_then(|t| t.with_minute(0))
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0)),
            Resolution::Month => ts
                .with_day(1)
                .and_then(|t| t.with_hour(0))
                .and_then(|t| t.with_minute(0))
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0)),
        };
        // Zeroing components of a valid UTC timestamp cannot fail
        truncated.unwrap_or(ts)
    }
}

/// Type filter mode for a query
///
/// `Any` matches every type and keeps them distinct when aggregating;
/// `Combined` matches every type but sums them into one series; `Only` keeps
/// a single concrete type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeSelector {
    #[default]
    Any,
    Combined,
    Only(String),
}

impl TypeSelector {
    /// Interpret an external type parameter
    ///
    /// Absent and "both" both mean no filter; "combined" switches to the
    /// single-series aggregate; anything else is a concrete type.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None => Self::Any,
            Some(k) if k == BOTH_KIND => Self::Any,
            Some(k) if k == COMBINED_KIND => Self::Combined,
            Some(k) => Self::Only(k.to_string()),
        }
    }

    /// The concrete type to filter the scan by, if any
    pub fn scan_kind(&self) -> Option<&str> {
        match self {
            Self::Only(kind) => Some(kind),
            _ => None,
        }
    }
}

/// A complete consumption query
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Property whose records are queried
    pub property_id: Uuid,
    /// Inclusive date bounds
    pub span: DateSpan,
    /// Type filter mode
    pub kind: TypeSelector,
    /// Bucket resolution
    pub resolution: Resolution,
}

impl FilterSpec {
    /// Query everything for one property: unbounded, untyped, raw
    pub fn new(property_id: Uuid) -> Self {
        Self {
            property_id,
            span: DateSpan::unbounded(),
            kind: TypeSelector::default(),
            resolution: Resolution::default(),
        }
    }

    pub fn span(mut self, span: DateSpan) -> Self {
        self.span = span;
        self
    }

    pub fn kind(mut self, kind: TypeSelector) -> Self {
        self.kind = kind;
        self
    }

    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }
}
