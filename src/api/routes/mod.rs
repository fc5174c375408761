//! Route Handlers
//!
//! HTTP route handlers organized by resource, plus the date parsing shared
//! between them.

pub mod analytics;
pub mod consumption;
pub mod export;
pub mod health;
pub mod properties;

use crate::api::error::{ApiError, ApiResult};
use crate::store::DateSpan;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a reading timestamp
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC), or a bare
/// `YYYY-MM-DD` (taken as that day's midnight UTC).
pub(crate) fn parse_timestamp(s: &str) -> ApiResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(ApiError::Validation(format!("Cannot parse date: {}", s)))
}

/// Parse a range bound as a calendar date
pub(crate) fn parse_date(s: &str) -> ApiResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    Err(ApiError::Validation(format!("Cannot parse date: {}", s)))
}

/// Parse optional from/to parameters into a date span
pub(crate) fn parse_span(from: Option<&str>, to: Option<&str>) -> ApiResult<DateSpan> {
    let from = from.map(parse_date).transpose()?;
    let to = to.map(parse_date).transpose()?;
    Ok(DateSpan::new(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T10:30:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01T10:30:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-01-01").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(parse_date("2024-01-31").unwrap(), expected);
        assert_eq!(parse_date("2024-01-31T12:00:00Z").unwrap(), expected);
        assert!(parse_date("31/01/2024").is_err());
    }

    #[test]
    fn test_parse_span_is_optional_on_both_sides() {
        let span = parse_span(None, Some("2024-01-31")).unwrap();
        assert_eq!(span.from, None);
        assert_eq!(span.to, NaiveDate::from_ymd_opt(2024, 1, 31));

        assert_eq!(parse_span(None, None).unwrap(), DateSpan::unbounded());
    }
}
