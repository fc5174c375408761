//! Query error types

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while building or running a consumption query
#[derive(Error, Debug)]
pub enum QueryError {
    /// `from` is after `to`
    #[error("Invalid date range: from {from} is after to {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    /// Store layer error
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
