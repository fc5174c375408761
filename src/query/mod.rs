//! Consumption query engine
//!
//! Translates a `(property, date range, type, resolution)` request into an
//! ordered sequence of raw records or aggregated buckets.
//!
//! # Execution Pipeline
//!
//! ```text
//! FilterSpec → validate → scan → plan → truncate + group + sum → sort → rows
//! ```
//!
//! The grouping policy is a closed decision table (`QueryPlan`) instead of
//! dynamically assembled query text; see `plan`.

pub mod builder;
pub mod error;
pub mod plan;
pub mod spec;

pub use builder::{QueryBuilder, SeriesRow};
pub use error::{QueryError, QueryResult};
pub use plan::QueryPlan;
pub use spec::{FilterSpec, Resolution, TypeSelector};
