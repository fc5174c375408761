//! # Meterdeck
//!
//! Consumption aggregation and export engine for a per-property utility
//! dashboard. Turns a stream of raw, irregularly-timed meter readings into
//! caller-selected time-bucketed series and flat CSV reports, and adapts
//! day-resolution series for an external trend/anomaly service.
//!
//! ## Modules
//!
//! - [`store`]: Durable append-only record store with CRC-checked log
//! - [`query`]: Bucketing and grouping over raw records
//! - [`export`]: Owner-scoped CSV report rendering
//! - [`analytics`]: Client for the external trend/anomaly service
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meterdeck::query::{FilterSpec, QueryBuilder, Resolution, TypeSelector};
//! use meterdeck::store::{RecordDraft, RecordStore, StoreConfig};
//! use chrono::Utc;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(RecordStore::open(StoreConfig::new("./data"))?);
//!     let property = Uuid::new_v4();
//!
//!     // Append a reading
//!     store
//!         .append(RecordDraft::new(property, Utc::now(), "electric", Decimal::new(525, 2)))
//!         .await?;
//!
//!     // Daily combined series
//!     let builder = QueryBuilder::new(Arc::clone(&store));
//!     let spec = FilterSpec::new(property)
//!         .resolution(Resolution::Day)
//!         .kind(TypeSelector::Combined);
//!     let rows = builder.query(&spec).await?;
//!
//!     println!("{} daily buckets", rows.len());
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod export;
pub mod query;
pub mod store;

// Re-export top-level types for convenience
pub use store::{
    ConsumptionRecord, DateSpan, Property, PropertyDirectory, RecordDraft, RecordStore,
    StoreConfig, StoreError, StoreResult,
};

pub use query::{
    FilterSpec, QueryBuilder, QueryError, QueryPlan, QueryResult, Resolution, SeriesRow,
    TypeSelector,
};

pub use export::{CsvExporter, ExportRequest, CSV_HEADER};

pub use analytics::{
    AnalyticsClient, AnalyticsConfig, AnalyticsError, SpikeVerdict, TrendVerdict,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
