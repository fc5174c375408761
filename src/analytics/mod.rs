//! Analytics adapter
//!
//! Maps day-resolution consumption series into the request shape of the
//! external trend/anomaly service and forwards its verdicts back unchanged.
//! The statistics live in the external service; nothing here interprets
//! them.

pub mod client;
pub mod series;

pub use client::{
    AnalyticsClient, AnalyticsConfig, AnalyticsError, SpikeVerdict, TrendVerdict,
};
pub use series::{SeriesPayload, SeriesPoint};
