//! Analytics service client
//!
//! HTTP client for the external trend/anomaly service. This is a translation
//! boundary only: the verdicts come back exactly as the service produced
//! them, and upstream failures keep their original status and detail where
//! available.

use crate::analytics::series::SeriesPayload;
use crate::query::SeriesRow;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Analytics client configuration, injected at construction
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Base URL of the analytics service (e.g. "http://localhost:8000")
    pub endpoint: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

/// Client for the external analytics service
pub struct AnalyticsClient {
    client: Client,
    config: AnalyticsConfig,
}

impl AnalyticsClient {
    /// Create a new client with the given configuration
    pub fn new(config: AnalyticsConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Check if the analytics service is reachable
    pub async fn health_check(&self) -> Result<(), AnalyticsError> {
        let url = self.config.endpoint.clone();

        let response = self.client.get(&url).send().await.map_err(classify)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AnalyticsError::Unavailable)
        }
    }

    /// Ask for a trend verdict over a day-resolution series
    pub async fn analyze_trend(&self, rows: &[SeriesRow]) -> Result<TrendVerdict, AnalyticsError> {
        self.post_series("/analytics/trend", rows).await
    }

    /// Ask for a spike verdict over a day-resolution series
    pub async fn detect_spike(&self, rows: &[SeriesRow]) -> Result<SpikeVerdict, AnalyticsError> {
        self.post_series("/analytics/spike", rows).await
    }

    async fn post_series<T: DeserializeOwned>(
        &self,
        path: &str,
        rows: &[SeriesRow],
    ) -> Result<T, AnalyticsError> {
        let url = format!("{}{}", self.config.endpoint, path);
        let payload = SeriesPayload::from_rows(rows);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(classify)?;

        if response.status().is_success() {
            response.json().await.map_err(AnalyticsError::Request)
        } else {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            Err(AnalyticsError::Api {
                status,
                detail: extract_detail(&text),
            })
        }
    }
}

/// Classify a transport error the way the service's callers care about it
fn classify(e: reqwest::Error) -> AnalyticsError {
    if e.is_timeout() {
        AnalyticsError::Timeout
    } else if e.is_connect() {
        AnalyticsError::Unavailable
    } else {
        AnalyticsError::Request(e)
    }
}

/// Pull the `detail` message out of an error body when the service sent one
fn extract_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

// ============================================
// Verdicts (opaque passthrough)
// ============================================

/// Trend verdict, forwarded unchanged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendVerdict {
    pub slope: f64,
    pub direction: String,
    pub r_squared: f64,
}

/// Spike verdict, forwarded unchanged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpikeVerdict {
    pub is_spike: bool,
    pub value: f64,
    pub mean: f64,
    pub threshold: f64,
    pub overall_mean: f64,
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when calling the analytics service
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Analytics service unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with an error; status and detail are its own
    #[error("Analytics error {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("Request timeout")]
    Timeout,
}
