//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::analytics::AnalyticsClient;
use crate::export::CsvExporter;
use crate::query::QueryBuilder;
use crate::store::{PropertyDirectory, RecordStore};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store for appending and scanning consumption readings
    pub store: Arc<RecordStore>,
    /// Property -> owner lookup directory
    pub properties: Arc<PropertyDirectory>,
    /// Query builder for bucketed series
    pub query: Arc<QueryBuilder>,
    /// Owner-scoped CSV report renderer
    pub exporter: Arc<CsvExporter>,
    /// Client for the external analytics service
    pub analytics: Arc<AnalyticsClient>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Wire up the application state from its components
    pub fn new(
        store: Arc<RecordStore>,
        properties: Arc<PropertyDirectory>,
        analytics: Arc<AnalyticsClient>,
        config: ApiConfig,
    ) -> Self {
        let query = Arc::new(QueryBuilder::new(Arc::clone(&store)));
        let exporter = Arc::new(CsvExporter::new(
            Arc::clone(&store),
            Arc::clone(&properties),
        ));

        Self {
            store,
            properties,
            query,
            exporter,
            analytics,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Enable the CSV export endpoint
    pub enable_export: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8082,
            request_timeout_ms: 30_000,
            enable_export: true,
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
