//! Meterdeck API Server
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Loaded from `config.toml` (or the platform config dir) with environment
//! overrides:
//! - `METERDECK_DATA_DIR`: Data directory for the record log
//! - `METERDECK_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `METERDECK_API_PORT`: Port to listen on (default: 8082)
//! - `METERDECK_ANALYTICS_URL`: Analytics service URL (default: http://localhost:8000)
//! - `RUST_LOG` / `METERDECK_LOG_LEVEL`: Log level (default: info)

use meterdeck::analytics::{AnalyticsClient, AnalyticsConfig};
use meterdeck::api::{serve, ApiConfig, AppState};
use meterdeck::config::Config;
use meterdeck::store::{PropertyDirectory, RecordStore, StoreConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("meterdeck={},tower_http=debug", config.logging.level).into());
    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Meterdeck API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data directory: {}", config.store.data_dir);

    // Open the record store, replaying the durability log
    std::fs::create_dir_all(&config.store.data_dir)?;
    let store = Arc::new(RecordStore::open(StoreConfig::new(&config.store.data_dir))?);
    tracing::info!(records = store.len().await, "Record store ready");

    let properties = Arc::new(PropertyDirectory::new());

    // Analytics service client
    let analytics_config = AnalyticsConfig {
        endpoint: config.analytics.endpoint.clone(),
        request_timeout_ms: config.analytics.request_timeout_ms,
    };
    let analytics = Arc::new(AnalyticsClient::new(analytics_config));
    match analytics.health_check().await {
        Ok(_) => tracing::info!("Analytics service connection verified"),
        Err(e) => tracing::warn!(
            "Analytics service not available: {} (trend/anomaly endpoints will fail upstream)",
            e
        ),
    }

    let api_config = ApiConfig {
        host: config.api.host.clone(),
        port: config.api.port,
        request_timeout_ms: config.api.request_timeout_secs * 1000,
        enable_export: config.api.enable_export,
    };

    let state = AppState::new(store, properties, analytics, api_config.clone());

    tracing::info!("Starting server on {}", api_config.addr());
    serve(state, &api_config).await?;

    tracing::info!("Meterdeck API server stopped");
    Ok(())
}
