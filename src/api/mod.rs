//! Meterdeck REST API
//!
//! HTTP API layer for Meterdeck, built with Axum.
//!
//! # Endpoints
//!
//! ## Consumption
//! - `POST /api/v1/consumption` - Append a reading
//! - `GET /api/v1/consumption` - Query raw or bucketed series
//!
//! ## Export
//! - `POST /api/v1/consumption/export` - Owner-scoped CSV report
//!
//! ## Analytics (external service)
//! - `POST /api/v1/consumption/analytics/trend` - Trend verdict
//! - `POST /api/v1/consumption/analytics/detect-anomalies` - Spike verdict
//!
//! ## Properties
//! - `GET /api/v1/properties` - List one owner's properties
//! - `POST /api/v1/properties` - Register a property
//!
//! ## Health
//! - `GET /health` - Liveness
//!
//! # Example
//!
//! ```rust,ignore
//! use meterdeck::analytics::{AnalyticsClient, AnalyticsConfig};
//! use meterdeck::api::{serve, ApiConfig, AppState};
//! use meterdeck::store::{PropertyDirectory, RecordStore, StoreConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(RecordStore::open(StoreConfig::new("./data"))?);
//!     let properties = Arc::new(PropertyDirectory::new());
//!     let analytics = Arc::new(AnalyticsClient::new(AnalyticsConfig::default()));
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(store, properties, analytics, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Consumption routes
        .route("/consumption", post(routes::consumption::create_record))
        .route("/consumption", get(routes::consumption::query_consumption))
        // Export route
        .route("/consumption/export", post(routes::export::export_csv))
        // Analytics routes (external service)
        .route(
            "/consumption/analytics/trend",
            post(routes::analytics::analyze_trend),
        )
        .route(
            "/consumption/analytics/detect-anomalies",
            post(routes::analytics::detect_anomalies),
        )
        // Property routes
        .route("/properties", get(routes::properties::list_properties))
        .route("/properties", post(routes::properties::create_property));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()) // Configure properly in production
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Meterdeck API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Meterdeck API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AnalyticsClient, AnalyticsConfig};
    use crate::store::{PropertyDirectory, RecordStore, StoreConfig};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    async fn create_test_app() -> (Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = Arc::new(RecordStore::open(StoreConfig::new(dir.path())).unwrap());
        let properties = Arc::new(PropertyDirectory::new());
        let analytics = Arc::new(AnalyticsClient::new(AnalyticsConfig::default()));
        let api_config = ApiConfig::default();

        let state = AppState::new(store, properties, analytics, api_config);
        let router = build_router(state);

        (router, dir)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["records"], 0);
    }

    #[tokio::test]
    async fn test_create_then_query_combined_day() {
        let (app, _dir) = create_test_app().await;
        let property = uuid::Uuid::new_v4();

        for (hour, kind, amount) in [(10, "electric", 5.0), (14, "electric", 3.0), (9, "gas", 2.0)]
        {
            let body = serde_json::json!({
                "propertyId": property,
                "date": format!("2024-01-01T{hour:02}:00:00Z"),
                "type": kind,
                "amount": amount,
            });
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/api/v1/consumption")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.to_string()))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/v1/consumption?propertyId={property}&resolution=day&type=combined"
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["meta"]["row_count"], 1);
        assert_eq!(json["rows"][0]["type"], "combined");
        assert_eq!(json["rows"][0]["amount"], 10.0);
    }

    #[tokio::test]
    async fn test_query_unknown_resolution_is_400() {
        let (app, _dir) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/v1/consumption?propertyId={}&resolution=fortnight",
                        uuid::Uuid::new_v4()
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_invalid_json_is_400() {
        let (app, _dir) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/consumption")
                    .header("Content-Type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_for_owner_without_properties_is_bare_header() {
        let (app, _dir) = create_test_app().await;

        let body = serde_json::json!({ "ownerId": uuid::Uuid::new_v4() });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/consumption/export")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["csv"], "Date,Property,Type,Amount\n");
    }

    #[tokio::test]
    async fn test_property_registration_and_listing() {
        let (app, _dir) = create_test_app().await;
        let owner = uuid::Uuid::new_v4();

        let body = serde_json::json!({
            "ownerId": owner,
            "name": "Home",
            "location": "12 Elm St",
        });
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/properties")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/properties?ownerId={owner}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["name"], "Home");
    }
}
