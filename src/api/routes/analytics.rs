//! Analytics Routes
//!
//! Forwarding endpoints to the external trend/anomaly service. Each builds a
//! day-resolution series for one property and passes the verdict through
//! unchanged.
//!
//! - POST /api/v1/consumption/analytics/trend
//! - POST /api/v1/consumption/analytics/detect-anomalies

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::analytics::{SpikeVerdict, TrendVerdict};
use crate::api::dto::AnalyticsRequestDto;
use crate::api::error::ApiResult;
use crate::api::routes::parse_span;
use crate::api::state::AppState;
use crate::query::{FilterSpec, Resolution, SeriesRow, TypeSelector};

/// POST /api/v1/consumption/analytics/trend
pub async fn analyze_trend(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyticsRequestDto>,
) -> ApiResult<Json<TrendVerdict>> {
    let rows = day_series(&state, &req).await?;
    let verdict = state.analytics.analyze_trend(&rows).await?;
    Ok(Json(verdict))
}

/// POST /api/v1/consumption/analytics/detect-anomalies
pub async fn detect_anomalies(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyticsRequestDto>,
) -> ApiResult<Json<SpikeVerdict>> {
    let rows = day_series(&state, &req).await?;
    let verdict = state.analytics.detect_spike(&rows).await?;
    Ok(Json(verdict))
}

/// Build the day-resolution series the analytics service consumes
///
/// The service fits over a single series, so an absent or "both" type
/// collapses to the combined sum; a concrete type keeps only that type.
/// Points are sent oldest first.
async fn day_series(
    state: &AppState,
    req: &AnalyticsRequestDto,
) -> ApiResult<Vec<SeriesRow>> {
    let span = parse_span(req.from.as_deref(), req.to.as_deref())?;

    let kind = match TypeSelector::from_param(req.kind.as_deref()) {
        TypeSelector::Any => TypeSelector::Combined,
        other => other,
    };

    let spec = FilterSpec::new(req.property_id)
        .span(span)
        .kind(kind)
        .resolution(Resolution::Day);

    let mut rows = state.query.query(&spec).await?;
    rows.reverse();
    Ok(rows)
}
