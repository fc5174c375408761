//! Consumption Routes
//!
//! - POST /api/v1/consumption - Append a reading
//! - GET /api/v1/consumption - Query raw or bucketed series

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use std::time::Instant;

use crate::api::dto::{
    ConsumptionQueryParams, CreateConsumptionRequest, QueryMeta, QueryResponse, RecordResponse,
    SeriesRowDto,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::{parse_span, parse_timestamp};
use crate::api::state::AppState;
use crate::query::{FilterSpec, Resolution, TypeSelector};
use crate::store::RecordDraft;

/// POST /api/v1/consumption
///
/// Append a single consumption reading. Validation failures name the
/// offending field.
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateConsumptionRequest>,
) -> ApiResult<(StatusCode, Json<RecordResponse>)> {
    let date = parse_timestamp(&req.date)?;

    let record = state
        .store
        .append(RecordDraft::new(req.property_id, date, req.kind, req.amount))
        .await?;

    Ok((StatusCode::CREATED, Json(RecordResponse::from(&record))))
}

/// GET /api/v1/consumption
///
/// Query one property's readings, optionally bucketed by hour/day/month and
/// filtered or combined by type. Rows come back descending by date.
pub async fn query_consumption(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ConsumptionQueryParams>,
) -> ApiResult<Json<QueryResponse>> {
    let started = Instant::now();

    let span = parse_span(params.from.as_deref(), params.to.as_deref())?;
    let resolution = match params.resolution.as_deref() {
        None => Resolution::Raw,
        Some(s) => Resolution::parse(s)
            .ok_or_else(|| ApiError::Validation(format!("Unknown resolution: {}", s)))?,
    };

    let spec = FilterSpec::new(params.property_id)
        .span(span)
        .kind(TypeSelector::from_param(params.kind.as_deref()))
        .resolution(resolution);

    let rows = state.query.query(&spec).await?;
    let rows: Vec<SeriesRowDto> = rows.iter().map(SeriesRowDto::from).collect();

    Ok(Json(QueryResponse {
        meta: QueryMeta {
            execution_time_ms: started.elapsed().as_millis() as u64,
            row_count: rows.len(),
        },
        rows,
    }))
}
