//! Export Routes
//!
//! - POST /api/v1/consumption/export - Owner-scoped CSV report

use axum::{extract::State, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::dto::{ExportRequestDto, ExportResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::parse_span;
use crate::api::state::AppState;
use crate::export::ExportRequest;
use crate::query::TypeSelector;

/// POST /api/v1/consumption/export
///
/// Render the owner's consumption report as CSV. The report covers every
/// property the owner holds unless `propertyId` narrows it; "all" is the
/// same as leaving it out.
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExportRequestDto>,
) -> ApiResult<Json<ExportResponse>> {
    if !state.config.enable_export {
        return Err(ApiError::Validation(
            "Export feature is disabled".to_string(),
        ));
    }

    let span = parse_span(req.from.as_deref(), req.to.as_deref())?;

    let property_id = match req.property_id.as_deref() {
        None | Some("all") => None,
        Some(s) => Some(
            Uuid::parse_str(s)
                .map_err(|_| ApiError::Validation(format!("Invalid property id: {}", s)))?,
        ),
    };

    let request = ExportRequest {
        owner_id: req.owner_id,
        span,
        kind: TypeSelector::from_param(req.kind.as_deref()),
        property_id,
    };

    let csv = state.exporter.export_csv(&request).await?;

    tracing::debug!(
        owner_id = %request.owner_id,
        bytes = csv.len(),
        "Rendered consumption export"
    );

    Ok(Json(ExportResponse { csv }))
}
