//! Property Routes
//!
//! Read-mostly property lookup directory endpoints.
//!
//! - GET /api/v1/properties - List one owner's properties
//! - POST /api/v1/properties - Register a property

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreatePropertyRequest, PropertyDto, PropertyListParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::store::Property;

/// GET /api/v1/properties
///
/// List the properties held by one owner; an unknown owner gets an empty
/// list, not an error.
pub async fn list_properties(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PropertyListParams>,
) -> ApiResult<Json<Vec<PropertyDto>>> {
    let owned = state.properties.list_owned(params.owner_id).await;
    Ok(Json(owned.iter().map(PropertyDto::from).collect()))
}

/// POST /api/v1/properties
pub async fn create_property(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePropertyRequest>,
) -> ApiResult<(StatusCode, Json<PropertyDto>)> {
    if req.owner_id.is_nil() {
        return Err(ApiError::Validation("ownerId must not be empty".to_string()));
    }
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_string()));
    }

    let property = state
        .properties
        .register(Property::new(req.owner_id, req.name, req.location))
        .await;

    Ok((StatusCode::CREATED, Json(PropertyDto::from(&property))))
}
