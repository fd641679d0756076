//! Trainer availability handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use gymhub_core::error::AppError;
use gymhub_core::types::id::{AvailabilityId, CenterId, UserId};
use gymhub_entity::availability::{Availability, CreateAvailability, UpdateAvailability};

use crate::dto::request::CenterRangeQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::not_found("Availability not found")
}

async fn load(state: &AppState, id: AvailabilityId) -> Result<Availability, AppError> {
    state.availability_service.get(id).await?.ok_or_else(not_found)
}

/// POST /api/availabilities
pub async fn create_availability(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateAvailability>,
) -> ApiResult<Json<ApiResponse<Availability>>> {
    state
        .rbac
        .require_availability_creation(&auth.principal, req.trainer_id)?;
    let availability = state.availability_service.create(&auth, req).await?;
    Ok(Json(ApiResponse::ok(availability)))
}

/// GET /api/availabilities/{id}
pub async fn get_availability(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Availability>>> {
    let availability = load(&state, parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(availability)))
}

/// GET /api/availabilities/trainer/{trainer_id}
pub async fn list_by_trainer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(trainer_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Availability>>>> {
    let trainer_id: UserId = parse_id(&trainer_id)?;
    let found = state.availability_service.list_by_trainer(trainer_id).await?;
    Ok(Json(ApiResponse::ok(found)))
}

/// GET /api/availabilities/center/{center_id}?start_date&end_date
pub async fn list_by_center(
    State(state): State<AppState>,
    Path(center_id): Path<String>,
    Query(range): Query<CenterRangeQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Availability>>>> {
    let center_id: CenterId = parse_id(&center_id)?;
    let found = state
        .availability_service
        .list_by_center_in_range(center_id, range.start_date, range.end_date)
        .await?;
    Ok(Json(ApiResponse::ok(found)))
}

/// PUT /api/availabilities/{id}
pub async fn update_availability(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateAvailability>,
) -> ApiResult<Json<ApiResponse<Availability>>> {
    let id: AvailabilityId = parse_id(&id)?;
    let existing = load(&state, id).await?;
    state
        .rbac
        .require_availability_ownership(&auth.principal, &existing)?;

    let updated = state
        .availability_service
        .update(&auth, id, req)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// DELETE /api/availabilities/{id}
pub async fn delete_availability(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: AvailabilityId = parse_id(&id)?;
    let existing = load(&state, id).await?;
    state
        .rbac
        .require_availability_ownership(&auth.principal, &existing)?;

    if state.availability_service.delete(&auth, id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found().into())
    }
}
