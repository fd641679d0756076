//! Booking handlers.

use axum::Json;
use axum::extract::{Path, State};

use gymhub_auth::rbac::BookingAction;
use gymhub_core::error::AppError;
use gymhub_core::types::id::{BookingId, UserId};
use gymhub_entity::booking::{Booking, CreateBooking, UpdateBooking};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::not_found("Booking not found")
}

async fn load(state: &AppState, id: BookingId) -> Result<Booking, AppError> {
    state.booking_service.get(id).await?.ok_or_else(not_found)
}

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBooking>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    state
        .rbac
        .require_booking_creation(&auth.principal, req.user_id)?;
    let booking = state.booking_service.create(&auth, req).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = load(&state, parse_id(&id)?).await?;
    state
        .rbac
        .require_booking_access(&auth.principal, &booking, BookingAction::View)?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// GET /api/bookings/users/{user_id}/future
pub async fn list_future(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Booking>>>> {
    let user_id: UserId = parse_id(&user_id)?;
    state.rbac.require_booking_listing(&auth.principal, user_id)?;
    let bookings = state.booking_service.list_future_for_user(user_id).await?;
    Ok(Json(ApiResponse::ok(bookings)))
}

/// GET /api/bookings/users/{user_id}/past
pub async fn list_past(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Booking>>>> {
    let user_id: UserId = parse_id(&user_id)?;
    state.rbac.require_booking_listing(&auth.principal, user_id)?;
    let bookings = state.booking_service.list_past_for_user(user_id).await?;
    Ok(Json(ApiResponse::ok(bookings)))
}

/// PUT /api/bookings/{id}
pub async fn update_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateBooking>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let id: BookingId = parse_id(&id)?;
    let booking = load(&state, id).await?;
    state
        .rbac
        .require_booking_access(&auth.principal, &booking, BookingAction::Update)?;

    let updated = state
        .booking_service
        .update(&auth, id, req)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let id: BookingId = parse_id(&id)?;
    let booking = load(&state, id).await?;
    state
        .rbac
        .require_booking_access(&auth.principal, &booking, BookingAction::Cancel)?;

    let cancelled = state
        .booking_service
        .cancel(&auth, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::ok(cancelled)))
}
