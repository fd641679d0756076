//! Inbox message handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use gymhub_core::error::AppError;
use gymhub_core::types::id::{MessageId, UserId};
use gymhub_entity::message::{
    Conversation, CreateIndividualMessage, CreateMassMessage, Message, UpdateMessage,
};

use crate::dto::request::validated;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ConversationPageParams, parse_id};
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::not_found("Message not found")
}

async fn load(state: &AppState, id: MessageId) -> Result<Message, AppError> {
    state.message_service.get(id).await?.ok_or_else(not_found)
}

/// POST /api/messages/individual
pub async fn send_individual(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateIndividualMessage>,
) -> ApiResult<Json<ApiResponse<Message>>> {
    let message = state.message_service.send_individual(&auth, req).await?;
    Ok(Json(ApiResponse::ok(message)))
}

/// POST /api/messages/mass
pub async fn send_mass(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateMassMessage>,
) -> ApiResult<Json<ApiResponse<Message>>> {
    state.rbac.require_mass_messaging(&auth.principal)?;
    let message = state.message_service.send_mass(&auth, req).await?;
    Ok(Json(ApiResponse::ok(message)))
}

/// GET /api/messages/conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Message>>>> {
    let latest = state
        .message_service
        .get_user_conversations(auth.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(latest)))
}

/// GET /api/messages/conversation/{user_id}
pub async fn get_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(other): Path<String>,
    Query(params): Query<ConversationPageParams>,
) -> ApiResult<Json<ApiResponse<Conversation>>> {
    let other: UserId = parse_id(&other)?;
    let params = validated(params)?;
    let conversation = state
        .message_service
        .get_conversation(auth.user_id, other, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(conversation)))
}

/// POST /api/messages/conversation/{sender_id}/mark-read
pub async fn mark_conversation_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(sender): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Message>>>> {
    let sender: UserId = parse_id(&sender)?;
    let updated = state
        .message_service
        .mark_conversation_read(auth.user_id, sender)
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// GET /api/messages/{id}
pub async fn get_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Message>>> {
    let message = load(&state, parse_id(&id)?).await?;
    state
        .rbac
        .require_message_participant(&auth.principal, &message)?;
    Ok(Json(ApiResponse::ok(message)))
}

/// PUT /api/messages/{id}
pub async fn update_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateMessage>,
) -> ApiResult<Json<ApiResponse<Message>>> {
    let id: MessageId = parse_id(&id)?;
    let message = load(&state, id).await?;
    state
        .rbac
        .require_message_recipient(&auth.principal, &message)?;

    let updated = state
        .message_service
        .update(id, req)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// DELETE /api/messages/{id}
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: MessageId = parse_id(&id)?;
    let message = load(&state, id).await?;
    state
        .rbac
        .require_message_participant(&auth.principal, &message)?;

    if state.message_service.delete(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found().into())
    }
}
