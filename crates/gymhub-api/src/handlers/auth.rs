//! Auth handlers: registration, sign-in, OTP, password reset, refresh, me.

use axum::extract::State;
use axum::{Form, Json};

use gymhub_auth::identity::TokenSet;
use gymhub_entity::user::UserRole;
use gymhub_service::auth::{
    AuthMessage, PasswordResetCompleted, PasswordResetStarted, RegistrationStarted, UserInfo,
};

use crate::dto::request::{
    AdminCreateUserRequest, LoginRequest, PasswordResetRequest, PasswordResetVerifyRequest,
    RefreshTokenRequest, RegisterRequest, SubmitOtpRequest, TokenForm, VerifyOtpRequest,
    validated,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<ApiResponse<RegistrationStarted>>> {
    let req = validated(req)?;
    let started = state
        .auth_service
        .register(req.into_profile(UserRole::User))
        .await?;
    Ok(Json(ApiResponse::ok(started)))
}

/// POST /api/auth/admin/create-user
pub async fn admin_create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AdminCreateUserRequest>,
) -> ApiResult<Json<ApiResponse<RegistrationStarted>>> {
    state.rbac.require_user_provisioning(&auth.principal)?;
    let req = validated(req)?;
    let started = state
        .auth_service
        .admin_create_user(&auth, req.profile.into_profile(req.role))
        .await?;
    Ok(Json(ApiResponse::ok(started)))
}

/// POST /api/auth/verify-otp
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> ApiResult<Json<ApiResponse<TokenSet>>> {
    let req = validated(req)?;
    let tokens = state
        .auth_service
        .verify_otp(&req.email, &req.password, &req.otp, &req.continuation_token)
        .await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<TokenSet>>> {
    let req = validated(req)?;
    let tokens = state.auth_service.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// POST /api/auth/token
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> ApiResult<Json<ApiResponse<TokenSet>>> {
    let form = validated(form)?;
    let tokens = state
        .auth_service
        .login(&form.username, &form.password)
        .await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// POST /api/auth/submit-otp
pub async fn submit_otp(
    State(state): State<AppState>,
    Json(req): Json<SubmitOtpRequest>,
) -> ApiResult<Json<ApiResponse<AuthMessage>>> {
    let req = validated(req)?;
    let ack = state
        .auth_service
        .submit_otp(&req.otp_code, &req.continuation_token)
        .await?;
    Ok(Json(ApiResponse::ok(ack)))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> Json<ApiResponse<AuthMessage>> {
    Json(ApiResponse::ok(state.auth_service.logout()))
}

/// POST /api/auth/password-reset
pub async fn password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> ApiResult<Json<ApiResponse<PasswordResetStarted>>> {
    let req = validated(req)?;
    let started = state.auth_service.initiate_password_reset(&req.email).await?;
    Ok(Json(ApiResponse::ok(started)))
}

/// POST /api/auth/password-reset/verify
pub async fn password_reset_verify(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetVerifyRequest>,
) -> ApiResult<Json<ApiResponse<PasswordResetCompleted>>> {
    let req = validated(req)?;
    let done = state
        .auth_service
        .verify_password_reset(
            &req.email,
            &req.otp,
            &req.new_password,
            &req.continuation_token,
        )
        .await?;
    Ok(Json(ApiResponse::ok(done)))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<ApiResponse<UserInfo>> {
    Json(ApiResponse::ok(state.auth_service.me(&auth.principal)))
}

/// POST /api/auth/refreshtoken
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<ApiResponse<TokenSet>>> {
    let req = validated(req)?;
    let tokens = state.auth_service.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(tokens)))
}
