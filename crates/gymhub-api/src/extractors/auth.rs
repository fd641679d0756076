//! `AuthUser` extractor: pulls the bearer token, verifies it, and injects context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use gymhub_core::error::AppError;
use gymhub_entity::user::Principal;
use gymhub_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Context passed into service calls.
    pub ctx: RequestContext,
    /// The verified principal, used for access checks.
    pub principal: Principal,
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::authentication("Missing or invalid Authorization header"))?;

        let principal = state.verifier.verify(bearer.token()).await?;
        let ctx = RequestContext::from(&principal);

        Ok(AuthUser { ctx, principal })
    }
}
