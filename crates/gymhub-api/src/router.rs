//! Route definitions for the GymHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.request_body_limit_bytes;

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(booking_routes())
        .merge(availability_routes())
        .merge(message_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Account flows delegated to the identity provider
fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/admin/create-user", post(auth::admin_create_user))
        .route("/auth/verify-otp", post(auth::verify_otp))
        .route("/auth/login", post(auth::login))
        .route("/auth/token", post(auth::token))
        .route("/auth/submit-otp", post(auth::submit_otp))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/password-reset", post(auth::password_reset))
        .route(
            "/auth/password-reset/verify",
            post(auth::password_reset_verify),
        )
        .route("/auth/me", get(auth::me))
        .route("/auth/refreshtoken", post(auth::refresh))
}

fn booking_routes() -> Router<AppState> {
    use handlers::booking;

    Router::new()
        .route("/bookings", post(booking::create_booking))
        .route(
            "/bookings/{id}",
            get(booking::get_booking).put(booking::update_booking),
        )
        .route("/bookings/{id}/cancel", post(booking::cancel_booking))
        .route("/bookings/users/{user_id}/future", get(booking::list_future))
        .route("/bookings/users/{user_id}/past", get(booking::list_past))
}

fn availability_routes() -> Router<AppState> {
    use handlers::availability;

    Router::new()
        .route("/availabilities", post(availability::create_availability))
        .route(
            "/availabilities/{id}",
            get(availability::get_availability)
                .put(availability::update_availability)
                .delete(availability::delete_availability),
        )
        .route(
            "/availabilities/trainer/{trainer_id}",
            get(availability::list_by_trainer),
        )
        .route(
            "/availabilities/center/{center_id}",
            get(availability::list_by_center),
        )
}

/// Inbox: sends, conversations and read state
fn message_routes() -> Router<AppState> {
    use handlers::message;

    Router::new()
        .route("/messages/individual", post(message::send_individual))
        .route("/messages/mass", post(message::send_mass))
        .route("/messages/conversations", get(message::list_conversations))
        .route(
            "/messages/conversation/{user_id}",
            get(message::get_conversation),
        )
        .route(
            "/messages/conversation/{user_id}/mark-read",
            post(message::mark_conversation_read),
        )
        .route(
            "/messages/{id}",
            get(message::get_message)
                .put(message::update_message)
                .delete(message::delete_message),
        )
}
