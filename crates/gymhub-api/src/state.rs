//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use gymhub_auth::identity::IdentityProvider;
use gymhub_auth::jwt::TokenVerifier;
use gymhub_auth::rbac::RbacEnforcer;
use gymhub_core::config::AppConfig;
use gymhub_core::traits::{Clock, DocumentStore};
use gymhub_database::repositories::{AvailabilityRepository, BookingRepository, MessageRepository};
use gymhub_service::observer::ServiceObserver;
use gymhub_service::{AuthService, AvailabilityService, BookingService, MessageService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Document store backing every repository
    pub store: Arc<dyn DocumentStore>,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token verifier (JWKS or local HMAC)
    pub verifier: Arc<dyn TokenVerifier>,
    /// Role-based access control enforcer
    pub rbac: Arc<RbacEnforcer>,

    // ── Services ─────────────────────────────────────────────
    pub booking_service: Arc<BookingService>,
    pub availability_service: Arc<AvailabilityService>,
    pub message_service: Arc<MessageService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Wires repositories and services on top of the given infrastructure.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        verifier: Arc<dyn TokenVerifier>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
        observer: Arc<dyn ServiceObserver>,
    ) -> Self {
        let booking_repo = Arc::new(BookingRepository::new(Arc::clone(&store)));
        let availability_repo = Arc::new(AvailabilityRepository::new(Arc::clone(&store)));
        let message_repo = Arc::new(MessageRepository::new(Arc::clone(&store)));

        Self {
            config: Arc::new(config),
            booking_service: Arc::new(BookingService::new(
                booking_repo,
                Arc::clone(&clock),
                Arc::clone(&observer),
            )),
            availability_service: Arc::new(AvailabilityService::new(
                availability_repo,
                Arc::clone(&clock),
                Arc::clone(&observer),
            )),
            message_service: Arc::new(MessageService::new(
                message_repo,
                Arc::clone(&clock),
                Arc::clone(&observer),
            )),
            auth_service: Arc::new(AuthService::new(identity, observer)),
            store,
            verifier,
            rbac: Arc::new(RbacEnforcer::new()),
        }
    }
}
