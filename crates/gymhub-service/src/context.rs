//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gymhub_core::types::id::UserId;
use gymhub_entity::user::{Principal, UserRole};

/// Context for the current authenticated request.
///
/// Built by the API layer from a verified [`Principal`] and passed into
/// service methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's role as asserted by the token.
    pub role: UserRole,
    /// Email address from the token.
    pub email: String,
    /// Display name from the token.
    pub name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: UserRole, email: String, name: String) -> Self {
        Self {
            user_id,
            role,
            email,
            name,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&Principal> for RequestContext {
    fn from(principal: &Principal) -> Self {
        Self::new(
            principal.id,
            principal.role,
            principal.email.clone(),
            principal.name.clone(),
        )
    }
}
