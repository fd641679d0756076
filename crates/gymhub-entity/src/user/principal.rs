//! The authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gymhub_core::types::id::UserId;

use super::role::UserRole;

/// An authenticated principal extracted from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Identity provider object id.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Application role.
    pub role: UserRole,
    /// The bearer token the principal was built from.
    #[serde(skip_serializing)]
    pub raw_token: String,
    /// Token expiry.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Principal {
    /// Whether this principal has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
