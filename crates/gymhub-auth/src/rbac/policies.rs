//! Role-level permissions that do not depend on resource ownership.

use serde::{Deserialize, Serialize};

use gymhub_entity::user::UserRole;

/// A permission granted purely by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    /// Publish availability schedules (own schedules for trainers).
    AvailabilityCreate,
    /// Manage schedules owned by other trainers.
    AvailabilityManageAll,
    /// Read and modify bookings of any member or trainer.
    BookingManageAll,
    /// Send one message to many recipients.
    MassMessageSend,
    /// Create accounts with an arbitrary role.
    UserProvision,
}

/// Whether `role` holds `permission`.
pub fn role_has(role: UserRole, permission: SystemPermission) -> bool {
    use SystemPermission::*;

    match role {
        UserRole::Admin => true,
        UserRole::Trainer => matches!(permission, AvailabilityCreate),
        UserRole::User => false,
    }
}
