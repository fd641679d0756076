//! Access checks for bookings, availabilities, messages and accounts.

use gymhub_core::error::AppError;
use gymhub_core::types::id::UserId;
use gymhub_entity::availability::Availability;
use gymhub_entity::booking::Booking;
use gymhub_entity::message::Message;
use gymhub_entity::user::{Principal, UserRole};

use super::policies::{SystemPermission, role_has};

/// Operations on an existing booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    /// Read it.
    View,
    /// Change times or note.
    Update,
    /// Cancel it.
    Cancel,
}

impl BookingAction {
    fn verb(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Update => "update",
            Self::Cancel => "cancel",
        }
    }
}

/// Enforces the static role and ownership rules of every protected action.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Checks whether the role holds a role-level permission.
    pub fn require_permission(
        &self,
        principal: &Principal,
        permission: SystemPermission,
    ) -> Result<(), AppError> {
        if role_has(principal.role, permission) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{}' does not have permission '{permission:?}'",
                principal.role
            )))
        }
    }

    /// Members book for themselves only, whatever their role.
    pub fn require_booking_creation(
        &self,
        principal: &Principal,
        booking_user: UserId,
    ) -> Result<(), AppError> {
        if booking_user == principal.id {
            Ok(())
        } else {
            Err(AppError::authorization(
                "You can only create bookings for yourself",
            ))
        }
    }

    /// Admins reach every booking; trainers their own sessions; members their own bookings.
    pub fn require_booking_access(
        &self,
        principal: &Principal,
        booking: &Booking,
        action: BookingAction,
    ) -> Result<(), AppError> {
        let owns = match principal.role {
            UserRole::Admin => false,
            UserRole::Trainer => booking.trainer_id == principal.id,
            UserRole::User => booking.user_id == principal.id,
        };
        if owns || role_has(principal.role, SystemPermission::BookingManageAll) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "You don't have permission to {} this booking",
                action.verb()
            )))
        }
    }

    /// Booking lists of a member are visible to that member and to admins.
    pub fn require_booking_listing(
        &self,
        principal: &Principal,
        user_id: UserId,
    ) -> Result<(), AppError> {
        if user_id == principal.id || role_has(principal.role, SystemPermission::BookingManageAll) {
            Ok(())
        } else {
            Err(AppError::authorization(
                "You can only view your own bookings",
            ))
        }
    }

    /// Admins publish for any trainer; trainers for themselves.
    pub fn require_availability_creation(
        &self,
        principal: &Principal,
        trainer_id: UserId,
    ) -> Result<(), AppError> {
        if !role_has(principal.role, SystemPermission::AvailabilityCreate) {
            return Err(AppError::authorization(
                "Only trainers and administrators can create availability schedules",
            ));
        }
        if trainer_id == principal.id
            || role_has(principal.role, SystemPermission::AvailabilityManageAll)
        {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Trainers can only create their own availability schedules",
            ))
        }
    }

    /// Updating or deleting a schedule is reserved to its trainer and admins.
    pub fn require_availability_ownership(
        &self,
        principal: &Principal,
        availability: &Availability,
    ) -> Result<(), AppError> {
        let owns = availability.trainer_id == principal.id
            && role_has(principal.role, SystemPermission::AvailabilityCreate);
        if owns || role_has(principal.role, SystemPermission::AvailabilityManageAll) {
            Ok(())
        } else {
            Err(AppError::authorization(
                "You don't have permission to modify this availability",
            ))
        }
    }

    /// Only the sender or the recipient may see or delete a message.
    pub fn require_message_participant(
        &self,
        principal: &Principal,
        message: &Message,
    ) -> Result<(), AppError> {
        if message.involves(principal.id) {
            Ok(())
        } else {
            Err(AppError::authorization(
                "You don't have permission to access this message",
            ))
        }
    }

    /// Only the recipient may change a message's status.
    pub fn require_message_recipient(
        &self,
        principal: &Principal,
        message: &Message,
    ) -> Result<(), AppError> {
        if message.recipient_id == principal.id {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Only the recipient can update this message",
            ))
        }
    }

    /// Mass messages are an admin tool.
    pub fn require_mass_messaging(&self, principal: &Principal) -> Result<(), AppError> {
        self.require_permission(principal, SystemPermission::MassMessageSend)
            .map_err(|_| AppError::authorization("Only administrators can send mass messages"))
    }

    /// Accounts with an explicit role are created by admins only.
    pub fn require_user_provisioning(&self, principal: &Principal) -> Result<(), AppError> {
        self.require_permission(principal, SystemPermission::UserProvision)
            .map_err(|_| {
                AppError::authorization("You don't have permission to perform this action")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gymhub_core::error::ErrorKind;
    use gymhub_core::types::id::{AvailabilityId, BookingId, CenterId};
    use gymhub_entity::availability::{CreateAvailability, RecurrenceType};
    use gymhub_entity::booking::CreateBooking;

    fn principal(role: UserRole) -> Principal {
        Principal {
            id: UserId::new(),
            email: String::new(),
            name: String::new(),
            role,
            raw_token: String::new(),
            expires_at: None,
        }
    }

    fn booking(user_id: UserId, trainer_id: UserId) -> Booking {
        let start = Utc.with_ymd_and_hms(2025, 3, 12, 10, 0, 0).unwrap();
        Booking::new(
            BookingId::new(),
            CreateBooking {
                user_id,
                trainer_id,
                center_id: CenterId::new(),
                start_time: start,
                end_time: start + chrono::Duration::hours(1),
                message: None,
            },
        )
    }

    #[test]
    fn test_booking_access_matrix() {
        let rbac = RbacEnforcer::new();
        let member = principal(UserRole::User);
        let trainer = principal(UserRole::Trainer);
        let stranger = principal(UserRole::User);
        let admin = principal(UserRole::Admin);
        let b = booking(member.id, trainer.id);

        for action in [BookingAction::View, BookingAction::Update, BookingAction::Cancel] {
            assert!(rbac.require_booking_access(&member, &b, action).is_ok());
            assert!(rbac.require_booking_access(&trainer, &b, action).is_ok());
            assert!(rbac.require_booking_access(&admin, &b, action).is_ok());
            let err = rbac.require_booking_access(&stranger, &b, action).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Authorization);
        }
    }

    #[test]
    fn test_trainer_as_member_is_judged_by_trainer_id() {
        let rbac = RbacEnforcer::new();
        let trainer = principal(UserRole::Trainer);
        // Booked by the trainer for themselves with someone else.
        let b = booking(trainer.id, UserId::new());
        assert!(
            rbac.require_booking_access(&trainer, &b, BookingAction::View)
                .is_err()
        );
    }

    #[test]
    fn test_booking_creation_for_self_only() {
        let rbac = RbacEnforcer::new();
        let admin = principal(UserRole::Admin);
        assert!(rbac.require_booking_creation(&admin, admin.id).is_ok());
        assert!(rbac.require_booking_creation(&admin, UserId::new()).is_err());
    }

    #[test]
    fn test_booking_listing() {
        let rbac = RbacEnforcer::new();
        let member = principal(UserRole::User);
        assert!(rbac.require_booking_listing(&member, member.id).is_ok());
        assert!(rbac.require_booking_listing(&member, UserId::new()).is_err());
        assert!(
            rbac.require_booking_listing(&principal(UserRole::Admin), member.id)
                .is_ok()
        );
    }

    #[test]
    fn test_availability_creation() {
        let rbac = RbacEnforcer::new();
        let trainer = principal(UserRole::Trainer);
        assert!(rbac.require_availability_creation(&trainer, trainer.id).is_ok());
        assert!(rbac.require_availability_creation(&trainer, UserId::new()).is_err());
        assert!(
            rbac.require_availability_creation(&principal(UserRole::User), UserId::new())
                .is_err()
        );
        assert!(
            rbac.require_availability_creation(&principal(UserRole::Admin), UserId::new())
                .is_ok()
        );
    }

    #[test]
    fn test_availability_ownership() {
        let rbac = RbacEnforcer::new();
        let trainer = principal(UserRole::Trainer);
        let member = principal(UserRole::User);
        let schedule = Availability::new(
            AvailabilityId::new(),
            CreateAvailability {
                trainer_id: trainer.id,
                center_id: CenterId::new(),
                recurrence_type: RecurrenceType::Weekly,
                schedule: vec![],
                start_date: Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap(),
                end_date: None,
            },
            Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap(),
        );

        assert!(rbac.require_availability_ownership(&trainer, &schedule).is_ok());
        assert!(
            rbac.require_availability_ownership(&principal(UserRole::Admin), &schedule)
                .is_ok()
        );
        assert!(
            rbac.require_availability_ownership(&principal(UserRole::Trainer), &schedule)
                .is_err()
        );
        assert!(rbac.require_availability_ownership(&member, &schedule).is_err());
        // A member cannot publish even under their own id.
        assert!(rbac.require_availability_creation(&member, member.id).is_err());
    }

    #[test]
    fn test_admin_only_actions() {
        let rbac = RbacEnforcer::new();
        assert!(rbac.require_mass_messaging(&principal(UserRole::Admin)).is_ok());
        assert!(rbac.require_mass_messaging(&principal(UserRole::Trainer)).is_err());
        assert!(rbac.require_user_provisioning(&principal(UserRole::User)).is_err());
    }
}
