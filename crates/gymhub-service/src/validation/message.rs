//! Messaging rules.

use gymhub_entity::message::{CreateIndividualMessage, CreateMassMessage, UpdateMessage};
use gymhub_entity::user::UserRole;

use super::ValidationFailure;

/// Members write to trainers and admins, trainers to members and admins,
/// admins to anyone.
pub fn validate_individual_permissions(
    sender_role: UserRole,
    recipient_role: UserRole,
) -> Result<(), ValidationFailure> {
    match (sender_role, recipient_role) {
        (UserRole::Admin, _) => Ok(()),
        (UserRole::User, UserRole::Trainer | UserRole::Admin) => Ok(()),
        (UserRole::User, UserRole::User) => Err(ValidationFailure::RecipientNotAllowed(
            "Users can only send messages to trainers or administrators",
        )),
        (UserRole::Trainer, UserRole::User | UserRole::Admin) => Ok(()),
        (UserRole::Trainer, UserRole::Trainer) => Err(ValidationFailure::RecipientNotAllowed(
            "Trainers can only send messages to users or administrators",
        )),
    }
}

/// Role pairing and non-blank content.
pub fn validate_create_individual_message(
    sender_role: UserRole,
    request: &CreateIndividualMessage,
) -> Result<(), ValidationFailure> {
    validate_individual_permissions(sender_role, request.recipient_type)?;
    if request.content.trim().is_empty() {
        return Err(ValidationFailure::EmptyContent);
    }
    Ok(())
}

/// Non-blank content and a non-admin audience with recipients.
pub fn validate_create_mass_message(request: &CreateMassMessage) -> Result<(), ValidationFailure> {
    if request.content.trim().is_empty() {
        return Err(ValidationFailure::EmptyContent);
    }
    if request.recipient_ids.is_empty() {
        return Err(ValidationFailure::NoRecipients);
    }
    if request.recipient_type == UserRole::Admin {
        return Err(ValidationFailure::MassToAdmins);
    }
    Ok(())
}

/// At least one of status or read_at must be supplied.
pub fn validate_update_message(update: &UpdateMessage) -> Result<(), ValidationFailure> {
    if update.status.is_none() && update.read_at.is_none() {
        return Err(ValidationFailure::EmptyUpdate);
    }
    Ok(())
}
