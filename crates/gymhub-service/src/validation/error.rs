//! Domain rule violations.

use serde_json::json;
use thiserror::Error;

use gymhub_core::error::AppError;

/// A request that breaks a booking, availability or messaging rule.
///
/// Each variant has a stable code that clients receive in
/// `details.code` alongside the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    // --- Bookings ---
    /// Start is too close to now.
    #[error("Bookings must be made at least {min_hours} hours in advance")]
    LeadTime {
        /// Required lead time.
        min_hours: i64,
    },

    /// The stored start is inside the modification window.
    #[error("Bookings can only be modified at least {window_hours} hours in advance")]
    ModificationWindow {
        /// Required notice.
        window_hours: i64,
    },

    /// The booking already took place.
    #[error("Past bookings cannot be modified")]
    PastBooking,

    /// The booking was cancelled before.
    #[error("Booking is already cancelled")]
    AlreadyCancelled,

    // --- Availabilities ---
    /// Two slots of one day intersect.
    #[error("Time slots cannot overlap")]
    Overlap,

    /// A slot does not end after it starts.
    #[error("Time slot end must be after its start")]
    SlotOrder,

    /// The pattern would start in the past.
    #[error("Start date cannot be in the past")]
    PastStart,

    /// The end date is not after the start date.
    #[error("End date must be after start date")]
    DateOrder,

    /// Day entries do not fit the recurrence type.
    #[error("{0}")]
    ScheduleMismatch(String),

    /// Weekday outside Monday..Sunday.
    #[error("day_of_week must be between 0 and 6, got {0}")]
    DayOfWeekRange(u8),

    /// Started patterns are frozen.
    #[error("Cannot modify availability that has already started")]
    Immutable,

    // --- Messages ---
    /// The sender's role may not write to the recipient's role.
    #[error("{0}")]
    RecipientNotAllowed(&'static str),

    /// Blank body.
    #[error("Message content cannot be empty")]
    EmptyContent,

    /// Mass send with an empty recipient list.
    #[error("Mass message must have at least one recipient")]
    NoRecipients,

    /// Mass sends never target admins.
    #[error("Cannot send mass messages to administrators")]
    MassToAdmins,

    /// Update without any field.
    #[error("At least one field must be updated")]
    EmptyUpdate,

    /// Mass send that produced no document.
    #[error("Failed to create any messages")]
    NothingSent,
}

impl ValidationFailure {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::LeadTime { .. } => "LEAD_TIME_VIOLATION",
            Self::ModificationWindow { .. } => "MODIFICATION_WINDOW_VIOLATION",
            Self::PastBooking => "PAST_BOOKING",
            Self::AlreadyCancelled => "ALREADY_CANCELLED",
            Self::Overlap => "TIME_SLOT_OVERLAP",
            Self::SlotOrder => "TIME_SLOT_ORDER",
            Self::PastStart => "PAST_START_DATE",
            Self::DateOrder => "DATE_ORDER",
            Self::ScheduleMismatch(_) => "SCHEDULE_MISMATCH",
            Self::DayOfWeekRange(_) => "DAY_OF_WEEK_RANGE",
            Self::Immutable => "AVAILABILITY_STARTED",
            Self::RecipientNotAllowed(_) => "RECIPIENT_NOT_ALLOWED",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::NoRecipients => "NO_RECIPIENTS",
            Self::MassToAdmins => "MASS_TO_ADMINS",
            Self::EmptyUpdate => "EMPTY_UPDATE",
            Self::NothingSent => "NOTHING_SENT",
        }
    }
}

impl From<ValidationFailure> for AppError {
    fn from(err: ValidationFailure) -> Self {
        AppError::validation(err.to_string()).with_details(json!({ "code": err.code() }))
    }
}
