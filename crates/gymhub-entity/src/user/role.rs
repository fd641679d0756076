//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a principal can hold. Also types message senders and recipients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Gym member.
    #[default]
    User,
    /// Personal trainer.
    Trainer,
    /// Gym administrator.
    Admin,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if this role is a trainer.
    pub fn is_trainer(&self) -> bool {
        matches!(self, Self::Trainer)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Trainer => "trainer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = gymhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "trainer" => Ok(Self::Trainer),
            "admin" => Ok(Self::Admin),
            _ => Err(gymhub_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: user, trainer, admin"
            ))),
        }
    }
}
