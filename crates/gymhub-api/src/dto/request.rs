//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use gymhub_auth::identity::SignUpProfile;
use gymhub_core::error::AppError;
use gymhub_entity::user::UserRole;

/// Runs derive-based validation, turning failures into a 400.
pub fn validated<T: Validate>(request: T) -> Result<T, AppError> {
    request.validate().map_err(validation_error)?;
    Ok(request)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let details = serde_json::to_value(&errors).unwrap_or_default();
    AppError::validation(format!("Invalid request: {errors}")).with_details(details)
}

/// Self-service registration body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Accepted for compatibility; the password is set in `verify-otp`.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "givenName is required"))]
    pub given_name: String,
    #[validate(length(min = 1, message = "surname is required"))]
    pub surname: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub cus_birthday: Option<String>,
    #[serde(default)]
    pub cus_phone: Option<String>,
}

impl RegisterRequest {
    /// Profile sent to the identity provider, with the given role.
    pub fn into_profile(self, role: UserRole) -> SignUpProfile {
        SignUpProfile {
            email: self.email,
            given_name: self.given_name,
            surname: self.surname,
            postal_code: self.postal_code,
            street_address: self.street_address,
            city: self.city,
            birthday: self.cus_birthday,
            phone: self.cus_phone,
            role,
        }
    }
}

/// Admin registration body: the self-service fields plus a role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdminCreateUserRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: RegisterRequest,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "OTP is required"))]
    pub otp: String,
    #[validate(length(min = 1))]
    pub continuation_token: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// OAuth2 password-grant style form used by interactive API docs.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TokenForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitOtpRequest {
    #[validate(length(min = 1, message = "OTP is required"))]
    pub otp_code: String,
    #[validate(length(min = 1))]
    pub continuation_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetVerifyRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "OTP is required"))]
    pub otp: String,
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
    #[validate(length(min = 1))]
    pub continuation_token: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Date window of the center availability listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CenterRangeQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}
