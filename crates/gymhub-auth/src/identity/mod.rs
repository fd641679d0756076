//! External identity provider gateway.
//!
//! Registration, sign-in, OTP verification and password reset are delegated
//! to the identity tenant; GymHub never stores credentials.

pub mod client;
pub mod errors;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use gymhub_core::config::{IdentityConfig, IdentityMode};
use gymhub_core::error::AppError;
use gymhub_entity::user::UserRole;

pub use client::EntraNativeAuthClient;
pub use errors::UpstreamAuthError;

/// Tokens returned by a completed sign-in, sign-up or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Access token for the API.
    pub access_token: String,
    /// Token type, normally `Bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: i64,
    /// OpenID Connect id token.
    #[serde(default)]
    pub id_token: Option<String>,
    /// Refresh token, when `offline_access` was granted.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Profile attributes sent when a new account is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpProfile {
    /// Sign-in email.
    pub email: String,
    /// First name.
    pub given_name: String,
    /// Last name.
    pub surname: String,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Street address.
    pub street_address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Birthday, as entered.
    pub birthday: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Application role stored as a custom attribute.
    pub role: UserRole,
}

impl SignUpProfile {
    /// Display name shown by the provider.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.surname)
    }
}

/// State of a password reset after the code was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetChallenge {
    /// Token for the next step.
    pub continuation_token: String,
    /// Challenge kind chosen by the provider (`oob`).
    pub challenge_type: String,
    /// Length of the emailed code.
    #[serde(default)]
    pub code_length: Option<u32>,
}

/// A password reset that completed successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetOutcome {
    /// Token usable to sign in without re-entering the password.
    #[serde(default)]
    pub continuation_token: Option<String>,
}

/// Operations offered by the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Start registration and have a one-time code emailed. Returns the
    /// continuation token for [`IdentityProvider::complete_sign_up`].
    async fn start_sign_up(&self, profile: &SignUpProfile) -> Result<String, AppError>;

    /// Verify the emailed code, set the password and obtain tokens.
    async fn complete_sign_up(
        &self,
        email: &str,
        password: &str,
        otp: &str,
        continuation_token: &str,
    ) -> Result<TokenSet, AppError>;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<TokenSet, AppError>;

    /// Submit a one-time code on its own.
    async fn submit_otp(&self, otp: &str, continuation_token: &str) -> Result<(), AppError>;

    /// Start a password reset and have a code emailed.
    async fn start_password_reset(&self, email: &str) -> Result<PasswordResetChallenge, AppError>;

    /// Verify the code, submit the new password and wait for completion.
    async fn complete_password_reset(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
        continuation_token: &str,
    ) -> Result<PasswordResetOutcome, AppError>;

    /// Exchange a refresh token for a fresh token set.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenSet, AppError>;
}

/// Build the provider matching the configured identity mode.
pub fn build_identity_provider(
    config: &IdentityConfig,
) -> Result<Arc<dyn IdentityProvider>, AppError> {
    Ok(match config.mode {
        IdentityMode::Entra => Arc::new(EntraNativeAuthClient::new(config)?),
        IdentityMode::Local => Arc::new(DisabledIdentityProvider),
    })
}

/// Provider used in `local` identity mode, where no tenant is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledIdentityProvider;

impl DisabledIdentityProvider {
    fn unavailable<T>() -> Result<T, AppError> {
        Err(AppError::service_unavailable(
            "Identity provider flows are disabled in local identity mode",
        ))
    }
}

#[async_trait]
impl IdentityProvider for DisabledIdentityProvider {
    async fn start_sign_up(&self, _: &SignUpProfile) -> Result<String, AppError> {
        Self::unavailable()
    }

    async fn complete_sign_up(
        &self,
        _: &str,
        _: &str,
        _: &str,
        _: &str,
    ) -> Result<TokenSet, AppError> {
        Self::unavailable()
    }

    async fn sign_in(&self, _: &str, _: &str) -> Result<TokenSet, AppError> {
        Self::unavailable()
    }

    async fn submit_otp(&self, _: &str, _: &str) -> Result<(), AppError> {
        Self::unavailable()
    }

    async fn start_password_reset(&self, _: &str) -> Result<PasswordResetChallenge, AppError> {
        Self::unavailable()
    }

    async fn complete_password_reset(
        &self,
        _: &str,
        _: &str,
        _: &str,
        _: &str,
    ) -> Result<PasswordResetOutcome, AppError> {
        Self::unavailable()
    }

    async fn refresh_token(&self, _: &str) -> Result<TokenSet, AppError> {
        Self::unavailable()
    }
}
