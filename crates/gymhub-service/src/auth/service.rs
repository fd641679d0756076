//! Account flows delegated to the identity provider.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use gymhub_auth::identity::{IdentityProvider, SignUpProfile, TokenSet};
use gymhub_auth::jwt::peek_claims;
use gymhub_core::error::AppError;
use gymhub_core::types::id::UserId;
use gymhub_entity::user::{Principal, UserRole};

use crate::context::RequestContext;
use crate::observer::{ServiceObserver, observe};

/// A plain acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMessage {
    pub message: String,
}

/// Registration started; the code was emailed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationStarted {
    pub message: String,
    /// Pass back to `verify_otp`.
    pub continuation_token: String,
}

/// Password reset started; the code was emailed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetStarted {
    pub message: String,
    pub continuation_token: String,
    pub challenge_type: String,
    pub code_length: Option<u32>,
}

/// Password reset finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetCompleted {
    pub status: String,
    pub message: String,
    pub continuation_token: Option<String>,
}

/// Profile of the caller as seen in their access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<String>,
    pub street_address: Option<String>,
    /// Expiry of the presented token.
    pub token_expires_at: Option<DateTime<Utc>>,
}

fn claim(claims: &Map<String, Value>, key: &str) -> Option<String> {
    claims.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Orchestrates registration, sign-in and password reset.
#[derive(Debug, Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    observer: Arc<dyn ServiceObserver>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(provider: Arc<dyn IdentityProvider>, observer: Arc<dyn ServiceObserver>) -> Self {
        Self { provider, observer }
    }

    /// Self-service registration. The role is always `user`.
    pub async fn register(&self, mut profile: SignUpProfile) -> Result<RegistrationStarted, AppError> {
        profile.role = UserRole::User;
        observe(self.observer.as_ref(), "auth.register", self.start_registration(profile)).await
    }

    /// Registration on someone else's behalf with an explicit role.
    pub async fn admin_create_user(
        &self,
        ctx: &RequestContext,
        profile: SignUpProfile,
    ) -> Result<RegistrationStarted, AppError> {
        info!(actor = %ctx.user_id, role = %profile.role, "Admin registering user");
        observe(
            self.observer.as_ref(),
            "auth.admin_create_user",
            self.start_registration(profile),
        )
        .await
    }

    async fn start_registration(&self, profile: SignUpProfile) -> Result<RegistrationStarted, AppError> {
        let continuation_token = self.provider.start_sign_up(&profile).await?;
        info!(role = %profile.role, "Registration started");
        Ok(RegistrationStarted {
            message: "OTP code has been sent to your email. Enter the code in the next step."
                .to_string(),
            continuation_token,
        })
    }

    /// Completes registration with the emailed code and returns tokens.
    pub async fn verify_otp(
        &self,
        email: &str,
        password: &str,
        otp: &str,
        continuation_token: &str,
    ) -> Result<TokenSet, AppError> {
        observe(
            self.observer.as_ref(),
            "auth.verify_otp",
            self.provider
                .complete_sign_up(email, password, otp, continuation_token),
        )
        .await
    }

    /// Signs in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenSet, AppError> {
        observe(
            self.observer.as_ref(),
            "auth.login",
            self.provider.sign_in(email, password),
        )
        .await
    }

    /// Submits a one-time code for an ongoing flow.
    pub async fn submit_otp(&self, otp: &str, continuation_token: &str) -> Result<AuthMessage, AppError> {
        observe(self.observer.as_ref(), "auth.submit_otp", async {
            self.provider.submit_otp(otp, continuation_token).await?;
            Ok(AuthMessage {
                message: "OTP verified successfully".to_string(),
            })
        })
        .await
    }

    /// Tokens are stateless; the client discards them.
    pub fn logout(&self) -> AuthMessage {
        AuthMessage {
            message: "Successfully logged out".to_string(),
        }
    }

    /// Starts a password reset and emails a code.
    pub async fn initiate_password_reset(&self, email: &str) -> Result<PasswordResetStarted, AppError> {
        observe(self.observer.as_ref(), "auth.password_reset", async {
            let challenge = self.provider.start_password_reset(email).await?;
            Ok(PasswordResetStarted {
                message: "Password reset verification code sent to email".to_string(),
                continuation_token: challenge.continuation_token,
                challenge_type: challenge.challenge_type,
                code_length: challenge.code_length,
            })
        })
        .await
    }

    /// Verifies the reset code and sets the new password.
    pub async fn verify_password_reset(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
        continuation_token: &str,
    ) -> Result<PasswordResetCompleted, AppError> {
        observe(self.observer.as_ref(), "auth.password_reset_verify", async {
            let outcome = self
                .provider
                .complete_password_reset(email, otp, new_password, continuation_token)
                .await?;
            Ok(PasswordResetCompleted {
                status: "success".to_string(),
                message: "Password has been reset successfully".to_string(),
                continuation_token: outcome.continuation_token,
            })
        })
        .await
    }

    /// Exchanges a refresh token for new tokens.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, AppError> {
        observe(
            self.observer.as_ref(),
            "auth.refresh",
            self.provider.refresh_token(refresh_token),
        )
        .await
    }

    /// Builds the caller's profile from the verified principal, topped up
    /// with optional profile claims read from the same token.
    pub fn me(&self, principal: &Principal) -> UserInfo {
        let extra = peek_claims(&principal.raw_token).unwrap_or_default();
        UserInfo {
            id: principal.id,
            email: principal.email.clone(),
            name: principal.name.clone(),
            role: principal.role,
            given_name: claim(&extra, "given_name"),
            family_name: claim(&extra, "family_name"),
            phone: claim(&extra, "userPhone"),
            birthday: claim(&extra, "userBirthday"),
            street_address: claim(&extra, "userStreetAddress"),
            token_expires_at: principal.expires_at,
        }
    }
}
