//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use gymhub_api::{AppState, build_app};
use gymhub_auth::identity::{
    IdentityProvider, PasswordResetChallenge, PasswordResetOutcome, SignUpProfile, TokenSet,
};
use gymhub_auth::jwt::{JwtEncoder, LocalTokenVerifier};
use gymhub_core::config::{AppConfig, IdentityMode, StoreBackend};
use gymhub_core::error::AppError;
use gymhub_core::traits::ManualClock;
use gymhub_core::types::id::UserId;
use gymhub_database::MemoryDocumentStore;
use gymhub_entity::user::UserRole;
use gymhub_service::TracingObserver;

/// Wall-clock instant every test app starts at.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()
}

/// Identity provider double: accepts `S3cret-pass`, rejects everything else,
/// and remembers the profiles it was asked to register.
#[derive(Debug, Default)]
pub struct FakeIdentity {
    pub sign_ups: Mutex<Vec<SignUpProfile>>,
}

fn tokens(access: &str) -> TokenSet {
    TokenSet {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
        id_token: Some("id-token".to_string()),
        refresh_token: Some("refresh-token".to_string()),
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn start_sign_up(&self, profile: &SignUpProfile) -> Result<String, AppError> {
        self.sign_ups.lock().unwrap().push(profile.clone());
        Ok("ct-signup".to_string())
    }

    async fn complete_sign_up(
        &self,
        _email: &str,
        _password: &str,
        otp: &str,
        _continuation_token: &str,
    ) -> Result<TokenSet, AppError> {
        if otp == "123456" {
            Ok(tokens("signed-up"))
        } else {
            Err(AppError::validation("The verification code is incorrect"))
        }
    }

    async fn sign_in(&self, _email: &str, password: &str) -> Result<TokenSet, AppError> {
        if password == "S3cret-pass" {
            Ok(tokens("signed-in"))
        } else {
            Err(AppError::authentication("Incorrect password"))
        }
    }

    async fn submit_otp(&self, _otp: &str, _continuation_token: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn start_password_reset(&self, email: &str) -> Result<PasswordResetChallenge, AppError> {
        if email == "ghost@example.com" {
            return Err(AppError::not_found("User not found"));
        }
        Ok(PasswordResetChallenge {
            continuation_token: "ct-reset".to_string(),
            challenge_type: "oob".to_string(),
            code_length: Some(8),
        })
    }

    async fn complete_password_reset(
        &self,
        _email: &str,
        _otp: &str,
        _new_password: &str,
        _continuation_token: &str,
    ) -> Result<PasswordResetOutcome, AppError> {
        Ok(PasswordResetOutcome {
            continuation_token: Some("ct-after-reset".to_string()),
        })
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenSet, AppError> {
        if refresh_token == "refresh-token" {
            Ok(tokens("refreshed"))
        } else {
            Err(AppError::authentication("The refresh token has expired"))
        }
    }
}

/// A caller with a signed bearer token.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: UserId,
    pub role: UserRole,
    pub token: String,
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Clock driving the scheduling rules
    pub clock: Arc<ManualClock>,
    /// Identity provider double
    pub identity: Arc<FakeIdentity>,
    /// Application config
    pub config: AppConfig,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Create a new test application backed by the in-memory store.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = StoreBackend::Memory;
        config.identity.mode = IdentityMode::Local;
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let clock = Arc::new(ManualClock::new(fixed_now()));
        let identity = Arc::new(FakeIdentity::default());
        let verifier =
            Arc::new(LocalTokenVerifier::new(&config.auth).expect("Failed to build verifier"));
        let encoder = JwtEncoder::new(&config.auth).expect("Failed to build encoder");

        let state = AppState::new(
            config.clone(),
            Arc::new(MemoryDocumentStore::new()),
            verifier,
            identity.clone(),
            clock.clone(),
            Arc::new(TracingObserver),
        );

        Self {
            router: build_app(state),
            clock,
            identity,
            config,
            encoder,
        }
    }

    /// A fresh identity with a valid token for `role`.
    pub fn user(&self, role: UserRole) -> TestUser {
        let id = UserId::new();
        let issued = self
            .encoder
            .issue(id, &format!("{id}@example.com"), "Test Person", role, Utc::now())
            .expect("Failed to issue token");
        TestUser {
            id,
            role,
            token: issued.access_token,
        }
    }

    /// Make a JSON HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.send(method, path, "application/json", body_str, token)
            .await
    }

    /// Make a form-encoded HTTP request to the test app
    pub async fn form(&self, path: &str, body: &str) -> TestResponse {
        self.send(
            "POST",
            path,
            "application/x-www-form-urlencoded",
            body.to_string(),
            None,
        )
        .await
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        content_type: &str,
        body: String,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type);

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// `details.code` of an error body.
    pub fn code(&self) -> &str {
        self.body["details"]["code"].as_str().unwrap_or_default()
    }
}
