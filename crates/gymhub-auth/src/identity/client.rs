//! Client for the Microsoft Entra External ID native authentication API.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use gymhub_core::config::IdentityConfig;
use gymhub_core::error::{AppError, ErrorKind};

use super::errors::UpstreamAuthError;
use super::{IdentityProvider, PasswordResetChallenge, PasswordResetOutcome, SignUpProfile, TokenSet};

const SIGN_UP_CHALLENGE: &str = "oob password redirect";
const SIGN_IN_CHALLENGE: &str = "password redirect";
const RESET_CHALLENGE: &str = "oob redirect";
const SIGN_UP_SCOPE: &str = "openid profile email";
const SIGN_IN_SCOPE: &str = "openid profile email offline_access";
/// Seconds between completion polls when the provider does not say.
const DEFAULT_POLL_INTERVAL: u64 = 2;
/// Upper bound on a provider-supplied poll interval, in seconds.
const MAX_POLL_INTERVAL: u64 = 10;

/// Form-encoded client for the tenant's native auth endpoints.
#[derive(Debug, Clone)]
pub struct EntraNativeAuthClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    extensions_prefix: String,
    poll_attempts: u32,
}

impl EntraNativeAuthClient {
    /// Create a client for the configured tenant.
    pub fn new(config: &IdentityConfig) -> Result<Self, AppError> {
        Self::with_base_url(config, config.native_auth_base_url())
    }

    /// Create a client against an explicit base URL.
    pub fn with_base_url(
        config: &IdentityConfig,
        base_url: impl Into<String>,
    ) -> Result<Self, AppError> {
        if config.tenant_subdomain.is_empty() || config.client_id.is_empty() {
            return Err(AppError::configuration(
                "identity.tenant_subdomain and identity.client_id are required in entra mode",
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            extensions_prefix: config.b2c_extensions.clone(),
            poll_attempts: config.reset_poll_attempts.max(1),
        })
    }

    /// POST a form and return the status with the parsed JSON body.
    async fn send(
        &self,
        path: &str,
        form: &[(&str, &str)],
        context: &str,
    ) -> Result<(reqwest::StatusCode, Value), UpstreamAuthError> {
        let mut fields = Vec::with_capacity(form.len() + 1);
        fields.push(("client_id", self.client_id.as_str()));
        fields.extend_from_slice(form);

        debug!(path = %path, context = %context, "Calling identity provider");
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .form(&fields)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .map_err(|_| UpstreamAuthError::MalformedResponse {
                context: context.to_string(),
            })?;
        Ok((status, body))
    }

    /// POST a form; any non-200 answer becomes a provider error.
    async fn post(
        &self,
        path: &str,
        form: &[(&str, &str)],
        context: &str,
    ) -> Result<Value, UpstreamAuthError> {
        let (status, body) = self.send(path, form, context).await?;
        if status != reqwest::StatusCode::OK {
            warn!(context = %context, status = status.as_u16(), "Identity provider rejected request");
            return Err(UpstreamAuthError::from_response(body, context));
        }
        Ok(body)
    }

    /// Parse a token endpoint response.
    fn token_set(body: Value, context: &str) -> Result<TokenSet, UpstreamAuthError> {
        serde_json::from_value(body).map_err(|_| UpstreamAuthError::MalformedResponse {
            context: context.to_string(),
        })
    }

    /// Custom attributes and profile fields for sign-up, JSON encoded.
    fn sign_up_attributes(&self, profile: &SignUpProfile) -> String {
        let mut attributes = Map::new();
        attributes.insert("displayName".into(), json!(profile.display_name()));
        attributes.insert("givenName".into(), json!(profile.given_name));
        attributes.insert("surname".into(), json!(profile.surname));

        let optional = [
            ("postalCode".to_string(), &profile.postal_code),
            ("streetAddress".to_string(), &profile.street_address),
            ("city".to_string(), &profile.city),
            (format!("{}_cusBirthday", self.extensions_prefix), &profile.birthday),
            (format!("{}_cusPhone", self.extensions_prefix), &profile.phone),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                attributes.insert(key, json!(value));
            }
        }
        attributes.insert(
            format!("{}_cusRole", self.extensions_prefix),
            json!(profile.role.as_str()),
        );

        Value::Object(attributes).to_string()
    }
}

/// Read `continuation_token` from a response, failing when it is absent.
fn continuation_token(body: &Value, step: &str) -> Result<String, UpstreamAuthError> {
    body.get("continuation_token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            UpstreamAuthError::flow(
                "missing_continuation_token",
                format!("No continuation_token received in {step}"),
            )
        })
}

/// Delay between completion polls as advertised by the provider, capped.
fn poll_interval(body: &Value) -> Duration {
    let seconds = body
        .get("poll_interval")
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_POLL_INTERVAL)
        .min(MAX_POLL_INTERVAL);
    Duration::from_secs(seconds)
}

fn redirect_required(body: Value) -> UpstreamAuthError {
    UpstreamAuthError::Flow {
        code: "redirect_required",
        message: "Password reset requires browser-based flow".to_string(),
        details: Some(body),
    }
}

#[async_trait]
impl IdentityProvider for EntraNativeAuthClient {
    async fn start_sign_up(&self, profile: &SignUpProfile) -> Result<String, AppError> {
        let attributes = self.sign_up_attributes(profile);
        let started = self
            .post(
                "/signup/v1.0/start",
                &[
                    ("challenge_type", SIGN_UP_CHALLENGE),
                    ("attributes", attributes.as_str()),
                    ("username", profile.email.as_str()),
                ],
                "sign_up/start",
            )
            .await?;
        let token = continuation_token(&started, "sign_up/start")?;

        self.post(
            "/signup/v1.0/challenge",
            &[("challenge_type", SIGN_UP_CHALLENGE), ("continuation_token", token.as_str())],
            "sign_up/challenge",
        )
        .await?;

        info!(role = %profile.role, "Sign-up started, verification code sent");
        Ok(token)
    }

    async fn complete_sign_up(
        &self,
        email: &str,
        password: &str,
        otp: &str,
        continuation_token_in: &str,
    ) -> Result<TokenSet, AppError> {
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("Missing 'password' or 'email' parameter"));
        }

        let (status, body) = self
            .send(
                "/signup/v1.0/continue",
                &[
                    ("continuation_token", continuation_token_in),
                    ("grant_type", "oob"),
                    ("oob", otp),
                ],
                "sign_up/verify_code",
            )
            .await?;
        let credential_required =
            body.get("error").and_then(Value::as_str) == Some("credential_required");
        if status != reqwest::StatusCode::OK && !credential_required {
            return Err(UpstreamAuthError::from_response(body, "sign_up/verify_code").into());
        }
        let token = continuation_token(&body, "OTP verification")?;

        let body = self
            .post(
                "/signup/v1.0/continue",
                &[
                    ("continuation_token", token.as_str()),
                    ("grant_type", "password"),
                    ("password", password),
                ],
                "sign_up/password",
            )
            .await?;
        let token = continuation_token(&body, "password submission")?;

        let body = self
            .post(
                "/oauth2/v2.0/token",
                &[
                    ("continuation_token", token.as_str()),
                    ("grant_type", "continuation_token"),
                    ("username", email),
                    ("scope", SIGN_UP_SCOPE),
                ],
                "sign_up/token",
            )
            .await?;

        info!("Sign-up completed");
        Ok(Self::token_set(body, "sign_up/token")?)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<TokenSet, AppError> {
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("Missing email or password"));
        }

        let body = self
            .post(
                "/oauth2/v2.0/initiate",
                &[("challenge_type", SIGN_IN_CHALLENGE), ("username", email)],
                "sign_in/initiate",
            )
            .await?;
        let token = continuation_token(&body, "sign_in/initiate")?;

        let challenge = self
            .post(
                "/oauth2/v2.0/challenge",
                &[("challenge_type", SIGN_IN_CHALLENGE), ("continuation_token", token.as_str())],
                "sign_in/challenge",
            )
            .await?;
        if challenge.get("challenge_type").and_then(Value::as_str) != Some("password") {
            return Err(UpstreamAuthError::Flow {
                code: "interactive_required",
                message: "Flow requires interactive authentication (redirect)".to_string(),
                details: Some(challenge),
            }
            .into());
        }
        let token = continuation_token(&challenge, "sign_in/challenge")?;

        let body = self
            .post(
                "/oauth2/v2.0/token",
                &[
                    ("continuation_token", token.as_str()),
                    ("grant_type", "password"),
                    ("password", password),
                    ("scope", SIGN_IN_SCOPE),
                ],
                "sign_in/token",
            )
            .await?;

        debug!("Sign-in succeeded");
        Ok(Self::token_set(body, "sign_in/token")?)
    }

    async fn submit_otp(&self, otp: &str, continuation_token_in: &str) -> Result<(), AppError> {
        let (status, body) = self
            .send(
                "/signup/v1.0/continue",
                &[
                    ("continuation_token", continuation_token_in),
                    ("grant_type", "oob"),
                    ("oob", otp),
                ],
                "sign_up/submit_code",
            )
            .await?;

        match status {
            reqwest::StatusCode::OK => Ok(()),
            reqwest::StatusCode::BAD_REQUEST => {
                Err(UpstreamAuthError::from_response(body, "sign_up/submit_code").into())
            }
            other => Err(AppError::external_service(format!(
                "Failed to submit OTP (provider returned {other})"
            ))),
        }
    }

    async fn start_password_reset(&self, email: &str) -> Result<PasswordResetChallenge, AppError> {
        let started = self
            .post(
                "/resetpassword/v1.0/start",
                &[("challenge_type", RESET_CHALLENGE), ("username", email)],
                "password_reset/start",
            )
            .await?;
        if started.get("challenge_type").and_then(Value::as_str) == Some("redirect") {
            return Err(redirect_required(started).into());
        }
        let token = continuation_token(&started, "password reset start")?;

        let challenge = self
            .post(
                "/resetpassword/v1.0/challenge",
                &[("challenge_type", RESET_CHALLENGE), ("continuation_token", token.as_str())],
                "password_reset/challenge",
            )
            .await?;
        let challenge_type = challenge
            .get("challenge_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if challenge_type == "redirect" {
            return Err(redirect_required(challenge).into());
        }

        Ok(PasswordResetChallenge {
            continuation_token: token,
            challenge_type,
            code_length: challenge
                .get("code_length")
                .and_then(Value::as_u64)
                .map(|n| n as u32),
        })
    }

    async fn complete_password_reset(
        &self,
        _email: &str,
        otp: &str,
        new_password: &str,
        continuation_token_in: &str,
    ) -> Result<PasswordResetOutcome, AppError> {
        let verified = self
            .post(
                "/resetpassword/v1.0/continue",
                &[
                    ("continuation_token", continuation_token_in),
                    ("grant_type", "oob"),
                    ("oob", otp),
                ],
                "password_reset/verify_code",
            )
            .await?;
        let token = continuation_token(&verified, "password reset verification")?;

        let submitted = self
            .post(
                "/resetpassword/v1.0/submit",
                &[("continuation_token", token.as_str()), ("new_password", new_password)],
                "password_reset/submit",
            )
            .await?;
        let token = continuation_token(&submitted, "password submission")?;
        let interval = poll_interval(&submitted);

        for attempt in 1..=self.poll_attempts {
            tokio::time::sleep(interval).await;

            let polled = self
                .post(
                    "/resetpassword/v1.0/poll_completion",
                    &[("continuation_token", token.as_str())],
                    "password_reset/poll",
                )
                .await?;

            match polled.get("status").and_then(Value::as_str) {
                Some("succeeded") => {
                    info!(attempt, "Password reset completed");
                    return Ok(PasswordResetOutcome {
                        continuation_token: polled
                            .get("continuation_token")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    });
                }
                Some("failed") => {
                    return Err(UpstreamAuthError::Flow {
                        code: "password_reset_failed",
                        message: "Password reset failed".to_string(),
                        details: Some(polled),
                    }
                    .into());
                }
                status => debug!(attempt, status = ?status, "Password reset still in progress"),
            }
        }

        Err(UpstreamAuthError::flow(
            "password_reset_timeout",
            "Password reset is taking longer than expected. Please try again.",
        )
        .into())
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenSet, AppError> {
        let body = self
            .post(
                "/oauth2/v2.0/token",
                &[
                    ("refresh_token", refresh_token),
                    ("grant_type", "refresh_token"),
                    ("scope", SIGN_IN_SCOPE),
                ],
                "token/refresh",
            )
            .await?;
        Ok(Self::token_set(body, "token/refresh")?)
    }
}
