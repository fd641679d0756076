//! Identity provider error responses and their mapping to [`AppError`].
//!
//! The native auth API answers failures with `{error, suberror?,
//! error_description, error_codes, ...}`. Every failure is surfaced to the
//! client as `{code, message, description, context?, suberror?, details}`
//! where `message` is a friendly rendering of the code.

use serde_json::{Value, json};
use thiserror::Error;

use gymhub_core::error::{AppError, ErrorKind};

/// Fallback message for unknown error codes.
const DEFAULT_ERROR_MESSAGE: &str = "Authentication error occurred";
/// Fallback message for unknown sub-error codes.
const DEFAULT_SUBERROR_MESSAGE: &str = "Additional authentication error";

/// Friendly message for a provider error or sub-error code.
pub fn describe(code: &str) -> Option<&'static str> {
    Some(match code {
        "invalid_request" => "Invalid request parameters",
        "invalid_grant" => "Authentication failed",
        "expired_token" => "Your session has expired, please try again",
        "attributes_required" => "Additional information is required",
        "unauthorized_client" => "Application is not authorized",
        "unsupported_challenge_type" => "Authentication method not supported",
        "user_not_found" => "User account not found",
        "invalid_client" => "Application configuration error",
        "password_too_weak" => "Password is too weak and doesn't meet complexity requirements",
        "password_too_short" => "Password must be at least 8 characters long",
        "password_too_long" => "Password exceeds the maximum length of 256 characters",
        "password_recently_used" => {
            "Password has been used recently, please choose a different one"
        }
        "password_banned" => "Password contains banned words or patterns",
        "password_is_invalid" => "Password contains invalid characters",
        "invalid_oob_value" => "The verification code is incorrect",
        "attribute_validation_failed" => "Some of the provided information is invalid",
        "nativeauthapi_disabled" => "Native authentication is not enabled for this application",
        _ => return None,
    })
}

/// Failures talking to the identity provider.
#[derive(Debug, Error)]
pub enum UpstreamAuthError {
    /// The provider rejected the request.
    #[error("{message}")]
    Provider {
        /// Provider error code (`invalid_grant`, `user_not_found`, ...).
        code: String,
        /// Friendly message for `code`.
        message: String,
        /// The provider's own description.
        description: String,
        /// Which step of which flow failed.
        context: Option<String>,
        /// Sub-error code and its friendly message.
        suberror: Option<(String, String)>,
        /// The raw provider response.
        details: Value,
    },

    /// The provider answered successfully but the flow cannot continue.
    #[error("{message}")]
    Flow {
        /// Stable code (`redirect_required`, `password_reset_timeout`, ...).
        code: &'static str,
        /// Human-readable message.
        message: String,
        /// The provider response that stopped the flow, if any.
        details: Option<Value>,
    },

    /// The request never got a usable HTTP response.
    #[error("Identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with something that is not the expected JSON.
    #[error("Identity provider returned an unreadable response during {context}")]
    MalformedResponse {
        /// Which step produced the response.
        context: String,
    },
}

impl UpstreamAuthError {
    /// Build a provider error from a failed response body.
    pub fn from_response(body: Value, context: &str) -> Self {
        let code = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let message = describe(&code).unwrap_or(DEFAULT_ERROR_MESSAGE).to_string();
        let description = body
            .get("error_description")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        let suberror = body
            .get("suberror")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|s| {
                (
                    s.to_string(),
                    describe(s).unwrap_or(DEFAULT_SUBERROR_MESSAGE).to_string(),
                )
            });

        Self::Provider {
            code,
            message,
            description,
            context: (!context.is_empty()).then(|| context.to_string()),
            suberror,
            details: body,
        }
    }

    /// A flow-level failure with no provider payload.
    pub fn flow(code: &'static str, message: impl Into<String>) -> Self {
        Self::Flow {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// The application error kind this failure maps to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Provider { code, .. } => match code.as_str() {
                "user_not_found" => ErrorKind::NotFound,
                "unauthorized_client" | "invalid_client" | "expired_token" => {
                    ErrorKind::Authentication
                }
                _ => ErrorKind::Validation,
            },
            Self::Flow { .. } => ErrorKind::Validation,
            Self::Transport(_) | Self::MalformedResponse { .. } => ErrorKind::ExternalService,
        }
    }

    /// Client-facing structured body.
    fn body(&self) -> Option<Value> {
        match self {
            Self::Provider {
                code,
                message,
                description,
                context,
                suberror,
                details,
            } => {
                let mut body = json!({
                    "code": code,
                    "message": message,
                    "description": description,
                    "details": details,
                });
                if let Some(context) = context {
                    body["context"] = json!(context);
                }
                if let Some((code, message)) = suberror {
                    body["suberror"] = json!({ "code": code, "message": message });
                }
                Some(body)
            }
            Self::Flow {
                code,
                message,
                details,
            } => {
                let mut body = json!({ "code": code, "message": message });
                if let Some(details) = details {
                    body["details"] = details.clone();
                }
                Some(body)
            }
            Self::Transport(_) | Self::MalformedResponse { .. } => None,
        }
    }
}

impl From<UpstreamAuthError> for AppError {
    fn from(err: UpstreamAuthError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let body = err.body();
        let error = match err {
            UpstreamAuthError::Transport(e) => AppError::with_source(kind, message, e),
            _ => AppError::new(kind, message),
        };
        match body {
            Some(body) => error.with_details(body),
            None => error,
        }
    }
}
