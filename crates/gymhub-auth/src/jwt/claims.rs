//! Access token claims and their mapping to a [`Principal`].

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use gymhub_core::error::AppError;
use gymhub_core::types::id::UserId;
use gymhub_entity::user::{Principal, UserRole};

/// Claims carried by access tokens, whether issued by the identity
/// provider or signed locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Object id of the user in the identity tenant.
    pub oid: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Application roles; only the first one is used.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: Option<i64>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl AccessClaims {
    /// The effective role: the first `roles` entry, `user` when absent.
    pub fn role(&self) -> Result<UserRole, AppError> {
        match self.roles.first() {
            Some(role) => role
                .parse()
                .map_err(|_| AppError::authentication(format!("Unrecognized role claim '{role}'"))),
            None => Ok(UserRole::User),
        }
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Build the request principal from verified claims.
    pub fn into_principal(self, raw_token: &str) -> Result<Principal, AppError> {
        let id: UserId = self
            .oid
            .parse()
            .map_err(|_| AppError::authentication("Token subject is not a valid object id"))?;
        let role = self.role()?;
        let expires_at = self.expires_at();

        Ok(Principal {
            id,
            email: self.email.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            role,
            raw_token: raw_token.to_string(),
            expires_at,
        })
    }
}

/// Read the payload of a token without checking its signature.
///
/// Only used for optional profile claims on a token that has already been
/// verified; returns `None` for anything that is not a well-formed JWT.
pub fn peek_claims(token: &str) -> Option<Map<String, Value>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
