//! Locally signed access tokens for development and tests.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use gymhub_core::config::AuthConfig;
use gymhub_core::error::AppError;
use gymhub_core::types::id::UserId;
use gymhub_entity::user::UserRole;

use super::AccessClaims;
use super::local::hmac_algorithm;

/// A signed token and its expiry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IssuedToken {
    /// The compact JWT.
    pub access_token: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Creates HMAC-signed access tokens accepted by [`super::LocalTokenVerifier`].
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Signing header (algorithm).
    header: Header,
    /// Access token TTL.
    ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("alg", &self.header.alg)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let algorithm = hmac_algorithm(&config.algorithm)?;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            header: Header::new(algorithm),
            ttl: Duration::minutes(config.expiration_minutes as i64),
        })
    }

    /// Sign an access token for the given identity, valid from `now`.
    pub fn issue(
        &self,
        user_id: UserId,
        email: &str,
        name: &str,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let expires_at = now + self.ttl;
        let claims = AccessClaims {
            oid: user_id.to_string(),
            email: Some(email.to_string()),
            name: Some(name.to_string()),
            roles: vec![role.as_str().to_string()],
            iat: Some(now.timestamp()),
            exp: expires_at.timestamp(),
        };

        let access_token = encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok(IssuedToken {
            access_token,
            expires_at,
        })
    }
}
