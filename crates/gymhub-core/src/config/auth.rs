//! Local token configuration.

use serde::{Deserialize, Serialize};

/// Settings for locally signed access tokens (development and tests).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Signing algorithm name. Only the HMAC family is accepted.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_expiration")]
    pub expiration_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            algorithm: default_algorithm(),
            expiration_minutes: default_expiration(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_expiration() -> u64 {
    30
}
