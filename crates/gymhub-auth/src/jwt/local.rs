//! HMAC token verification for the `local` identity mode.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use gymhub_core::config::AuthConfig;
use gymhub_core::error::AppError;
use gymhub_entity::user::Principal;

use super::{AccessClaims, TokenVerifier, map_jwt_error};

/// Verifies tokens signed by [`super::JwtEncoder`] with the shared secret.
#[derive(Clone)]
pub struct LocalTokenVerifier {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for LocalTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl LocalTokenVerifier {
    /// Creates a new verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let mut validation = Validation::new(hmac_algorithm(&config.algorithm)?);
        validation.validate_exp = true;
        validation.leeway = 5;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }
}

#[async_trait]
impl TokenVerifier for LocalTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, AppError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(map_jwt_error)?;
        data.claims.into_principal(token)
    }
}

/// Resolve a configured algorithm name, accepting only the HMAC family.
pub(crate) fn hmac_algorithm(name: &str) -> Result<Algorithm, AppError> {
    match name.to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(AppError::configuration(format!(
            "auth.algorithm '{other}' is not supported; use HS256, HS384 or HS512"
        ))),
    }
}
