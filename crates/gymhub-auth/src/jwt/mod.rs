//! Bearer token verification and local token issuing.

pub mod claims;
pub mod encoder;
pub mod jwks;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;

use gymhub_core::config::{AuthConfig, IdentityConfig, IdentityMode};
use gymhub_core::error::AppError;
use gymhub_entity::user::Principal;

pub use claims::{AccessClaims, peek_claims};
pub use encoder::{IssuedToken, JwtEncoder};
pub use jwks::JwksTokenVerifier;
pub use local::LocalTokenVerifier;

/// Turns a bearer token into an authenticated [`Principal`].
#[async_trait]
pub trait TokenVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Verify signature, expiry, audience and issuer, then map the claims.
    async fn verify(&self, token: &str) -> Result<Principal, AppError>;
}

/// Build the verifier matching the configured identity mode.
pub fn build_verifier(
    identity: &IdentityConfig,
    auth: &AuthConfig,
) -> Result<Arc<dyn TokenVerifier>, AppError> {
    Ok(match identity.mode {
        IdentityMode::Entra => Arc::new(JwksTokenVerifier::new(identity)?),
        IdentityMode::Local => Arc::new(LocalTokenVerifier::new(auth)?),
    })
}

/// Map `jsonwebtoken` failures to authentication errors.
pub(crate) fn map_jwt_error(e: jsonwebtoken::errors::Error) -> AppError {
    use jsonwebtoken::errors::ErrorKind;

    match e.kind() {
        ErrorKind::ExpiredSignature => AppError::authentication("Token has expired"),
        ErrorKind::InvalidToken => AppError::authentication("Invalid token format"),
        ErrorKind::InvalidSignature => AppError::authentication("Invalid token signature"),
        _ => AppError::authentication("Could not validate credentials"),
    }
}
