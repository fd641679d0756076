//! # gymhub-auth
//!
//! Authentication and authorization for GymHub.
//!
//! ## Modules
//!
//! - `jwt`: bearer token verification (remote JWKS and local HMAC) and local token issuing
//! - `identity`: the external identity provider gateway (sign-up, sign-in, password reset)
//! - `rbac`: static role checks for every protected action

pub mod identity;
pub mod jwt;
pub mod rbac;

pub use identity::{
    DisabledIdentityProvider, EntraNativeAuthClient, IdentityProvider, UpstreamAuthError,
    build_identity_provider,
};
pub use jwt::{
    AccessClaims, JwksTokenVerifier, JwtEncoder, LocalTokenVerifier, TokenVerifier, build_verifier,
};
pub use rbac::RbacEnforcer;
