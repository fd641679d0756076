//! Identity provider configuration.

use serde::{Deserialize, Serialize};

/// How bearer tokens are issued and verified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    /// Microsoft Entra External ID: native auth flows and JWKS verification.
    #[default]
    Entra,
    /// Locally signed HMAC tokens; the native auth endpoints are unavailable.
    Local,
}

/// External identity tenant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Provider mode.
    #[serde(default)]
    pub mode: IdentityMode,
    /// Tenant subdomain (`{subdomain}.ciamlogin.com`).
    #[serde(default)]
    pub tenant_subdomain: String,
    /// Tenant id (GUID) used in issuer and JWKS URLs.
    #[serde(default)]
    pub tenant_id: String,
    /// Application (client) id; also the expected token audience.
    #[serde(default)]
    pub client_id: String,
    /// Client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Prefix of custom user attributes (`extension_<appid>_`).
    #[serde(default)]
    pub b2c_extensions: String,
    /// Timeout for calls to the identity provider, in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Maximum completion polls during a password reset.
    #[serde(default = "default_poll_attempts")]
    pub reset_poll_attempts: u32,
    /// Minimum gap between signing key refreshes triggered by unknown `kid`s.
    #[serde(default = "default_jwks_min_refresh")]
    pub jwks_min_refresh_seconds: u64,
}

impl IdentityConfig {
    /// Base URL of the native auth API.
    pub fn native_auth_base_url(&self) -> String {
        format!(
            "https://{sub}.ciamlogin.com/{sub}.onmicrosoft.com",
            sub = self.tenant_subdomain
        )
    }

    /// Expected `iss` claim of access tokens.
    pub fn issuer(&self) -> String {
        format!(
            "https://{}.b2clogin.com/{}/v2.0/",
            self.tenant_subdomain, self.tenant_id
        )
    }

    /// URL of the signing key set.
    pub fn jwks_url(&self) -> String {
        format!(
            "https://{}.b2clogin.com/{}/discovery/v2.0/keys",
            self.tenant_subdomain, self.tenant_id
        )
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            mode: IdentityMode::default(),
            tenant_subdomain: String::new(),
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            b2c_extensions: String::new(),
            http_timeout_seconds: default_http_timeout(),
            reset_poll_attempts: default_poll_attempts(),
            jwks_min_refresh_seconds: default_jwks_min_refresh(),
        }
    }
}

fn default_http_timeout() -> u64 {
    15
}

fn default_poll_attempts() -> u32 {
    3
}

fn default_jwks_min_refresh() -> u64 {
    30
}
