//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod identity;
pub mod integrations;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseConfig, StoreBackend};
pub use self::identity::{IdentityConfig, IdentityMode};
pub use self::integrations::{BlobStorageConfig, EmailConfig, PaymentsConfig, TelemetryConfig};
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Document store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Identity provider settings.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Local token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Email service settings.
    #[serde(default)]
    pub email: EmailConfig,
    /// Telemetry settings.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: BlobStorageConfig,
    /// Payment processor settings.
    #[serde(default)]
    pub payments: PaymentsConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `GYMHUB_`
    /// (e.g. `GYMHUB_DATABASE__URL`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GYMHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
