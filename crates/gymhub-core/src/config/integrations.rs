//! Settings for third-party services the deployment provisions but the
//! API does not call yet.

use serde::{Deserialize, Serialize};

/// Outbound email service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Service connection string.
    #[serde(default)]
    pub connection_string: String,
    /// Sender address.
    #[serde(default)]
    pub sender: String,
}

/// Telemetry exporter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Exporter connection string.
    #[serde(default)]
    pub connection_string: String,
}

/// Blob storage account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlobStorageConfig {
    /// Account connection string.
    #[serde(default)]
    pub connection_string: String,
    /// Container name.
    #[serde(default)]
    pub container_name: String,
}

/// Payment processor keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentsConfig {
    /// Secret API key.
    #[serde(default)]
    pub secret_key: String,
    /// Publishable key.
    #[serde(default)]
    pub publishable_key: String,
}
