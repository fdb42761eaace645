//! Top-level service configuration

use super::*;
use crate::utils::error::{Result, StoreRateError};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

/// Main service configuration, one section per concern
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Audit log configuration
    #[serde(default)]
    pub audit: AuditConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Defaults overlaid with the environment
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Overlay values from `STORERATE_*`, `DATABASE_URL` and `JWT_*` variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = env::var("STORERATE_HOST") {
            debug!("Overriding server host from environment");
            self.server.host = host;
        }

        if let Ok(port) = env::var("STORERATE_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| StoreRateError::config(format!("Invalid STORERATE_PORT: {}", port)))?;
        }

        if let Ok(url) = env::var("DATABASE_URL") {
            debug!("Overriding database url from environment");
            self.storage.database.url = url;
        }

        if let Ok(secret) = env::var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }

        if let Ok(expiration) = env::var("JWT_EXPIRATION") {
            self.auth.jwt_expiration = expiration.parse().map_err(|_| {
                StoreRateError::config(format!("Invalid JWT_EXPIRATION: {}", expiration))
            })?;
        }

        Ok(())
    }
}
