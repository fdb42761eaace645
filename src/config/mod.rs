//! Configuration management for the service
//!
//! This module handles loading, validation, and serialization of the
//! service configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, StoreRateError};
use std::path::Path;
use tracing::{debug, info};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/storerate.yaml";

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Service configuration
    pub app: AppConfig,
}

impl Config {
    /// Load configuration from file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreRateError::config(format!("Failed to read config file: {}", e)))?;

        let mut app: AppConfig = serde_yaml::from_str(&content)
            .map_err(|e| StoreRateError::config(format!("Failed to parse config: {}", e)))?;
        app.apply_env_overrides()?;

        let config = Self { app };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            app: AppConfig::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise from the environment
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path).await
        } else {
            info!(
                "Config file {:?} not found, using defaults and environment",
                path.as_ref()
            );
            Self::from_env()
        }
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.app.server
    }

    /// Get storage configuration
    pub fn storage(&self) -> &StorageConfig {
        &self.app.storage
    }

    /// Get auth configuration
    pub fn auth(&self) -> &AuthConfig {
        &self.app.auth
    }

    /// Get audit configuration
    pub fn audit(&self) -> &AuditConfig {
        &self.app.audit
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.app.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        Validate::validate(&self.app).map_err(StoreRateError::Config)?;
        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.app).map_err(|e| {
            StoreRateError::config(format!("Failed to serialize config to JSON: {}", e))
        })
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.app).map_err(|e| {
            StoreRateError::config(format!("Failed to serialize config to YAML: {}", e))
        })
    }
}
