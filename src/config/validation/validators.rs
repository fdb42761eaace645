//! Configuration validators
//!
//! One `Validate` implementation per configuration section; `AppConfig`
//! validates every section and prefixes the failing one.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

/// Shortest accepted token lifetime
const MIN_JWT_EXPIRATION: u64 = 300;
/// Longest accepted token lifetime
const MAX_JWT_EXPIRATION: u64 = 86400 * 30;

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), String> {
        self.server
            .validate()
            .map_err(|e| format!("Server config error: {}", e))?;
        self.storage
            .validate()
            .map_err(|e| format!("Storage config error: {}", e))?;
        self.auth
            .validate()
            .map_err(|e| format!("Auth config error: {}", e))?;
        self.audit
            .validate()
            .map_err(|e| format!("Audit config error: {}", e))?;
        self.logging
            .validate()
            .map_err(|e| format!("Logging config error: {}", e))?;
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating server configuration");

        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port cannot be 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
        }

        self.cors.validate()
    }
}

impl Validate for CorsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.allows_all_origins() && self.allow_credentials {
            return Err(
                "CORS cannot allow all origins (*) when credentials are enabled".to_string(),
            );
        }

        self.warn_if_permissive();
        Ok(())
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        self.database.validate()
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating database configuration");

        if self.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        if !(self.url.starts_with("sqlite:")
            || self.url.starts_with("postgres://")
            || self.url.starts_with("postgresql://"))
        {
            return Err(format!("Unsupported database URL scheme: {}", self.url));
        }

        if self.max_connections == 0 {
            return Err("Database max connections must be greater than 0".to_string());
        }

        if self.connection_timeout == 0 {
            return Err("Database connection timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating auth configuration");

        if self.jwt_secret.is_empty() {
            return Err("JWT secret cannot be empty".to_string());
        }

        if INSECURE_JWT_SECRETS.contains(&self.jwt_secret.as_str()) {
            return Err(
                "JWT secret must not use default values. Please generate a secure random secret."
                    .to_string(),
            );
        }

        if self.jwt_secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_string());
        }

        if self.jwt_expiration < MIN_JWT_EXPIRATION {
            return Err("JWT expiration should be at least 5 minutes (300 seconds)".to_string());
        }

        if self.jwt_expiration > MAX_JWT_EXPIRATION {
            return Err("JWT expiration should not exceed 30 days".to_string());
        }

        if self.jwt_issuer.is_empty() {
            return Err("JWT issuer cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.buffer_size == 0 {
            return Err("Audit buffer size must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        Ok(())
    }
}
