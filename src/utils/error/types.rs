//! Error types for the service

use thiserror::Error;

/// Result type alias for the service
pub type Result<T> = std::result::Result<T, StoreRateError>;

/// Main error type for the service
///
/// The variants follow the authorization taxonomy: `Unauthenticated`,
/// `Forbidden` and the infrastructure family (`Database`, `Infra`,
/// `Internal`) which always fails closed.
#[derive(Error, Debug)]
pub enum StoreRateError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JWT encoding errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Missing, invalid or expired credential, or unresolvable actor
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Valid credential without the required role, permission or ownership
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A collaborator failed unexpectedly
    #[error("Infrastructure error: {0}")]
    Infra(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request clashes with existing state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
