//! Helper functions for creating specific error types

use super::types::StoreRateError;

/// Helper functions for creating specific errors
impl StoreRateError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn unauthenticated<S: Into<String>>(message: S) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn infra<S: Into<String>>(message: S) -> Self {
        Self::Infra(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error comes from a failing collaborator rather than from
    /// the caller's input or credentials
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Infra(_) | Self::Io(_) | Self::Internal(_)
        )
    }
}
