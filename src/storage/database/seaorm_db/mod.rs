// Module declarations
mod audit_ops;
mod authorization;
mod connection;
mod rating_ops;
mod store_ops;
mod types;
mod user_ops;

// Re-export public types
pub use types::{DatabaseBackendType, DatabaseStats, SeaOrmDatabase};

use crate::utils::error::StoreRateError;
use sea_orm::{DbErr, SqlErr};

/// Unique index hits are the caller's problem, not an infrastructure failure
fn conflict_or_database(err: DbErr, message: &str) -> StoreRateError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreRateError::conflict(message),
        _ => StoreRateError::Database(err),
    }
}
