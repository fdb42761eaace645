use sea_orm::DatabaseConnection;
use serde::Serialize;

/// SeaORM-based database implementation
#[derive(Debug, Clone)]
pub struct SeaOrmDatabase {
    pub(super) db: DatabaseConnection,
    /// Backend type indicator
    pub(super) backend_type: DatabaseBackendType,
}

/// Database backend type indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DatabaseBackendType {
    PostgreSQL,
    SQLite,
}

/// Row counts reported by the health endpoint
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatabaseStats {
    pub users: u64,
    pub stores: u64,
    pub ratings: u64,
    pub audit_events: u64,
}
