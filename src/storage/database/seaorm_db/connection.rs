use crate::config::DatabaseConfig;
use crate::utils::error::{Result, StoreRateError};
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::super::entities;
use super::super::migration::Migrator;
use super::types::{DatabaseBackendType, DatabaseStats, SeaOrmDatabase};

impl SeaOrmDatabase {
    /// Create a new database connection
    ///
    /// A failing database is reported, never replaced by another backend.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let backend_type = if config.url.starts_with("sqlite") {
            DatabaseBackendType::SQLite
        } else {
            DatabaseBackendType::PostgreSQL
        };

        let db = Self::try_connect(config).await?;
        info!("Database connection established ({:?})", backend_type);
        Ok(Self { db, backend_type })
    }

    /// Try to connect to a database
    async fn try_connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(config.url.clone());
        opt.connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(30))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        if config.is_in_memory() {
            // Every connection to `:memory:` opens a fresh database
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(config.max_connections)
                .min_connections(1)
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(3600));
        }

        Database::connect(opt).await.map_err(StoreRateError::Database)
    }

    /// Get the current backend type
    pub fn backend_type(&self) -> DatabaseBackendType {
        self.backend_type
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            StoreRateError::Database(e)
        })?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying database connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Close the database connection
    pub async fn close(self) -> Result<()> {
        self.db.close().await.map_err(StoreRateError::Database)?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        debug!("Performing database health check");

        self.db.ping().await.map_err(StoreRateError::Database)?;

        debug!("Database health check passed");
        Ok(())
    }

    /// Row counts of every table
    pub async fn stats(&self) -> Result<DatabaseStats> {
        Ok(DatabaseStats {
            users: entities::User::find().count(&self.db).await?,
            stores: entities::Store::find().count(&self.db).await?,
            ratings: entities::Rating::find().count(&self.db).await?,
            audit_events: entities::AuditLog::find().count(&self.db).await?,
        })
    }
}
