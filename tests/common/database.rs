//! Test database utilities
//!
//! Provides in-memory SQLite database for testing without external dependencies.
//! Each test gets an isolated database instance using SeaORM.

use super::fixtures::{StoreFactory, UserFactory};
use sea_orm::ConnectionTrait;
use storerate::config::DatabaseConfig;
use storerate::storage::Database;
use storerate::storage::models::{RatingRecord, StoreRecord, UserRecord};
use std::sync::Arc;

/// Test database wrapper providing isolated in-memory SQLite instances
#[derive(Debug, Clone)]
pub struct TestDatabase {
    inner: Arc<Database>,
}

/// Rows inserted by [`TestDatabase::seeded`]
#[derive(Debug, Clone)]
pub struct Seed {
    pub admin: UserRecord,
    pub owner: UserRecord,
    pub alice: UserRecord,
    pub bob: UserRecord,
    /// Owned by `owner`
    pub store: StoreRecord,
    /// Bob's rating of `store`
    pub bob_rating: RatingRecord,
}

impl TestDatabase {
    /// Create a new migrated in-memory test database
    ///
    /// Each call creates a completely isolated database instance.
    pub async fn new() -> Self {
        let db = Database::new(&test_db_config())
            .await
            .expect("Failed to create in-memory test database");

        db.migrate()
            .await
            .expect("Failed to run database migrations");

        Self {
            inner: Arc::new(db),
        }
    }

    /// Create a test database with seeded data
    pub async fn seeded() -> (Self, Seed) {
        let db = Self::new().await;
        let seed = db.seed_test_data().await;
        (db, seed)
    }

    /// Get reference to the underlying database
    pub fn db(&self) -> &Database {
        &self.inner
    }

    /// Get Arc to the underlying database
    pub fn db_arc(&self) -> Arc<Database> {
        Arc::clone(&self.inner)
    }

    /// Overwrite a stored role with any string, bypassing the closed role set
    pub async fn set_raw_role(&self, user_id: i64, role: &str) {
        self.db()
            .connection()
            .execute_unprepared(&format!(
                "UPDATE users SET role = '{}' WHERE id = {}",
                role, user_id
            ))
            .await
            .expect("Failed to overwrite role");
    }

    async fn seed_test_data(&self) -> Seed {
        let db = self.db();
        let admin = db.insert_user(UserFactory::admin()).await.unwrap();
        let owner = db.insert_user(UserFactory::owner()).await.unwrap();
        let alice = db.insert_user(UserFactory::normal()).await.unwrap();
        let bob = db.insert_user(UserFactory::normal()).await.unwrap();

        let store = db
            .insert_store(StoreFactory::owned_by(Some(owner.id)))
            .await
            .unwrap();
        let bob_rating = db.insert_rating(bob.id, store.id, 4).await.unwrap();

        Seed {
            admin,
            owner,
            alice,
            bob,
            store,
            bob_rating,
        }
    }
}

/// Helper to create a simple test database config
pub fn test_db_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        // In-memory DB only supports 1 connection
        max_connections: 1,
        connection_timeout: 5,
        auto_migrate: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_creation() {
        let db = TestDatabase::new().await;
        assert!(db.db().health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_seeded_database() {
        let (db, seed) = TestDatabase::seeded().await;
        let stats = db.db().stats().await.unwrap();

        assert_eq!(stats.users, 4);
        assert_eq!(stats.stores, 1);
        assert_eq!(stats.ratings, 1);
        assert_eq!(seed.store.owner_id, Some(seed.owner.id));
    }
}
