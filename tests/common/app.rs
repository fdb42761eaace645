//! Fully wired application for HTTP-level tests
//!
//! Builds the same state `HttpServer::new` does, around a seeded in-memory
//! database, with audit events written to the `audit_logs` table.

use super::database::{Seed, TestDatabase, test_db_config};
use actix_web::web;
use storerate::audit::AuditEvent;
use storerate::auth::rbac::Role;
use storerate::config::{AuditSinkKind, Config};
use storerate::server::{AppState, HttpServer};
use storerate::storage::models::UserRecord;

/// Seeded database plus the state handed to `HttpServer::create_app`
pub struct TestApp {
    pub db: TestDatabase,
    pub seed: Seed,
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let (db, seed) = TestDatabase::seeded().await;
        let state = web::Data::new(HttpServer::build_state(&config, db.db_arc()));
        Self { db, seed, state }
    }

    /// Access token carrying the user's stored role
    pub fn token_for(&self, user: &UserRecord) -> String {
        let role = Role::parse(&user.role).expect("seeded users hold defined roles");
        self.state
            .auth
            .jwt()
            .create_access_token(user.id, role)
            .expect("Failed to sign test token")
    }

    /// `Authorization` header for `user`
    pub fn bearer(&self, user: &UserRecord) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token_for(user)))
    }

    /// Every persisted audit event, newest first
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.state.auth.audit().flush().await;
        self.db
            .db()
            .recent_audit_events(500)
            .await
            .expect("Failed to read audit events")
    }
}

/// Defaults with an in-memory database and the database audit sink
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.app.storage.database = test_db_config();
    config.app.audit.sink = AuditSinkKind::Database;
    config
}
