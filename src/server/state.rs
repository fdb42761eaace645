//! Application state shared across HTTP handlers

use crate::auth::AuthSystem;
use crate::config::Config;
use crate::storage::Database;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc for efficient sharing across workers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// Authentication and authorization system
    pub auth: Arc<AuthSystem>,
    /// Storage layer
    pub db: Arc<Database>,
    started_at: Instant,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config, auth: AuthSystem, db: Arc<Database>) -> Self {
        Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            db,
            started_at: Instant::now(),
        }
    }

    /// Get service configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Time since the state was built
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
