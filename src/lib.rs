//! # storerate
//!
//! Role-based access control for a store rating platform.
//!
//! ## Features
//!
//! - **Permission registry**: a fixed role → permission mapping built once
//! - **Role hierarchy**: ranked roles with pure "may manage" predicates
//! - **Ownership resolution**: instance-level checks against persistence
//! - **Authorization chain**: authenticate, attach permissions, enforce,
//!   as actix-web middleware that fails closed
//! - **Audit log**: every denial recorded once, off the request path
//!
//! ## Running the service
//!
//! ```rust,no_run
//! use storerate::{Config, StoreRate};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config/storerate.yaml").await?;
//!     let service = StoreRate::new(config).await?;
//!     service.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod audit;
pub mod auth;
pub mod config;
pub mod server;
pub mod storage;
#[cfg(test)]
mod testing;
pub mod utils;

// Re-export main types
pub use audit::{AuditEvent, AuditEventType, AuditLogger};
pub use auth::AuthSystem;
pub use auth::rbac::{Permission, RbacSystem, ResourceType, Role};
pub use config::Config;
pub use utils::error::{Result, StoreRateError};

use tracing::info;

/// The assembled service: configuration plus a ready HTTP server
pub struct StoreRate {
    config: Config,
    server: server::HttpServer,
}

impl StoreRate {
    /// Connect storage and build the server
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating storerate instance");

        let server = server::HttpServer::new(&config).await?;

        Ok(Self { config, server })
    }

    /// Run until shutdown
    pub async fn run(self) -> Result<()> {
        info!(
            "Starting storerate on {} ({:?} audit sink)",
            self.config.server().address(),
            self.config.audit().sink
        );

        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
