//! Storage layer for the service
//!
//! This module provides the SeaORM-backed database and the narrow lookup
//! interface the authorization layer depends on.

/// Database storage module
pub mod database;
/// Persisted record shapes
pub mod models;

pub use database::{Database, DatabaseBackendType, DatabaseStats};

use crate::auth::rbac::Role;
use crate::utils::error::Result;
use async_trait::async_trait;
use models::{ActorRecord, StoreRecord, UserRecord};

/// Lookups consumed by authentication and ownership resolution
///
/// Implementations must keep "not found" (`Ok(None)` / `Ok(false)`) apart
/// from infrastructure failure (`Err`), since the two are denied with
/// different statuses.
#[async_trait]
pub trait AuthorizationStore: Send + Sync {
    /// Current state of the actor with `id`
    async fn find_actor(&self, id: i64) -> Result<Option<ActorRecord>>;

    /// Whether store `store_id` exists and is owned by `actor_id`
    async fn store_owned_by(&self, store_id: i64, actor_id: i64) -> Result<bool>;

    /// Whether rating `rating_id` exists and was created by `actor_id`
    async fn rating_created_by(&self, rating_id: i64, actor_id: i64) -> Result<bool>;

    async fn find_user(&self, id: i64) -> Result<Option<UserRecord>>;

    async fn find_store(&self, id: i64) -> Result<Option<StoreRecord>>;

    /// Persist a new role; `Ok(false)` when the actor does not exist
    async fn update_actor_role(&self, id: i64, role: Role) -> Result<bool>;
}
