//! Resource ownership resolution
//!
//! Decides whether an actor owns a resource instance, doing at most one
//! persistence lookup. Lookup failures are returned as errors and must be
//! treated as a denial by the caller.

use super::rbac::ResourceType;
use crate::storage::AuthorizationStore;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::debug;

/// Resolves instance-level ownership against persistence
#[derive(Clone)]
pub struct OwnershipResolver {
    store: Arc<dyn AuthorizationStore>,
}

impl std::fmt::Debug for OwnershipResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipResolver").finish_non_exhaustive()
    }
}

impl OwnershipResolver {
    pub fn new(store: Arc<dyn AuthorizationStore>) -> Self {
        Self { store }
    }

    /// Whether `actor_id` owns resource `resource_id` of `resource_type`
    ///
    /// Users and profiles compare ids without I/O, stores and ratings look up
    /// the owning column, and anything else is denied.
    pub async fn owns(
        &self,
        resource_type: &ResourceType,
        resource_id: i64,
        actor_id: i64,
    ) -> Result<bool> {
        let owned = match resource_type {
            ResourceType::User | ResourceType::Profile => resource_id == actor_id,
            ResourceType::Store => self.store.store_owned_by(resource_id, actor_id).await?,
            ResourceType::Rating => self.store.rating_created_by(resource_id, actor_id).await?,
            ResourceType::Other(name) => {
                debug!("No ownership rule for resource type {}, denying", name);
                false
            }
        };

        debug!(
            "Ownership of {} {} by actor {}: {}",
            resource_type, resource_id, actor_id, owned
        );
        Ok(owned)
    }
}
