//! Authorization predicates
//!
//! Every predicate is pure and total: unknown roles, malformed permission
//! identifiers and undefined ranks all decide `false`.

use super::hierarchy::RoleHierarchy;
use super::permissions::PermissionRegistry;
use super::types::{Permission, PermissionSet, ResourceType, Role};
use std::sync::Arc;
use tracing::info;

/// RBAC system holding the permission registry and the role hierarchy
///
/// Built once at startup and shared behind an `Arc`; it has no interior
/// mutability, so concurrent readers need no locking.
#[derive(Debug, Clone)]
pub struct RbacSystem {
    registry: PermissionRegistry,
    hierarchy: RoleHierarchy,
}

impl RbacSystem {
    /// Create the RBAC system with the built-in grants and ranks
    pub fn new() -> Self {
        info!("Initializing RBAC system");
        Self::with_parts(PermissionRegistry::new(), RoleHierarchy::default())
    }

    pub fn with_parts(registry: PermissionRegistry, hierarchy: RoleHierarchy) -> Self {
        Self {
            registry,
            hierarchy,
        }
    }

    pub fn registry(&self) -> &PermissionRegistry {
        &self.registry
    }

    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.hierarchy
    }

    /// Permission set of a role, shared rather than copied
    pub fn permissions_for(&self, role: Role) -> Arc<PermissionSet> {
        self.registry.permissions_for(role)
    }

    /// Whether `role` is the top-authority role of the hierarchy
    pub fn is_top_authority(&self, role: Role) -> bool {
        self.hierarchy.top() == Some(role)
    }

    pub fn has_permission(&self, role: Role, permission: &Permission) -> bool {
        self.registry.permissions_for(role).contains(permission)
    }

    /// At least one of `permissions`; an empty list is never satisfied
    pub fn has_any_permission(&self, role: Role, permissions: &[Permission]) -> bool {
        let granted = self.registry.permissions_for(role);
        permissions.iter().any(|p| granted.contains(p))
    }

    /// Every one of `permissions`; an empty list is vacuously satisfied
    pub fn has_all_permissions(&self, role: Role, permissions: &[Permission]) -> bool {
        let granted = self.registry.permissions_for(role);
        permissions.iter().all(|p| granted.contains(p))
    }

    pub fn has_permission_named(&self, role: &str, permission: &str) -> bool {
        self.registry
            .permissions_for_name(role)
            .contains_str(permission)
    }

    pub fn has_any_permission_named(&self, role: &str, permissions: &[&str]) -> bool {
        let granted = self.registry.permissions_for_name(role);
        permissions.iter().any(|p| granted.contains_str(p))
    }

    pub fn has_all_permissions_named(&self, role: &str, permissions: &[&str]) -> bool {
        let granted = self.registry.permissions_for_name(role);
        permissions.iter().all(|p| granted.contains_str(p))
    }

    /// `manager` may manage `target` iff it strictly outranks it
    pub fn can_manage_user(&self, manager: Role, target: Role) -> bool {
        self.hierarchy.outranks(manager, target)
    }

    pub fn can_manage_user_named(&self, manager: &str, target: &str) -> bool {
        match (Role::parse(manager), Role::parse(target)) {
            (Some(manager), Some(target)) => self.can_manage_user(manager, target),
            _ => false,
        }
    }

    /// Only the top-authority role assigns roles, and only defined ones
    pub fn can_assign_role(&self, assigner: Role, _target: Role) -> bool {
        self.is_top_authority(assigner)
    }

    pub fn can_assign_role_named(&self, assigner: &str, target: &str) -> bool {
        match (Role::parse(assigner), Role::parse(target)) {
            (Some(assigner), Some(target)) => self.can_assign_role(assigner, target),
            _ => false,
        }
    }

    /// Instance-level access given known ownership
    ///
    /// The top-authority role is always allowed, an actor always reaches its
    /// own resources, and store owners may read any store.
    pub fn can_access_resource_by_ownership(
        &self,
        role: Role,
        actor_id: i64,
        resource_owner_id: i64,
        resource_type: &ResourceType,
    ) -> bool {
        if self.is_top_authority(role) {
            return true;
        }

        if actor_id == resource_owner_id {
            return true;
        }

        role == Role::StoreOwner && *resource_type == ResourceType::Store
    }

    pub fn can_access_resource_by_ownership_named(
        &self,
        role: &str,
        actor_id: i64,
        resource_owner_id: i64,
        resource_type: &str,
    ) -> bool {
        match Role::parse(role) {
            Some(role) => self.can_access_resource_by_ownership(
                role,
                actor_id,
                resource_owner_id,
                &ResourceType::from(resource_type),
            ),
            None => false,
        }
    }
}

impl Default for RbacSystem {
    fn default() -> Self {
        Self::new()
    }
}
