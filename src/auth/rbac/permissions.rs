//! Permission catalogue and the role → permission registry

use super::types::{Permission, PermissionSet, Role};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

// User management
pub const USER_CREATE: Permission = Permission::from_static("user:create");
pub const USER_READ: Permission = Permission::from_static("user:read");
pub const USER_UPDATE: Permission = Permission::from_static("user:update");
pub const USER_DELETE: Permission = Permission::from_static("user:delete");
pub const USER_LIST: Permission = Permission::from_static("user:list");
pub const USER_MANAGE_ROLES: Permission = Permission::from_static("user:manage_roles");

// Stores
pub const STORE_CREATE: Permission = Permission::from_static("store:create");
pub const STORE_READ: Permission = Permission::from_static("store:read");
pub const STORE_LIST: Permission = Permission::from_static("store:list");
pub const STORE_UPDATE: Permission = Permission::from_static("store:update");
pub const STORE_DELETE: Permission = Permission::from_static("store:delete");
pub const STORE_MANAGE_OWN: Permission = Permission::from_static("store:manage_own");
pub const STORE_VIEW_RATINGS: Permission = Permission::from_static("store:view_ratings");

// Ratings
pub const RATING_CREATE: Permission = Permission::from_static("rating:create");
pub const RATING_READ: Permission = Permission::from_static("rating:read");
pub const RATING_LIST: Permission = Permission::from_static("rating:list");
pub const RATING_UPDATE_OWN: Permission = Permission::from_static("rating:update_own");
pub const RATING_DELETE_OWN: Permission = Permission::from_static("rating:delete_own");
pub const RATING_DELETE: Permission = Permission::from_static("rating:delete");

// Own profile
pub const PROFILE_READ: Permission = Permission::from_static("profile:read");
pub const PROFILE_UPDATE: Permission = Permission::from_static("profile:update");
pub const PASSWORD_UPDATE: Permission = Permission::from_static("password:update");

// Dashboards, analytics and audit
pub const DASHBOARD_ADMIN: Permission = Permission::from_static("dashboard:admin");
pub const DASHBOARD_STORE_OWNER: Permission = Permission::from_static("dashboard:store_owner");
pub const ANALYTICS_VIEW_ALL: Permission = Permission::from_static("analytics:view_all");
pub const ANALYTICS_VIEW_OWN: Permission = Permission::from_static("analytics:view_own");
pub const AUDIT_READ: Permission = Permission::from_static("audit:read");

/// Fixed grants per role; the match keeps the mapping total over [`Role`]
fn default_grants(role: Role) -> Vec<Permission> {
    match role {
        Role::SystemAdmin => vec![
            USER_CREATE,
            USER_READ,
            USER_UPDATE,
            USER_DELETE,
            USER_LIST,
            USER_MANAGE_ROLES,
            STORE_CREATE,
            STORE_READ,
            STORE_LIST,
            STORE_UPDATE,
            STORE_DELETE,
            STORE_VIEW_RATINGS,
            RATING_READ,
            RATING_LIST,
            RATING_DELETE,
            PROFILE_READ,
            PROFILE_UPDATE,
            PASSWORD_UPDATE,
            DASHBOARD_ADMIN,
            ANALYTICS_VIEW_ALL,
            AUDIT_READ,
        ],
        Role::StoreOwner => vec![
            STORE_READ,
            STORE_LIST,
            STORE_MANAGE_OWN,
            STORE_VIEW_RATINGS,
            RATING_READ,
            PROFILE_READ,
            PROFILE_UPDATE,
            PASSWORD_UPDATE,
            DASHBOARD_STORE_OWNER,
            ANALYTICS_VIEW_OWN,
        ],
        Role::NormalUser => vec![
            STORE_READ,
            STORE_LIST,
            RATING_CREATE,
            RATING_READ,
            RATING_UPDATE_OWN,
            RATING_DELETE_OWN,
            PROFILE_READ,
            PROFILE_UPDATE,
            PASSWORD_UPDATE,
        ],
    }
}

/// Immutable role → permission mapping, built once per process
///
/// This is the only place permissions are granted. Unknown role names map
/// to the empty set.
#[derive(Debug, Clone)]
pub struct PermissionRegistry {
    grants: HashMap<Role, Arc<PermissionSet>>,
    empty: Arc<PermissionSet>,
}

impl PermissionRegistry {
    /// Build the registry from the fixed role grants
    pub fn new() -> Self {
        let grants: HashMap<Role, Arc<PermissionSet>> = Role::ALL
            .into_iter()
            .map(|role| (role, Arc::new(PermissionSet::new(default_grants(role)))))
            .collect();

        debug!(
            "Initialized permission registry with {} roles",
            grants.len()
        );

        Self {
            grants,
            empty: Arc::new(PermissionSet::default()),
        }
    }

    /// Complete permission set of a role
    pub fn permissions_for(&self, role: Role) -> Arc<PermissionSet> {
        self.grants
            .get(&role)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.empty))
    }

    /// Permission set for a raw role name; unknown names get the empty set
    pub fn permissions_for_name(&self, role: &str) -> Arc<PermissionSet> {
        match Role::parse(role) {
            Some(role) => self.permissions_for(role),
            None => Arc::clone(&self.empty),
        }
    }

    /// Every permission granted to at least one role, sorted
    pub fn all_permissions(&self) -> Vec<Permission> {
        self.grants
            .values()
            .flat_map(|set| set.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
