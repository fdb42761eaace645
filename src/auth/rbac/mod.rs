//! Role-Based Access Control (RBAC) system
//!
//! This module provides the permission registry, the role hierarchy, the
//! pure authorization predicates and the view-level redaction helpers.

mod filter;
mod hierarchy;
pub mod permissions;
mod system;
mod types;

// Re-export public types and structs
pub use filter::{StoreView, UserView};
pub use hierarchy::RoleHierarchy;
pub use permissions::PermissionRegistry;
pub use system::RbacSystem;
pub use types::{Permission, PermissionSet, ResourceType, Role};
