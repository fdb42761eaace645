//! RBAC type definitions

use crate::utils::error::{Result, StoreRateError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Identity class held by an actor, exactly one per actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrator
    SystemAdmin,
    /// Owner of one or more stores
    StoreOwner,
    /// Regular user who rates stores
    NormalUser,
}

impl Role {
    /// Every defined role, highest authority first
    pub const ALL: [Role; 3] = [Role::SystemAdmin, Role::StoreOwner, Role::NormalUser];

    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdmin => "system_admin",
            Role::StoreOwner => "store_owner",
            Role::NormalUser => "normal_user",
        }
    }

    /// Parse a wire name, `None` for anything that is not a defined role
    pub fn parse(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.as_str() == name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = StoreRateError;

    fn from_str(s: &str) -> Result<Self> {
        Role::parse(s).ok_or_else(|| StoreRateError::validation(format!("Unknown role: {}", s)))
    }
}

/// A discrete `resource:action` capability
///
/// Values are either one of the catalogue constants in
/// [`permissions`](super::permissions) or produced by [`Permission::parse`],
/// so a malformed identifier can never reach a permission set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub(crate) const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Validate and wrap a permission identifier
    ///
    /// Both halves must be non-empty and made of lowercase ascii letters,
    /// digits or `_`, separated by exactly one `:`.
    pub fn parse(id: &str) -> Result<Self> {
        let valid_part = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        };

        match id.split_once(':') {
            Some((resource, action)) if valid_part(resource) && valid_part(action) => {
                Ok(Self(Cow::Owned(id.to_string())))
            }
            _ => Err(StoreRateError::validation(format!(
                "Invalid permission identifier: {:?}",
                id
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resource half of the identifier
    pub fn resource(&self) -> &str {
        self.0.split_once(':').map(|(r, _)| r).unwrap_or_default()
    }

    /// Action half of the identifier
    pub fn action(&self) -> &str {
        self.0.split_once(':').map(|(_, a)| a).unwrap_or_default()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Permission {
    type Error = StoreRateError;

    fn try_from(value: String) -> Result<Self> {
        Permission::parse(&value)
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.0.into_owned()
    }
}

impl FromStr for Permission {
    type Err = StoreRateError;

    fn from_str(s: &str) -> Result<Self> {
        Permission::parse(s)
    }
}

/// Kind of resource an instance-level check applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceType {
    User,
    Profile,
    Store,
    Rating,
    /// Anything else; always denied by ownership checks
    Other(String),
}

impl ResourceType {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceType::User => "user",
            ResourceType::Profile => "profile",
            ResourceType::Store => "store",
            ResourceType::Rating => "rating",
            ResourceType::Other(name) => name,
        }
    }
}

impl From<&str> for ResourceType {
    fn from(value: &str) -> Self {
        match value {
            "user" => ResourceType::User,
            "profile" => ResourceType::Profile,
            "store" => ResourceType::Store,
            "rating" => ResourceType::Rating,
            other => ResourceType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of permissions granted to one role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
        }
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Lookup by raw identifier; malformed identifiers are simply absent
    pub fn contains_str(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p.as_str() == permission)
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Identifiers in a stable, sorted order
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.permissions.iter().map(|p| p.to_string()).collect();
        ids.sort();
        ids
    }
}
