//! Authentication and authorization types

use super::rbac::Role;
use crate::storage::models::ActorRecord;
use serde::{Deserialize, Serialize};

/// The authenticated caller of a request
///
/// Always resolved from persistence, never from token claims alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Actor {
    /// Build from a persisted row; `None` when the stored role is not defined
    pub fn from_record(record: ActorRecord) -> Option<Self> {
        let role = Role::parse(&record.role)?;
        Some(Self {
            id: record.id,
            name: record.name,
            email: record.email,
            role,
        })
    }
}
