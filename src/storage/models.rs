//! Persisted record shapes handed out by the storage layer

use crate::auth::rbac::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimal actor row resolved during authentication
///
/// The role is kept as stored; an unknown value fails authentication
/// instead of being coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Full user row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub role: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Store row together with its rating aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub owner_id: Option<i64>,
    pub average_rating: Option<f64>,
    pub rating_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Rating row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub id: i64,
    pub user_id: i64,
    pub store_id: i64,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub role: Role,
    pub password_hash: String,
}

/// Input for inserting a store
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub owner_id: Option<i64>,
}
