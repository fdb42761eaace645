//! Test fixtures and data factories
//!
//! Provides factory methods for creating test data with sensible defaults.
//! All factories create real inputs for the storage layer, not mocks.

use storerate::auth::rbac::Role;
use storerate::storage::models::{NewStore, NewUser};
use uuid::Uuid;

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Factory for creating test users
pub struct UserFactory;

impl UserFactory {
    /// A user holding `role` with a unique email
    pub fn with_role(role: Role) -> NewUser {
        let id = short_id();
        NewUser {
            name: format!("Test User {}", id),
            email: format!("user-{}@example.com", id),
            address: Some("1 Test Street".to_string()),
            role,
            password_hash: "hashed_password".to_string(),
        }
    }

    pub fn admin() -> NewUser {
        Self::with_role(Role::SystemAdmin)
    }

    pub fn owner() -> NewUser {
        Self::with_role(Role::StoreOwner)
    }

    pub fn normal() -> NewUser {
        Self::with_role(Role::NormalUser)
    }

    /// A user with a specific email
    pub fn with_email(email: &str) -> NewUser {
        let mut user = Self::normal();
        user.email = email.to_string();
        user
    }
}

/// Factory for creating test stores
pub struct StoreFactory;

impl StoreFactory {
    pub fn owned_by(owner_id: Option<i64>) -> NewStore {
        let id = short_id();
        NewStore {
            name: format!("Store {}", id),
            email: format!("store-{}@example.com", id),
            address: Some("2 Market Road".to_string()),
            owner_id,
        }
    }
}
