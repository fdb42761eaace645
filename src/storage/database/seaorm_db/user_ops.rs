use crate::auth::rbac::Role;
use crate::storage::models::{NewUser, UserRecord};
use crate::utils::error::Result;
use chrono::Utc;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, user};
use super::conflict_or_database;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Create a new user
    pub async fn insert_user(&self, new_user: NewUser) -> Result<UserRecord> {
        debug!("Creating user: {}", new_user.email);

        let now = Utc::now();
        let active_model = user::ActiveModel {
            name: Set(new_user.name),
            email: Set(new_user.email),
            address: Set(new_user.address),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.as_str().to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_or_database(e, "Email already registered"))?;
        Ok(model.to_user_record())
    }

    pub(super) async fn update_role(&self, user_id: i64, role: Role) -> Result<bool> {
        let Some(model) = entities::User::find_by_id(user_id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut model: user::ActiveModel = model.into();
        model.role = Set(role.as_str().to_string());
        model.updated_at = Set(Utc::now().into());
        model.update(&self.db).await?;

        debug!("Updated role of user {} to {}", user_id, role);
        Ok(true)
    }
}
