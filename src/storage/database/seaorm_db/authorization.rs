use crate::auth::rbac::Role;
use crate::storage::AuthorizationStore;
use crate::storage::models::{ActorRecord, StoreRecord, UserRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use sea_orm::*;

use super::super::entities::{self, rating, store};
use super::types::SeaOrmDatabase;

#[async_trait]
impl AuthorizationStore for SeaOrmDatabase {
    async fn find_actor(&self, id: i64) -> Result<Option<ActorRecord>> {
        let model = entities::User::find_by_id(id).one(&self.db).await?;
        Ok(model.map(|m| m.to_actor_record()))
    }

    async fn store_owned_by(&self, store_id: i64, actor_id: i64) -> Result<bool> {
        let count = entities::Store::find()
            .filter(store::Column::Id.eq(store_id))
            .filter(store::Column::OwnerId.eq(actor_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn rating_created_by(&self, rating_id: i64, actor_id: i64) -> Result<bool> {
        let count = entities::Rating::find()
            .filter(rating::Column::Id.eq(rating_id))
            .filter(rating::Column::UserId.eq(actor_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn find_user(&self, id: i64) -> Result<Option<UserRecord>> {
        let model = entities::User::find_by_id(id).one(&self.db).await?;
        Ok(model.map(|m| m.to_user_record()))
    }

    async fn find_store(&self, id: i64) -> Result<Option<StoreRecord>> {
        self.load_store(id).await
    }

    async fn update_actor_role(&self, id: i64, role: Role) -> Result<bool> {
        self.update_role(id, role).await
    }
}
