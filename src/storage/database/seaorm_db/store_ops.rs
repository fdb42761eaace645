use crate::storage::models::{NewStore, StoreRecord};
use crate::utils::error::Result;
use chrono::Utc;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, rating, store};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Create a new store
    pub async fn insert_store(&self, new_store: NewStore) -> Result<StoreRecord> {
        debug!("Creating store: {}", new_store.name);

        let now = Utc::now();
        let active_model = store::ActiveModel {
            name: Set(new_store.name),
            email: Set(new_store.email),
            address: Set(new_store.address),
            owner_id: Set(new_store.owner_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(model.to_store_record(None, 0))
    }

    /// Store with its rating aggregate
    pub(super) async fn load_store(&self, store_id: i64) -> Result<Option<StoreRecord>> {
        let Some(model) = entities::Store::find_by_id(store_id).one(&self.db).await? else {
            return Ok(None);
        };

        let scores: Vec<i32> = entities::Rating::find()
            .filter(rating::Column::StoreId.eq(store_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|r| r.rating)
            .collect();

        let count = scores.len() as i64;
        let average = (count > 0)
            .then(|| scores.iter().map(|&s| f64::from(s)).sum::<f64>() / count as f64);

        Ok(Some(model.to_store_record(average, count)))
    }

    /// Stores owned by `owner_id`
    pub async fn list_stores_by_owner(&self, owner_id: i64) -> Result<Vec<StoreRecord>> {
        let models = entities::Store::find()
            .filter(store::Column::OwnerId.eq(owner_id))
            .order_by_asc(store::Column::Id)
            .all(&self.db)
            .await?;

        let mut records = Vec::with_capacity(models.len());
        for model in models {
            if let Some(record) = self.load_store(model.id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }
}
