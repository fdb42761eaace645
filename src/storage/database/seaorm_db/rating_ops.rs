use crate::storage::models::RatingRecord;
use crate::utils::error::{Result, StoreRateError};
use chrono::Utc;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, rating};
use super::conflict_or_database;
use super::types::SeaOrmDatabase;

/// Accepted rating scores
pub const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

fn check_score(score: i32) -> Result<()> {
    if RATING_RANGE.contains(&score) {
        Ok(())
    } else {
        Err(StoreRateError::validation(format!(
            "Rating must be between {} and {}",
            RATING_RANGE.start(),
            RATING_RANGE.end()
        )))
    }
}

impl SeaOrmDatabase {
    /// Submit a rating for a store
    ///
    /// A second rating by the same user for the same store is a conflict.
    pub async fn insert_rating(&self, user_id: i64, store_id: i64, score: i32) -> Result<RatingRecord> {
        check_score(score)?;
        debug!("User {} rating store {}: {}", user_id, store_id, score);

        let now = Utc::now();
        let active_model = rating::ActiveModel {
            user_id: Set(user_id),
            store_id: Set(store_id),
            rating: Set(score),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_or_database(e, "Store already rated by this user"))?;
        Ok(model.into())
    }

    /// Change the score of an existing rating
    pub async fn update_rating(&self, rating_id: i64, score: i32) -> Result<RatingRecord> {
        check_score(score)?;

        let mut model: rating::ActiveModel = entities::Rating::find_by_id(rating_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreRateError::not_found(format!("Rating {} not found", rating_id)))?
            .into();

        model.rating = Set(score);
        model.updated_at = Set(Utc::now().into());
        let model = model.update(&self.db).await?;

        debug!("Updated rating {} to {}", rating_id, score);
        Ok(model.into())
    }
}
