use crate::storage::models::StoreRecord;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Store database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    pub address: Option<String>,

    /// Owning user; unowned stores are managed by administrators only
    pub owner_id: Option<i64>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

/// Store entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Owner,

    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Combine with the rating aggregate into a record
    pub fn to_store_record(&self, average_rating: Option<f64>, rating_count: i64) -> StoreRecord {
        StoreRecord {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            owner_id: self.owner_id,
            average_rating,
            rating_count,
            created_at: self.created_at.naive_utc().and_utc(),
        }
    }
}
