use crate::storage::models::RatingRecord;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rating database model
///
/// One rating per user and store, enforced by a unique index.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ratings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Author of the rating
    pub user_id: i64,

    pub store_id: i64,

    /// Score between 1 and 5
    pub rating: i32,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

/// Rating entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id",
        on_delete = "Cascade"
    )]
    Store,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for RatingRecord {
    fn from(model: Model) -> Self {
        RatingRecord {
            id: model.id,
            user_id: model.user_id,
            store_id: model.store_id,
            rating: model.rating,
            created_at: model.created_at.naive_utc().and_utc(),
            updated_at: model.updated_at.naive_utc().and_utc(),
        }
    }
}
