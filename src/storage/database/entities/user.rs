use crate::storage::models::{ActorRecord, UserRecord};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    /// Email address (unique)
    #[sea_orm(unique)]
    pub email: String,

    pub address: Option<String>,

    /// Opaque credential hash; never interpreted here
    pub password_hash: String,

    /// Role name as stored; may be a value the RBAC model does not define
    pub role: String,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

/// User entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Stores owned by the user
    #[sea_orm(has_many = "super::store::Entity")]
    Stores,

    /// Ratings submitted by the user
    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stores.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_actor_record(&self) -> ActorRecord {
        ActorRecord {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }

    pub fn to_user_record(&self) -> UserRecord {
        UserRecord {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            role: self.role.clone(),
            password_hash: self.password_hash.clone(),
            created_at: self.created_at.naive_utc().and_utc(),
        }
    }
}
