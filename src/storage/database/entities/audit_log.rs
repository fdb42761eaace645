use crate::audit::{AuditEvent, AuditEventType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Persisted audit event
///
/// `user_id` carries no foreign key so the trail outlives deleted users.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub user_id: Option<i64>,

    pub actor_role: Option<String>,

    /// One of the closed `AuditEventType` names
    pub event_type: String,

    pub resource_type: Option<String>,

    pub resource_id: Option<String>,

    pub granted: bool,

    pub ip_address: Option<String>,

    pub details: Json,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert back to a domain event; `None` for an unknown event type
    pub fn to_event(&self) -> Option<AuditEvent> {
        let event_type: AuditEventType = self.event_type.parse().ok()?;
        Some(AuditEvent {
            user_id: self.user_id,
            actor_role: self.actor_role.clone(),
            event_type,
            resource_type: self.resource_type.clone(),
            resource_id: self.resource_id.clone(),
            granted: self.granted,
            ip: self.ip_address.clone(),
            timestamp: self.created_at.naive_utc().and_utc(),
            details: self.details.clone(),
        })
    }
}
