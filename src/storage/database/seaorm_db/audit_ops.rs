use crate::audit::{AuditEvent, AuditSink};
use crate::utils::error::Result;
use async_trait::async_trait;
use sea_orm::*;
use tracing::warn;

use super::super::entities::{self, audit_log};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Append one event to the audit table
    pub async fn insert_audit_event(&self, event: &AuditEvent) -> Result<()> {
        let active_model = audit_log::ActiveModel {
            user_id: Set(event.user_id),
            actor_role: Set(event.actor_role.clone()),
            event_type: Set(event.event_type.as_str().to_string()),
            resource_type: Set(event.resource_type.clone()),
            resource_id: Set(event.resource_id.clone()),
            granted: Set(event.granted),
            ip_address: Set(event.ip.clone()),
            details: Set(event.details.clone()),
            created_at: Set(event.timestamp.into()),
            ..Default::default()
        };

        entities::AuditLog::insert(active_model)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Most recent audit events, newest first
    pub async fn recent_audit_events(&self, limit: u64) -> Result<Vec<AuditEvent>> {
        let models = entities::AuditLog::find()
            .order_by_desc(audit_log::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models
            .iter()
            .filter_map(|m| {
                let event = m.to_event();
                if event.is_none() {
                    warn!("Skipping audit row {} with unknown type {}", m.id, m.event_type);
                }
                event
            })
            .collect())
    }

    /// Audit events concerning `user_id`, newest first
    pub async fn audit_events_for_user(&self, user_id: i64, limit: u64) -> Result<Vec<AuditEvent>> {
        let models = entities::AuditLog::find()
            .filter(audit_log::Column::UserId.eq(user_id))
            .order_by_desc(audit_log::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.iter().filter_map(audit_log::Model::to_event).collect())
    }
}

#[async_trait]
impl AuditSink for SeaOrmDatabase {
    async fn write(&self, event: &AuditEvent) -> Result<()> {
        self.insert_audit_event(event).await
    }
}
