//! Audit sinks

use super::types::AuditEvent;
use crate::utils::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Append-only write target for audit events
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn write(&self, event: &AuditEvent) -> Result<()>;
}

/// Sink emitting one structured log line per event on `storerate::audit`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn write(&self, event: &AuditEvent) -> Result<()> {
        info!(
            target: "storerate::audit",
            event_type = event.event_type.as_str(),
            user_id = ?event.user_id,
            actor_role = ?event.actor_role,
            resource_type = ?event.resource_type,
            resource_id = ?event.resource_id,
            granted = event.granted,
            ip = ?event.ip,
            timestamp = %event.timestamp.to_rfc3339(),
            details = %event.details,
            "audit event"
        );
        Ok(())
    }
}
