//! Audit log configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Where audit events are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// The `audit_logs` table
    #[default]
    Database,
    /// Structured log lines on the `storerate::audit` target
    Log,
}

/// Audit log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Sink receiving audit events
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Capacity of the queue between request handlers and the writer task
    #[serde(default = "default_audit_buffer_size")]
    pub buffer_size: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            sink: AuditSinkKind::default(),
            buffer_size: default_audit_buffer_size(),
        }
    }
}
