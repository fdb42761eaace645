//! Audit/security event log
//!
//! Append-only record of authentication failures, access denials and
//! sensitive actions.

mod logger;
mod sink;
mod types;

pub use logger::{AuditLogger, OPERATIONAL_TARGET};
pub use sink::{AuditSink, TracingAuditSink};
pub use types::{AuditEvent, AuditEventType};
