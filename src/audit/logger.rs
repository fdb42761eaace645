//! Non-blocking audit logger
//!
//! Request handlers hand events to a bounded queue; a background task drains
//! it into the configured [`AuditSink`]. Neither a full queue nor a failing
//! sink is ever reported back to the request. Both go to the operational
//! error channel instead.

use super::sink::AuditSink;
use super::types::{AuditEvent, AuditEventType};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

/// Target of the operational error channel, distinct from the audit log
pub const OPERATIONAL_TARGET: &str = "storerate::audit::operational";

enum Command {
    Record(Box<AuditEvent>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the audit writer task
#[derive(Clone)]
pub struct AuditLogger {
    sender: mpsc::Sender<Command>,
    dropped: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("dropped", &self.dropped_events())
            .field("failed", &self.failed_writes())
            .finish()
    }
}

impl AuditLogger {
    /// Spawn the writer task; must be called inside a tokio runtime
    pub fn new(sink: Arc<dyn AuditSink>, buffer_size: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<Command>(buffer_size.max(1));
        let failed = Arc::new(AtomicU64::new(0));

        let failed_writes = failed.clone();
        tokio::spawn(async move {
            while let Some(command) = receiver.recv().await {
                match command {
                    Command::Record(event) => {
                        if let Err(e) = sink.write(&event).await {
                            failed_writes.fetch_add(1, Ordering::Relaxed);
                            error!(
                                target: OPERATIONAL_TARGET,
                                event_type = event.event_type.as_str(),
                                user_id = ?event.user_id,
                                "Failed to write audit event: {}",
                                e
                            );
                        }
                    }
                    Command::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            debug!("Audit writer task stopped");
        });

        Self {
            sender,
            dropped: Arc::new(AtomicU64::new(0)),
            failed,
        }
    }

    /// Queue an event without waiting for it to be written
    pub fn record(&self, event: AuditEvent) {
        match self.sender.try_send(Command::Record(Box::new(event))) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(Command::Record(event))) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                error!(
                    target: OPERATIONAL_TARGET,
                    event_type = event.event_type.as_str(),
                    user_id = ?event.user_id,
                    "Audit buffer full, event dropped"
                );
            }
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                error!(target: OPERATIONAL_TARGET, "Audit writer task is gone, event dropped");
            }
        }
    }

    /// `record(eventType, actorId, details)` shorthand
    pub fn log(&self, event_type: AuditEventType, user_id: Option<i64>, details: serde_json::Value) {
        let mut event = AuditEvent::of(event_type).with_user_id(user_id);
        event.details = details;
        self.record(event);
    }

    /// Wait until every event queued before this call has been handled
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.sender.send(Command::Flush(done)).await.is_err() {
            return;
        }
        let _ = wait.await;
    }

    /// Events lost to a full queue or a stopped writer
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Events the sink refused
    pub fn failed_writes(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}
