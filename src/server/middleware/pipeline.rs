//! Authorization pipeline
//!
//! An ordered list of [`Stage`]s run by a fixed runner. Each stage either
//! passes the (possibly enriched) context on or terminates the request with
//! a [`Denial`]. The runner queues exactly one audit event per denial.

use super::context::AuthContext;
use crate::audit::{AuditEvent, AuditEventType, AuditLogger};
use crate::utils::error::ErrorResponse;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Terminal classification of a denial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    /// Missing, invalid or expired credential, or unresolvable actor
    Unauthenticated,
    /// Authenticated, but the required permission, ownership or role is absent
    Forbidden,
    /// A collaborator failed; access denied with a 500
    Infra,
}

impl DenialKind {
    pub fn status(&self) -> StatusCode {
        match self {
            DenialKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            DenialKind::Forbidden => StatusCode::FORBIDDEN,
            DenialKind::Infra => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DenialKind::Unauthenticated => "UNAUTHENTICATED",
            DenialKind::Forbidden => "FORBIDDEN",
            DenialKind::Infra => "INFRA_ERROR",
        }
    }
}

/// Why a request was stopped, and what gets audited for it
#[derive(Debug, Clone)]
pub struct Denial {
    pub kind: DenialKind,
    /// Client-facing message; never names the failed rule
    pub message: String,
    /// Internal reason, exposed only in development mode
    pub reason: String,
    pub event: AuditEvent,
}

impl Denial {
    /// Denial carrying an audit event pre-filled from `ctx`
    pub fn new(
        kind: DenialKind,
        event_type: AuditEventType,
        message: impl Into<String>,
        reason: impl Into<String>,
        ctx: &AuthContext,
    ) -> Self {
        let reason = reason.into();

        let mut event = AuditEvent::denied(event_type)
            .with_ip(ctx.ip.clone())
            .with_detail("reason", reason.clone())
            .with_detail("method", ctx.method.clone())
            .with_detail("path", ctx.path.clone());
        if let Some(request_id) = &ctx.request_id {
            event = event.with_detail("request_id", request_id.clone());
        }
        if let Some(actor) = &ctx.actor {
            event = event.with_actor(actor.id, actor.role.as_str());
        }

        Self {
            kind,
            message: message.into(),
            reason,
            event,
        }
    }

    pub fn unauthenticated(
        event_type: AuditEventType,
        message: impl Into<String>,
        reason: impl Into<String>,
        ctx: &AuthContext,
    ) -> Self {
        Self::new(DenialKind::Unauthenticated, event_type, message, reason, ctx)
    }

    /// Flat 403; the rule that failed goes into the audit details only
    pub fn forbidden(rule: &str, reason: impl Into<String>, ctx: &AuthContext) -> Self {
        Self::new(
            DenialKind::Forbidden,
            AuditEventType::AccessDenied,
            "Access denied",
            reason,
            ctx,
        )
        .with_detail("rule", rule)
    }

    pub fn infra(reason: impl Into<String>, ctx: &AuthContext) -> Self {
        Self::new(
            DenialKind::Infra,
            AuditEventType::AuthorizationError,
            "A backend service failed while processing the request",
            reason,
            ctx,
        )
    }

    /// Override the audited actor, for denials before an actor is resolved
    pub fn with_claimed_actor(mut self, user_id: i64, role: &str) -> Self {
        self.event = self.event.with_actor(user_id, role);
        self
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.event = self.event.with_detail(key, value);
        self
    }

    pub fn with_resource(mut self, resource_type: &str, resource_id: Option<String>) -> Self {
        self.event = self.event.with_resource(resource_type, resource_id);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// Render as the standard error body
    pub fn to_response(&self, dev_mode: bool, request_id: Option<String>) -> HttpResponse {
        let mut body =
            ErrorResponse::new(self.kind.code(), self.message.clone()).with_request_id(request_id);
        if dev_mode {
            body = body.with_details(self.reason.clone());
        }
        HttpResponse::build(self.status()).json(body)
    }
}

/// Result of one stage, or of the whole pipeline
#[derive(Debug)]
pub enum Outcome {
    Allow(AuthContext),
    Deny(Box<Denial>),
}

impl Outcome {
    pub fn deny(denial: Denial) -> Self {
        Outcome::Deny(Box::new(denial))
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Outcome::Allow(_))
    }
}

/// One step of the authorization state machine
#[async_trait]
pub trait Stage: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: AuthContext) -> Outcome;
}

/// Ordered stages plus the audit logger receiving denials
#[derive(Clone)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
    audit: AuditLogger,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl Pipeline {
    pub fn new(audit: AuditLogger) -> Self {
        Self {
            stages: Vec::new(),
            audit,
        }
    }

    /// Append a stage
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage in order, stopping at the first denial
    pub async fn run(&self, mut ctx: AuthContext) -> Outcome {
        for stage in &self.stages {
            match stage.run(ctx).await {
                Outcome::Allow(next) => ctx = next,
                Outcome::Deny(denial) => {
                    match denial.kind {
                        DenialKind::Infra => error!(
                            stage = stage.name(),
                            path = ?denial.event.detail("path"),
                            "Authorization failed closed: {}",
                            denial.reason
                        ),
                        _ => warn!(
                            stage = stage.name(),
                            user_id = ?denial.event.user_id,
                            event_type = denial.event.event_type.as_str(),
                            "Request denied: {}",
                            denial.reason
                        ),
                    }
                    self.audit.record(denial.event.clone());
                    return Outcome::Deny(denial);
                }
            }
        }

        debug!(
            user_id = ?ctx.actor.as_ref().map(|a| a.id),
            path = %ctx.path,
            "Request authorized"
        );
        Outcome::Allow(ctx)
    }
}
