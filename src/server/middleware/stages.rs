//! Authorization stages
//!
//! `Authenticate` and `AttachPermissions` always run first; one or more
//! enforcement stages follow.

use super::context::AuthContext;
use super::pipeline::{Denial, Outcome, Stage};
use crate::audit::AuditEventType;
use crate::auth::jwt::{CredentialError, JwtHandler};
use crate::auth::ownership::OwnershipResolver;
use crate::auth::rbac::{Permission, RbacSystem, ResourceType, Role};
use crate::auth::types::Actor;
use crate::storage::AuthorizationStore;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Stage 1: verify the bearer credential and resolve the actor's current state
pub struct Authenticate {
    pub jwt: Arc<JwtHandler>,
    pub store: Arc<dyn AuthorizationStore>,
}

#[async_trait]
impl Stage for Authenticate {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    async fn run(&self, mut ctx: AuthContext) -> Outcome {
        let Some(token) = ctx.bearer.as_deref() else {
            return Outcome::deny(Denial::unauthenticated(
                AuditEventType::MissingToken,
                "Authentication required",
                "no bearer credential",
                &ctx,
            ));
        };

        let claims = match self.jwt.verify_token(token) {
            Ok(claims) => claims,
            Err(CredentialError::Expired) => {
                return Outcome::deny(Denial::unauthenticated(
                    AuditEventType::TokenExpired,
                    "Token has expired",
                    "credential expired",
                    &ctx,
                ));
            }
            Err(CredentialError::Invalid(reason)) => {
                return Outcome::deny(Denial::unauthenticated(
                    AuditEventType::InvalidToken,
                    "Invalid token",
                    format!("credential rejected: {}", reason),
                    &ctx,
                ));
            }
        };

        let record = match self.store.find_actor(claims.sub).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                return Outcome::deny(
                    Denial::unauthenticated(
                        AuditEventType::InvalidToken,
                        "Invalid token",
                        format!("actor {} no longer exists", claims.sub),
                        &ctx,
                    )
                    .with_claimed_actor(claims.sub, &claims.role),
                );
            }
            Err(e) => {
                return Outcome::deny(
                    Denial::infra(format!("actor lookup failed: {}", e), &ctx)
                        .with_claimed_actor(claims.sub, &claims.role),
                );
            }
        };

        let stored_role = record.role.clone();
        let Some(actor) = Actor::from_record(record) else {
            return Outcome::deny(
                Denial::unauthenticated(
                    AuditEventType::InvalidToken,
                    "Invalid token",
                    format!("actor {} has undefined role {:?}", claims.sub, stored_role),
                    &ctx,
                )
                .with_claimed_actor(claims.sub, &claims.role),
            );
        };

        if actor.role.as_str() != claims.role {
            return Outcome::deny(
                Denial::unauthenticated(
                    AuditEventType::InvalidToken,
                    "Invalid token",
                    format!(
                        "role claim {:?} does not match current role {}",
                        claims.role, actor.role
                    ),
                    &ctx,
                )
                .with_claimed_actor(claims.sub, &claims.role),
            );
        }

        debug!("Authenticated actor {} as {}", actor.id, actor.role);
        ctx.actor = Some(actor);
        Outcome::Allow(ctx)
    }
}

/// Stage 2: compute the actor's permission set once per request
pub struct AttachPermissions {
    pub rbac: Arc<RbacSystem>,
}

#[async_trait]
impl Stage for AttachPermissions {
    fn name(&self) -> &'static str {
        "attach_permissions"
    }

    async fn run(&self, mut ctx: AuthContext) -> Outcome {
        let Some(role) = ctx.actor.as_ref().map(|a| a.role) else {
            return Outcome::deny(unresolved_actor(&ctx));
        };
        ctx.permissions = Some(self.rbac.permissions_for(role));
        Outcome::Allow(ctx)
    }
}

/// Stage 3: require a single permission
pub struct RequirePermission {
    pub rbac: Arc<RbacSystem>,
    pub permission: Permission,
}

#[async_trait]
impl Stage for RequirePermission {
    fn name(&self) -> &'static str {
        "require_permission"
    }

    async fn run(&self, ctx: AuthContext) -> Outcome {
        let Some(actor) = &ctx.actor else {
            return Outcome::deny(unresolved_actor(&ctx));
        };

        let granted = match &ctx.permissions {
            Some(permissions) => permissions.contains(&self.permission),
            None => self.rbac.has_permission(actor.role, &self.permission),
        };

        if granted {
            debug!("Actor {} holds {}", actor.id, self.permission);
            return Outcome::Allow(ctx);
        }

        Outcome::deny(
            Denial::forbidden(
                "permission",
                format!("{} lacks {}", actor.role, self.permission),
                &ctx,
            )
            .with_detail("required", self.permission.as_str()),
        )
    }
}

/// Stage 3: require ownership of the `{id}` resource
///
/// The top-authority role bypasses the check. A missing resource and a
/// resource owned by someone else deny identically.
pub struct RequireOwnership {
    pub rbac: Arc<RbacSystem>,
    pub ownership: OwnershipResolver,
    pub resource_type: ResourceType,
}

#[async_trait]
impl Stage for RequireOwnership {
    fn name(&self) -> &'static str {
        "require_ownership"
    }

    async fn run(&self, ctx: AuthContext) -> Outcome {
        let Some(actor) = &ctx.actor else {
            return Outcome::deny(unresolved_actor(&ctx));
        };

        if self.rbac.is_top_authority(actor.role) {
            debug!("Ownership check bypassed for {}", actor.role);
            return Outcome::Allow(ctx);
        }

        let resource_type = self.resource_type.as_str();
        let raw_id = ctx.resource_id.clone();
        let Some(resource_id) = raw_id.as_deref().and_then(|id| id.parse::<i64>().ok()) else {
            return Outcome::deny(
                Denial::forbidden(
                    "ownership",
                    format!("unusable {} id {:?}", resource_type, raw_id),
                    &ctx,
                )
                .with_resource(resource_type, raw_id),
            );
        };

        match self
            .ownership
            .owns(&self.resource_type, resource_id, actor.id)
            .await
        {
            Ok(true) => Outcome::Allow(ctx),
            Ok(false) => Outcome::deny(
                Denial::forbidden(
                    "ownership",
                    format!(
                        "actor {} does not own {} {}",
                        actor.id, resource_type, resource_id
                    ),
                    &ctx,
                )
                .with_resource(resource_type, raw_id),
            ),
            Err(e) => Outcome::deny(
                Denial::infra(format!("ownership lookup failed: {}", e), &ctx)
                    .with_resource(resource_type, raw_id),
            ),
        }
    }
}

/// Stage 3 (legacy): require the actor's role to be one of `roles`
pub struct RequireRole {
    pub roles: Vec<Role>,
}

#[async_trait]
impl Stage for RequireRole {
    fn name(&self) -> &'static str {
        "require_role"
    }

    async fn run(&self, ctx: AuthContext) -> Outcome {
        let Some(actor) = &ctx.actor else {
            return Outcome::deny(unresolved_actor(&ctx));
        };

        if self.roles.contains(&actor.role) {
            return Outcome::Allow(ctx);
        }

        let allowed: Vec<&str> = self.roles.iter().map(|r| r.as_str()).collect();
        Outcome::deny(Denial::forbidden(
            "role",
            format!("{} not in [{}]", actor.role, allowed.join(", ")),
            &ctx,
        ))
    }
}

/// An enforcement stage ran without a resolved actor; fail closed
fn unresolved_actor(ctx: &AuthContext) -> Denial {
    Denial::unauthenticated(
        AuditEventType::MissingToken,
        "Authentication required",
        "no authenticated actor in context",
        ctx,
    )
}
