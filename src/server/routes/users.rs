//! User endpoints

use crate::audit::{AuditEvent, AuditEventType};
use crate::auth::AuthSystem;
use crate::auth::rbac::permissions::USER_MANAGE_ROLES;
use crate::auth::rbac::{ResourceType, Role};
use crate::auth::types::Actor;
use crate::server::middleware::{client_ip, request_id};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::storage::AuthorizationStore;
use crate::utils::error::{Result, StoreRateError};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::{info, warn};

/// Configure user routes
///
/// Ownership guards sit on resources so the `{id}` segment is matched
/// before they run.
pub fn configure_routes(cfg: &mut web::ServiceConfig, auth: &AuthSystem) {
    cfg.service(
        web::resource("/api/users/{id}")
            .wrap(auth.require_ownership(ResourceType::User))
            .route(web::get().to(get_user)),
    )
    .service(
        web::resource("/api/users/{id}/role")
            .wrap(auth.require_permission(USER_MANAGE_ROLES))
            .route(web::put().to(change_role)),
    );
}

/// Role change request body
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

/// Fetch a user as seen by the caller
async fn get_user(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let record = state
        .db
        .find_user(user_id)
        .await?
        .ok_or_else(|| StoreRateError::not_found("User not found"))?;

    let view = state.auth.rbac().filter_user_data(&actor, &record);
    Ok(ApiResponse::success(view).to_http_response())
}

/// Assign a new role to a user
///
/// Holding `user:manage_roles` is necessary but not sufficient: the caller
/// must also be allowed to assign the role and to manage the target, and
/// may never change its own role.
async fn change_role(
    state: web::Data<AppState>,
    req: HttpRequest,
    actor: Actor,
    path: web::Path<i64>,
    body: web::Json<ChangeRoleRequest>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let new_role = Role::parse(&body.role)
        .ok_or_else(|| StoreRateError::validation(format!("Unknown role: {}", body.role)))?;

    let target = state
        .db
        .find_user(user_id)
        .await?
        .ok_or_else(|| StoreRateError::not_found("User not found"))?;

    let rbac = state.auth.rbac();
    let allowed = actor.id != target.id
        && rbac.can_assign_role(actor.role, new_role)
        && rbac.can_manage_user_named(actor.role.as_str(), &target.role);

    let audit_event = |base: AuditEvent| {
        let mut event = base
            .with_actor(actor.id, actor.role.as_str())
            .with_resource("user", Some(user_id.to_string()))
            .with_ip(client_ip(&req))
            .with_detail("from", target.role.clone())
            .with_detail("to", new_role.as_str());
        if let Some(request_id) = request_id(&req) {
            event = event.with_detail("request_id", request_id);
        }
        event
    };

    if !allowed {
        warn!(
            "Actor {} may not change role of user {} to {}",
            actor.id, user_id, new_role
        );
        state.auth.audit().record(
            audit_event(AuditEvent::denied(AuditEventType::AccessDenied))
                .with_detail("rule", "role_assignment"),
        );
        return Err(StoreRateError::forbidden("Access denied"));
    }

    if !state.db.update_actor_role(user_id, new_role).await? {
        return Err(StoreRateError::not_found("User not found"));
    }

    state
        .auth
        .audit()
        .record(audit_event(AuditEvent::granted(AuditEventType::RoleChanged)));
    info!(
        "Actor {} changed role of user {} from {} to {}",
        actor.id, user_id, target.role, new_role
    );

    let updated = state
        .db
        .find_user(user_id)
        .await?
        .ok_or_else(|| StoreRateError::not_found("User not found"))?;
    Ok(ApiResponse::success(rbac.filter_user_data(&actor, &updated)).to_http_response())
}
