//! Administrative endpoints

use crate::auth::AuthSystem;
use crate::auth::rbac::Role;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

const DEFAULT_AUDIT_LIMIT: u64 = 50;
const MAX_AUDIT_LIMIT: u64 = 500;

/// Configure admin routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, auth: &AuthSystem) {
    cfg.service(
        web::resource("/api/admin/audit-events")
            .wrap(auth.require_role(&[Role::SystemAdmin]))
            .route(web::get().to(list_audit_events)),
    );
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<u64>,
    pub user_id: Option<i64>,
}

/// Recent audit events, newest first
async fn list_audit_events(
    state: web::Data<AppState>,
    query: web::Query<AuditQuery>,
) -> Result<HttpResponse> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_AUDIT_LIMIT)
        .clamp(1, MAX_AUDIT_LIMIT);

    // Pending events must be visible to the caller
    state.auth.audit().flush().await;

    let events = match query.user_id {
        Some(user_id) => state.db.audit_events_for_user(user_id, limit).await?,
        None => state.db.recent_audit_events(limit).await?,
    };

    Ok(ApiResponse::success_with_meta(events, serde_json::json!({ "limit": limit }))
        .to_http_response())
}
