//! Current-actor endpoints

use crate::auth::AuthSystem;
use crate::auth::types::Actor;
use crate::server::middleware::Permissions;
use crate::server::routes::ApiResponse;
use actix_web::{HttpResponse, web};
use serde::Serialize;

/// Configure authentication routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, auth: &AuthSystem) {
    cfg.service(
        web::resource("/api/auth/me")
            .wrap(auth.authenticated())
            .route(web::get().to(me)),
    );
}

/// The caller together with what it may do
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub user: Actor,
    pub permissions: Vec<String>,
}

/// Resolve the current actor from its credential
async fn me(actor: Actor, permissions: Permissions) -> HttpResponse {
    ApiResponse::success(MeResponse {
        user: actor,
        permissions: permissions.0.to_sorted_vec(),
    })
    .to_http_response()
}
