//! Rating endpoints

use crate::auth::AuthSystem;
use crate::auth::rbac::ResourceType;
use crate::auth::rbac::permissions::RATING_UPDATE_OWN;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

/// Configure rating routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, auth: &AuthSystem) {
    cfg.service(
        web::resource("/api/ratings/{id}")
            .wrap(
                auth.require_permission(RATING_UPDATE_OWN)
                    .require_ownership(ResourceType::Rating),
            )
            .route(web::put().to(update_rating)),
    );
}

/// Rating update body
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRatingRequest {
    pub rating: i32,
}

/// Change the score of one of the caller's ratings
async fn update_rating(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateRatingRequest>,
) -> Result<HttpResponse> {
    let rating = state
        .db
        .update_rating(path.into_inner(), body.rating)
        .await?;
    Ok(ApiResponse::success(rating).to_http_response())
}
