//! Store endpoints

use crate::auth::AuthSystem;
use crate::auth::rbac::permissions::{RATING_CREATE, STORE_MANAGE_OWN, STORE_READ};
use crate::auth::types::Actor;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::storage::AuthorizationStore;
use crate::utils::error::{Result, StoreRateError};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::debug;

/// Configure store routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, auth: &AuthSystem) {
    cfg.service(
        web::resource("/api/owner/stores")
            .wrap(auth.require_permission(STORE_MANAGE_OWN))
            .route(web::get().to(owned_stores)),
    )
    .service(
        web::resource("/api/stores/{id}")
            .wrap(auth.require_permission(STORE_READ))
            .route(web::get().to(get_store)),
    )
    .service(
        web::resource("/api/stores/{id}/ratings")
            .wrap(auth.require_permission(RATING_CREATE))
            .route(web::post().to(rate_store)),
    );
}

/// Rating submission body
#[derive(Debug, Clone, Deserialize)]
pub struct RatingRequest {
    pub rating: i32,
}

/// Fetch a store with its rating aggregate, shaped for the caller
async fn get_store(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let store_id = path.into_inner();
    let record = state
        .db
        .find_store(store_id)
        .await?
        .ok_or_else(|| StoreRateError::not_found("Store not found"))?;

    let view = state.auth.rbac().filter_store_data(&actor, &record);
    Ok(ApiResponse::success(view).to_http_response())
}

/// Stores owned by the caller, with their rating aggregates
async fn owned_stores(state: web::Data<AppState>, actor: Actor) -> Result<HttpResponse> {
    let rbac = state.auth.rbac();
    let views: Vec<_> = state
        .db
        .list_stores_by_owner(actor.id)
        .await?
        .iter()
        .map(|record| rbac.filter_store_data(&actor, record))
        .collect();
    Ok(ApiResponse::success(views).to_http_response())
}

/// Submit the caller's rating for a store
async fn rate_store(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
    body: web::Json<RatingRequest>,
) -> Result<HttpResponse> {
    let store_id = path.into_inner();
    let store = state
        .db
        .find_store(store_id)
        .await?
        .ok_or_else(|| StoreRateError::not_found("Store not found"))?;

    if store.owner_id == Some(actor.id) {
        return Err(StoreRateError::forbidden("Access denied"));
    }

    debug!("Actor {} rating store {}", actor.id, store_id);
    let rating = state.db.insert_rating(actor.id, store_id, body.rating).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(rating)))
}
