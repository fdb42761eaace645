//! HTTP route modules
//!
//! This module contains all HTTP route handlers organized by functionality.
//! Every route except the health endpoints is guarded by an authorization
//! pipeline built from the shared [`AuthSystem`].

pub mod admin;
pub mod auth;
pub mod health;
pub mod ratings;
pub mod stores;
pub mod users;

use crate::auth::AuthSystem;
use actix_web::{HttpResponse, web};

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Additional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: None,
        }
    }

    /// Create a successful response with metadata
    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: Some(meta),
        }
    }

    /// Convert the API response to an HTTP 200 response
    pub fn to_http_response(&self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }
}

/// Register every API route, guarded by `auth`
pub fn configure_routes(cfg: &mut web::ServiceConfig, auth: &AuthSystem) {
    cfg.configure(health::configure_routes)
        .configure(|cfg| auth::configure_routes(cfg, auth))
        .configure(|cfg| users::configure_routes(cfg, auth))
        .configure(|cfg| stores::configure_routes(cfg, auth))
        .configure(|cfg| ratings::configure_routes(cfg, auth))
        .configure(|cfg| admin::configure_routes(cfg, auth));
}
