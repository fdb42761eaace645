//! Extractors for what the authorization middleware leaves behind

use crate::auth::rbac::PermissionSet;
use crate::auth::types::Actor;
use crate::utils::error::StoreRateError;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures::future::{Ready, ready};
use std::sync::Arc;

/// Permission set attached by the `attach_permissions` stage
#[derive(Debug, Clone)]
pub struct Permissions(pub Arc<PermissionSet>);

impl FromRequest for Actor {
    type Error = StoreRateError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Actor>()
                .cloned()
                .ok_or_else(|| StoreRateError::unauthenticated("Authentication required")),
        )
    }
}

impl FromRequest for Permissions {
    type Error = StoreRateError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Permissions>()
                .cloned()
                .ok_or_else(|| StoreRateError::unauthenticated("Authentication required")),
        )
    }
}

/// Client address as seen through proxies, for audit records
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    req.connection_info()
        .realip_remote_addr()
        .map(str::to_string)
}

/// Request id stamped by the request id middleware
pub fn request_id(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("x-request-id")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
}
