//! Per-request authorization context

use crate::auth::rbac::PermissionSet;
use crate::auth::types::Actor;
use actix_web::dev::ServiceRequest;
use std::sync::Arc;

/// Path parameter naming the resource instance for ownership checks
pub const RESOURCE_ID_PARAM: &str = "id";

/// State threaded through the authorization stages of one request
///
/// Starts with what the request carries; stages fill in the actor and its
/// permission set as they succeed.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub request_id: Option<String>,
    pub ip: Option<String>,
    pub method: String,
    pub path: String,
    /// Raw bearer token, if an `Authorization: Bearer` header was sent
    pub bearer: Option<String>,
    /// Raw `{id}` path segment, if the route has one
    pub resource_id: Option<String>,
    pub actor: Option<Actor>,
    pub permissions: Option<Arc<PermissionSet>>,
}

impl AuthContext {
    pub fn from_request(req: &ServiceRequest) -> Self {
        let bearer = req
            .headers()
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(crate::auth::jwt::JwtHandler::extract_token_from_header);

        Self {
            request_id: req
                .headers()
                .get("x-request-id")
                .and_then(|h| h.to_str().ok())
                .map(str::to_string),
            ip: req
                .connection_info()
                .realip_remote_addr()
                .map(str::to_string),
            method: req.method().to_string(),
            path: req.path().to_string(),
            bearer,
            resource_id: req.match_info().get(RESOURCE_ID_PARAM).map(str::to_string),
            actor: None,
            permissions: None,
        }
    }

    /// Bearer-only context, used outside actix
    pub fn with_bearer(bearer: Option<String>) -> Self {
        Self {
            bearer,
            ..Default::default()
        }
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }
}
