//! HTTP middleware implementations
//!
//! This module provides the middleware used for request processing:
//! - The authorization pipeline and its stages
//! - The `Authorize` transform wrapping resources and scopes
//! - Request ID tracking

mod authorize;
mod context;
mod helpers;
mod pipeline;
mod request_id;
mod stages;


pub use authorize::{Authorize, AuthorizeService};
pub use context::{AuthContext, RESOURCE_ID_PARAM};
pub use helpers::{Permissions, client_ip, request_id};
pub use pipeline::{Denial, DenialKind, Outcome, Pipeline, Stage};
pub use request_id::{RequestIdMiddleware, RequestIdMiddlewareService};
pub use stages::{AttachPermissions, Authenticate, RequireOwnership, RequirePermission, RequireRole};
