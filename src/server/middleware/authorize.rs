//! Authorization middleware
//!
//! `Authorize` runs an authorization [`Pipeline`] before the wrapped
//! service. Denials are answered directly; on success the resolved
//! [`Actor`] and its permission set are placed in the request extensions.
//!
//! Ownership guards read the `{id}` path segment, so they must wrap a
//! resource rather than a scope or the whole app.

use super::context::AuthContext;
use super::helpers::Permissions;
use super::pipeline::{Outcome, Pipeline};
use super::stages::{
    AttachPermissions, Authenticate, RequireOwnership, RequirePermission, RequireRole,
};
use crate::auth::AuthSystem;
use crate::auth::rbac::{Permission, ResourceType, Role};
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::HttpMessage;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// Authorization middleware for Actix-web
#[derive(Clone, Debug)]
pub struct Authorize {
    auth: AuthSystem,
    pipeline: Pipeline,
}

impl AuthSystem {
    /// Guard requiring only a valid credential and a resolvable actor
    pub fn authenticated(&self) -> Authorize {
        let pipeline = Pipeline::new(self.audit().clone())
            .stage(Authenticate {
                jwt: self.jwt().clone(),
                store: self.store().clone(),
            })
            .stage(AttachPermissions {
                rbac: self.rbac().clone(),
            });

        Authorize {
            auth: self.clone(),
            pipeline,
        }
    }

    /// Guard requiring `permission`
    pub fn require_permission(&self, permission: Permission) -> Authorize {
        self.authenticated().require_permission(permission)
    }

    /// Guard requiring ownership of the `{id}` resource of `resource_type`
    pub fn require_ownership(&self, resource_type: ResourceType) -> Authorize {
        self.authenticated().require_ownership(resource_type)
    }

    /// Guard requiring the actor's role to be one of `roles`
    pub fn require_role(&self, roles: &[Role]) -> Authorize {
        self.authenticated().require_role(roles)
    }
}

impl Authorize {
    pub fn require_permission(mut self, permission: Permission) -> Self {
        self.pipeline = self.pipeline.stage(RequirePermission {
            rbac: self.auth.rbac().clone(),
            permission,
        });
        self
    }

    pub fn require_ownership(mut self, resource_type: ResourceType) -> Self {
        self.pipeline = self.pipeline.stage(RequireOwnership {
            rbac: self.auth.rbac().clone(),
            ownership: self.auth.ownership().clone(),
            resource_type,
        });
        self
    }

    pub fn require_role(mut self, roles: &[Role]) -> Self {
        self.pipeline = self.pipeline.stage(RequireRole {
            roles: roles.to_vec(),
        });
        self
    }

    /// The pipeline this guard runs
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authorize
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthorizeService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthorizeService {
            service: Rc::new(service),
            pipeline: Rc::new(self.pipeline.clone()),
            dev_mode: self.auth.dev_mode(),
        }))
    }
}

/// Service implementation for the authorization middleware
pub struct AuthorizeService<S> {
    service: Rc<S>,
    pipeline: Rc<Pipeline>,
    dev_mode: bool,
}

impl<S, B> Service<ServiceRequest> for AuthorizeService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let pipeline = Rc::clone(&self.pipeline);
        let dev_mode = self.dev_mode;

        Box::pin(async move {
            let ctx = AuthContext::from_request(&req);
            let request_id = ctx.request_id.clone();

            match pipeline.run(ctx).await {
                Outcome::Allow(ctx) => {
                    if let Some(actor) = ctx.actor {
                        req.extensions_mut().insert(actor);
                    }
                    if let Some(permissions) = ctx.permissions {
                        req.extensions_mut().insert(Permissions(permissions));
                    }
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Outcome::Deny(denial) => {
                    let response = denial.to_response(dev_mode, request_id);
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
