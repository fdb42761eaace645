//! Authentication and authorization system
//!
//! This module ties together credential verification, the RBAC predicates,
//! ownership resolution and the audit log. HTTP guards are built from an
//! [`AuthSystem`] in `server::middleware`.

pub mod jwt;
pub mod ownership;
pub mod rbac;
pub mod types;

pub use types::Actor;

use crate::audit::AuditLogger;
use crate::config::AuthConfig;
use crate::server::middleware::{Authenticate, AuthContext, Denial, Outcome, Pipeline};
use crate::storage::AuthorizationStore;
use ownership::OwnershipResolver;
use rbac::RbacSystem;
use std::sync::Arc;
use tracing::info;

/// Main authentication system
#[derive(Clone)]
pub struct AuthSystem {
    /// RBAC system
    rbac: Arc<RbacSystem>,
    /// JWT handler
    jwt: Arc<jwt::JwtHandler>,
    /// Lookups for actors and resource owners
    store: Arc<dyn AuthorizationStore>,
    ownership: OwnershipResolver,
    audit: AuditLogger,
    /// Include internal denial reasons in responses
    dev_mode: bool,
}

impl std::fmt::Debug for AuthSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSystem")
            .field("jwt", &self.jwt)
            .field("audit", &self.audit)
            .field("dev_mode", &self.dev_mode)
            .finish_non_exhaustive()
    }
}

impl AuthSystem {
    /// Create a new authentication system with the built-in RBAC model
    pub fn new(
        config: &AuthConfig,
        store: Arc<dyn AuthorizationStore>,
        audit: AuditLogger,
    ) -> Self {
        info!("Initializing authentication system");

        Self {
            rbac: Arc::new(RbacSystem::new()),
            jwt: Arc::new(jwt::JwtHandler::new(config)),
            ownership: OwnershipResolver::new(store.clone()),
            store,
            audit,
            dev_mode: false,
        }
    }

    /// Replace the RBAC model
    pub fn with_rbac(mut self, rbac: RbacSystem) -> Self {
        self.rbac = Arc::new(rbac);
        self
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Verify a bearer credential and resolve the current actor
    ///
    /// The denial, if any, has already been audited when this returns.
    pub async fn authenticate(&self, bearer: Option<&str>) -> Result<Actor, Box<Denial>> {
        let pipeline = Pipeline::new(self.audit.clone()).stage(Authenticate {
            jwt: self.jwt.clone(),
            store: self.store.clone(),
        });

        match pipeline
            .run(AuthContext::with_bearer(bearer.map(str::to_string)))
            .await
        {
            Outcome::Allow(AuthContext {
                actor: Some(actor), ..
            }) => Ok(actor),
            Outcome::Allow(ctx) => Err(Box::new(Denial::infra(
                "authentication produced no actor",
                &ctx,
            ))),
            Outcome::Deny(denial) => Err(denial),
        }
    }

    /// Get RBAC system
    pub fn rbac(&self) -> &Arc<RbacSystem> {
        &self.rbac
    }

    /// Get JWT handler
    pub fn jwt(&self) -> &Arc<jwt::JwtHandler> {
        &self.jwt
    }

    pub fn store(&self) -> &Arc<dyn AuthorizationStore> {
        &self.store
    }

    pub fn ownership(&self) -> &OwnershipResolver {
        &self.ownership
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }
}
