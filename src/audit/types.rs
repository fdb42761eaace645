//! Audit event types

use crate::utils::error::{Result, StoreRateError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of authorization-relevant occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    /// No bearer credential on a protected route
    MissingToken,
    /// Credential signature valid but past its expiry
    TokenExpired,
    /// Bad signature, unknown actor, or role claim out of date
    InvalidToken,
    /// Permission, ownership or role allow-list check failed
    AccessDenied,
    /// A collaborator failed while deciding; access was denied
    AuthorizationError,
    /// An actor's role was reassigned
    RoleChanged,
}

impl AuditEventType {
    /// Whether events of this type record an action that was carried out
    pub fn is_grant(&self) -> bool {
        matches!(self, AuditEventType::RoleChanged)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::MissingToken => "MISSING_TOKEN",
            AuditEventType::TokenExpired => "TOKEN_EXPIRED",
            AuditEventType::InvalidToken => "INVALID_TOKEN",
            AuditEventType::AccessDenied => "ACCESS_DENIED",
            AuditEventType::AuthorizationError => "AUTHORIZATION_ERROR",
            AuditEventType::RoleChanged => "ROLE_CHANGED",
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditEventType {
    type Err = StoreRateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MISSING_TOKEN" => Ok(AuditEventType::MissingToken),
            "TOKEN_EXPIRED" => Ok(AuditEventType::TokenExpired),
            "INVALID_TOKEN" => Ok(AuditEventType::InvalidToken),
            "ACCESS_DENIED" => Ok(AuditEventType::AccessDenied),
            "AUTHORIZATION_ERROR" => Ok(AuditEventType::AuthorizationError),
            "ROLE_CHANGED" => Ok(AuditEventType::RoleChanged),
            other => Err(StoreRateError::validation(format!(
                "Unknown audit event type: {}",
                other
            ))),
        }
    }
}

/// Immutable record of an authorization-relevant occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Acting user, when one could be identified
    pub user_id: Option<i64>,
    /// Role the actor held (or claimed) at the time
    pub actor_role: Option<String>,
    pub event_type: AuditEventType,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub granted: bool,
    pub ip: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Free-form context such as the failed rule or the request path
    pub details: serde_json::Value,
}

impl AuditEvent {
    /// A denial of `event_type`
    pub fn denied(event_type: AuditEventType) -> Self {
        Self::new(event_type, false)
    }

    /// A granted, sensitive action of `event_type`
    pub fn granted(event_type: AuditEventType) -> Self {
        Self::new(event_type, true)
    }

    /// An event of `event_type`, granted or denied as its type implies
    pub fn of(event_type: AuditEventType) -> Self {
        Self::new(event_type, event_type.is_grant())
    }

    fn new(event_type: AuditEventType, granted: bool) -> Self {
        Self {
            user_id: None,
            actor_role: None,
            event_type,
            resource_type: None,
            resource_id: None,
            granted,
            ip: None,
            timestamp: Utc::now(),
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_actor(mut self, user_id: i64, role: impl Into<String>) -> Self {
        self.user_id = Some(user_id);
        self.actor_role = Some(role.into());
        self
    }

    pub fn with_user_id(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_resource(mut self, resource_type: impl Into<String>, resource_id: Option<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = resource_id;
        self
    }

    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip = ip;
        self
    }

    /// Add one key to `details`
    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        if let serde_json::Value::Object(map) = &mut self.details {
            map.insert(key.to_string(), value.into());
        }
        self
    }

    /// Value of a `details` key, if present
    pub fn detail(&self, key: &str) -> Option<&serde_json::Value> {
        self.details.get(key)
    }
}
