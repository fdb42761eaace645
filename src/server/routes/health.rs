//! Health check and status endpoints

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::storage::{DatabaseBackendType, DatabaseStats};
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, error};

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(health_check))
            .route("/detailed", web::get().to(detailed_health_check)),
    )
    .route("/version", web::get().to(version_info));
}

/// Basic health status
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: Cow<'static, str>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: Cow<'static, str>,
}

/// Health status including the database
#[derive(Debug, Clone, Serialize)]
pub struct DetailedHealthStatus {
    pub status: Cow<'static, str>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: Cow<'static, str>,
    pub uptime_seconds: u64,
    pub database: DatabaseHealth,
    /// Audit events lost to a full buffer since startup
    pub audit_dropped_events: u64,
    /// Audit events the sink failed to persist since startup
    pub audit_failed_writes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseHealth {
    pub healthy: bool,
    pub backend: DatabaseBackendType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<DatabaseStats>,
}

/// Build information
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub service_name: Cow<'static, str>,
    pub version: Cow<'static, str>,
    pub build_time: Cow<'static, str>,
    pub git_hash: Cow<'static, str>,
    pub rust_version: Cow<'static, str>,
}

/// Basic health check endpoint
///
/// Returns a simple health status indicating if the service is running.
pub async fn health_check() -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let health_status = HealthStatus {
        status: Cow::Borrowed("healthy"),
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
    };

    Ok(ApiResponse::success(health_status).to_http_response())
}

/// Detailed health check endpoint
async fn detailed_health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Detailed health check requested");

    let database = match state.db.health_check().await {
        Ok(()) => DatabaseHealth {
            healthy: true,
            backend: state.db.backend_type(),
            stats: state.db.stats().await.ok(),
        },
        Err(e) => {
            error!("Database health check failed: {}", e);
            DatabaseHealth {
                healthy: false,
                backend: state.db.backend_type(),
                stats: None,
            }
        }
    };

    let audit = state.auth.audit();
    let detailed_status = DetailedHealthStatus {
        status: if database.healthy {
            Cow::Borrowed("healthy")
        } else {
            Cow::Borrowed("degraded")
        },
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        uptime_seconds: state.uptime().as_secs(),
        database,
        audit_dropped_events: audit.dropped_events(),
        audit_failed_writes: audit.failed_writes(),
    };

    let mut response = if detailed_status.database.healthy {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };

    Ok(response.json(ApiResponse::success(detailed_status)))
}

/// Version endpoint
async fn version_info() -> ActixResult<HttpResponse> {
    Ok(ApiResponse::success(VersionInfo {
        service_name: Cow::Borrowed(env!("CARGO_PKG_NAME")),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        build_time: Cow::Borrowed(env!("BUILD_TIME")),
        git_hash: Cow::Borrowed(env!("GIT_HASH")),
        rust_version: Cow::Borrowed(env!("RUST_VERSION")),
    })
    .to_http_response())
}
