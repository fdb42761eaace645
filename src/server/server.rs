//! HTTP server core implementation

use crate::audit::{AuditLogger, AuditSink, TracingAuditSink};
use crate::auth::AuthSystem;
use crate::config::{AuditSinkKind, Config, ServerConfig};
use crate::server::middleware::RequestIdMiddleware;
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::Database;
use crate::utils::error::{Result, StoreRateError};
use actix_cors::Cors;
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use std::sync::Arc;
use tracing::info;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Connect storage, start the audit writer and build the auth system
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let db = Arc::new(Database::new(&config.storage().database).await?);
        if config.storage().database.auto_migrate {
            db.migrate().await?;
        }

        let state = Self::build_state(config, db);
        Ok(Self {
            config: config.server().clone(),
            state,
        })
    }

    /// Wire the shared state around an already connected database
    pub fn build_state(config: &Config, db: Arc<Database>) -> AppState {
        let sink: Arc<dyn AuditSink> = match config.audit().sink {
            AuditSinkKind::Database => db.clone(),
            AuditSinkKind::Log => Arc::new(TracingAuditSink),
        };
        let audit = AuditLogger::new(sink, config.audit().buffer_size);

        let auth = AuthSystem::new(config.auth(), db.clone(), audit)
            .with_dev_mode(config.server().dev_mode);

        AppState::new(config.clone(), auth, db)
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let cors = Self::build_cors(state.config.server());
        let auth = state.auth.clone();

        App::new()
            .app_data(state)
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .wrap(DefaultHeaders::new().add(("Server", "storerate")))
            .configure(|cfg| routes::configure_routes(cfg, &auth))
    }

    fn build_cors(config: &ServerConfig) -> Cors {
        let cors_config = &config.cors;
        if !cors_config.enabled {
            return Cors::default();
        }

        let mut cors = Cors::default();
        if cors_config.allows_all_origins() {
            cors = cors.allow_any_origin();
            cors_config.warn_if_permissive();
        } else {
            for origin in &cors_config.allowed_origins {
                cors = cors.allowed_origin(origin);
            }
        }

        let methods: Vec<actix_web::http::Method> = cors_config
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        if !methods.is_empty() {
            cors = cors.allowed_methods(methods);
        }

        let headers: Vec<actix_web::http::header::HeaderName> = cors_config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        if !headers.is_empty() {
            cors = cors.allowed_headers(headers);
        }

        cors = cors
            .expose_headers(["x-request-id"])
            .max_age(cors_config.max_age as usize);

        if cors_config.allow_credentials {
            cors = cors.supports_credentials();
        }
        cors
    }

    /// Start the HTTP server and run until a shutdown signal arrives
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let port = self.config.port;
        let workers = self.config.worker_count();

        info!("Starting HTTP server on {} with {} workers", bind_addr, workers);

        let audit = self.state.auth.audit().clone();
        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(workers)
            .disable_signals()
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?
            .run();

        let handle = server.handle();
        tokio::spawn(async move {
            Self::shutdown_signal().await;
            handle.stop(true).await;
        });

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| StoreRateError::internal(format!("Server error: {}", e)))?;

        audit.flush().await;
        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
