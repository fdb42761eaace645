//! HTTP server utility methods

use crate::server::server::HttpServer;
use crate::utils::error::StoreRateError;
use std::io::ErrorKind;
use tracing::{info, warn};

impl HttpServer {
    /// Resolves on Ctrl+C or SIGTERM
    pub async fn shutdown_signal() {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal, shutting down gracefully"),
                Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                    info!("Received terminate signal, shutting down gracefully");
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    /// Turn a bind failure into an actionable configuration error
    pub(crate) fn format_bind_error(
        error: std::io::Error,
        bind_addr: &str,
        port: u16,
    ) -> StoreRateError {
        match error.kind() {
            ErrorKind::AddrInUse => StoreRateError::config(format!(
                "Port {} is already in use; stop the other process or set STORERATE_PORT (e.g. {})",
                port,
                port.saturating_add(1)
            )),
            ErrorKind::PermissionDenied => StoreRateError::config(format!(
                "Permission denied binding port {}; use a port >= 1024",
                port
            )),
            _ => StoreRateError::config(format!("Failed to bind to {}: {}", bind_addr, error)),
        }
    }
}
