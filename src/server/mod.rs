//! HTTP server implementation
//!
//! This module provides the HTTP server, its routes and the authorization
//! middleware guarding them.

pub mod middleware;
pub mod routes;

pub mod server;
pub mod state;
mod utils;

pub use server::HttpServer;
pub use state::AppState;
