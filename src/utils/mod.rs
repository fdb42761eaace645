//! Utility modules for the service
//!
//! - **error**: Error type, HTTP rendering and the shared error body
//! - **logging**: Tracing subscriber setup

pub mod error;
pub mod logging;
