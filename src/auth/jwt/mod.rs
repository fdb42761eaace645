//! JWT token handling
//!
//! This module provides bearer token issuance and verification.

mod handler;
pub mod types;
mod utils;


pub use types::{ACCESS_AUDIENCE, Claims, CredentialError, JwtHandler};
