//! Authentication configuration

use super::*;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Secrets that ship in sample files and must never reach production
pub const INSECURE_JWT_SECRETS: &[&str] = &[
    "your-secret-key",
    "change-me",
    "change-me-in-production",
    "secret",
];

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret
    #[serde(default = "missing_jwt_secret")]
    pub jwt_secret: String,
    /// JWT expiration in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: u64,
    /// Issuer stamped into and required from every token
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: generate_secure_jwt_secret(),
            jwt_expiration: default_jwt_expiration(),
            jwt_issuer: default_jwt_issuer(),
        }
    }
}

/// Generate a secure random JWT secret
pub fn generate_secure_jwt_secret() -> String {
    // Generate a 64-character secure random string
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

fn missing_jwt_secret() -> String {
    warn!(
        "No JWT secret configured, generating a random one. Tokens will not survive a restart; set JWT_SECRET before deploying."
    );
    generate_secure_jwt_secret()
}
