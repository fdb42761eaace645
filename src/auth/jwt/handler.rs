//! Core JWT handler implementation

use super::types::{ACCESS_AUDIENCE, Claims, CredentialError, JwtHandler};
use crate::auth::rbac::Role;
use crate::config::AuthConfig;
use crate::utils::error::{Result, StoreRateError};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use uuid::Uuid;

impl JwtHandler {
    /// Create a new JWT handler
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            expiration: config.jwt_expiration,
            issuer: config.jwt_issuer.clone(),
        }
    }

    /// Claims for a fresh access token issued now
    pub fn access_claims(&self, actor_id: i64, role: Role) -> Result<Claims> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| StoreRateError::internal(format!("System time error: {}", e)))?
            .as_secs();

        Ok(Claims {
            sub: actor_id,
            iat: now,
            exp: now + self.expiration,
            iss: self.issuer.clone(),
            aud: ACCESS_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
            role: role.as_str().to_string(),
        })
    }

    /// Create an access token for an actor
    pub fn create_access_token(&self, actor_id: i64, role: Role) -> Result<String> {
        let claims = self.access_claims(actor_id, role)?;
        let token = self.sign(&claims)?;

        debug!("Created access token for actor: {}", actor_id);
        Ok(token)
    }

    /// Sign arbitrary claims with this handler's key
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        let header = Header::new(self.algorithm);
        encode(&header, claims, &self.encoding_key).map_err(StoreRateError::Jwt)
    }

    /// Verify and decode a token
    ///
    /// Expiry is reported separately from every other failure so clients
    /// can be told to refresh rather than to log in again.
    pub fn verify_token(&self, token: &str) -> std::result::Result<Claims, CredentialError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[ACCESS_AUDIENCE]);
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CredentialError::Expired,
                _ => {
                    warn!("JWT verification failed: {}", e);
                    CredentialError::Invalid(e.to_string())
                }
            })?;

        debug!("Token verified for actor: {}", token_data.claims.sub);
        Ok(token_data.claims)
    }
}
