//! HTTP response handling for errors

use super::types::StoreRateError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

impl StoreRateError {
    /// Status code, stable error code and client-facing message
    ///
    /// Infrastructure variants never echo their inner message.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            StoreRateError::Unauthenticated(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", msg.clone())
            }
            StoreRateError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            StoreRateError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            StoreRateError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            StoreRateError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            StoreRateError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            StoreRateError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "Service is misconfigured".to_string(),
            ),
            StoreRateError::Database(_) | StoreRateError::Infra(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INFRA_ERROR",
                "A backend service failed while processing the request".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }
}

impl ResponseError for StoreRateError {
    fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = self.parts();
        HttpResponse::build(status_code).json(ErrorResponse::new(error_code, message))
    }
}

/// Standard error response format
///
/// Every denial and failure shares this shape so clients can rely on
/// `success == false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    /// Internal reason, only populated in development mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
            timestamp: chrono::Utc::now().timestamp(),
            details: None,
            request_id: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}
