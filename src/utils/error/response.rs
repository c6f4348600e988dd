//! HTTP response handling for errors

use super::types::PortalError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::future::Future;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Run a request future with its id available to error responses
pub async fn with_request_id<F: Future>(request_id: String, future: F) -> F::Output {
    REQUEST_ID.scope(request_id, future).await
}

/// Id of the request being served, when inside [`with_request_id`]
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}

impl ResponseError for PortalError {
    fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = self.classify();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id: current_request_id(),
                redirect: self.redirect().map(str::to_string),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

impl PortalError {
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            PortalError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            PortalError::Database(_) | PortalError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "Storage operation failed".to_string(),
            ),
            PortalError::Auth(_) => (StatusCode::UNAUTHORIZED, "AUTH_ERROR", self.to_string()),
            PortalError::Jwt(_) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token".to_string(),
            ),
            PortalError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string())
            }
            PortalError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN", self.to_string()),
            PortalError::AccessDenied { .. } => {
                (StatusCode::FORBIDDEN, "ACCESS_DENIED", self.to_string())
            }
            PortalError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.to_string(),
            ),
            PortalError::InvalidCode(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_CODE", self.to_string())
            }
            PortalError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            PortalError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", self.to_string()),
            PortalError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", self.to_string()),
            PortalError::Export(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EXPORT_ERROR",
                "Failed to export ID card".to_string(),
            ),
            PortalError::FileStorage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "FILE_STORAGE_ERROR",
                "File operation failed".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}
