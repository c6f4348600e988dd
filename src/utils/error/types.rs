//! Error types for the portal

use thiserror::Error;

/// Result type alias for the portal
pub type Result<T> = std::result::Result<T, PortalError>;

/// Main error type for the portal
#[derive(Error, Debug)]
pub enum PortalError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Document store errors that are not raised by the database driver
    #[error("Document store error: {0}")]
    Store(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JWT errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Authentication errors (bad credentials)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// No authenticated session; the client is sent to the login page
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not permitted
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not permitted, with a page the client should navigate to instead
    #[error("Access denied: {message}")]
    AccessDenied { message: String, redirect: String },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Access code did not match any stored code
    #[error("Invalid code: {0}")]
    InvalidCode(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Card rendering or document export errors
    #[error("Export error: {0}")]
    Export(String),

    /// File storage errors
    #[error("File storage error: {0}")]
    FileStorage(String),

    /// Crypto errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
