//! HTTP route modules
//!
//! This module contains all HTTP route handlers organized by functionality.
//! Admin endpoints live under `/api/admin` and are registered as individual
//! resources so that several modules can share the prefix.

pub mod access;
pub mod auth;
pub mod blobs;
pub mod cards;
pub mod dashboard;
pub mod finance;
pub mod gallery;
pub mod health;
pub mod news;
pub mod site;
pub mod users;

use actix_web::{HttpResponse, web};

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    /// Create a successful response with metadata
    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(meta),
        }
    }

    /// Create an error response
    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
            meta: None,
        }
    }
}

/// 200 with the success envelope
pub fn ok<T: serde::Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(data))
}

/// Register every route module
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(auth::configure_routes)
        .configure(access::configure_routes)
        .configure(cards::configure_routes)
        .configure(dashboard::configure_routes)
        .configure(users::configure_routes)
        .configure(finance::configure_routes)
        .configure(gallery::configure_routes)
        .configure(site::configure_routes)
        .configure(news::configure_routes)
        .configure(blobs::configure_routes);
}
