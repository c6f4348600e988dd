//! HTTP middleware implementations
//!
//! Bearer-token authentication and public route detection.

mod auth;
mod helpers;

pub use auth::{AuthMiddleware, AuthMiddlewareService, authorize, get_auth_context};
pub use helpers::{extract_bearer_token, is_public_route};
