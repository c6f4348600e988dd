//! Helper functions for middleware

use actix_web::http::header::HeaderMap;

/// Extract a bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get("authorization")?.to_str().ok()?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))?
        .trim();

    (!token.is_empty()).then(|| token.to_string())
}

/// Check if a route is public (doesn't require authentication)
pub fn is_public_route(path: &str) -> bool {
    const PUBLIC_ROUTES: &[&str] = &[
        "/health",
        "/version",
        "/api/auth/login",
        "/api/auth/register",
        "/api/site",
        "/api/news",
        "/api/gallery",
        "/api/blobs",
    ];

    PUBLIC_ROUTES.iter().any(|&route| path.starts_with(route))
}
