//! Health check and status endpoints
//!
//! This module provides health check and version endpoints.

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::storage::StorageHealthStatus;
use actix_web::{HttpResponse, Result as ActixResult, web};
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(health_check))
            .route("/detailed", web::get().to(detailed_health_check)),
    )
    .route("/version", web::get().to(version_info));
}

/// Basic health check endpoint
///
/// Returns a simple health status indicating if the service is running.
pub async fn health_check() -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let health_status = HealthStatus {
        status: Cow::Borrowed("healthy"),
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(health_status)))
}

/// Detailed health check endpoint
///
/// Probes the document store and blob storage and reports open sessions.
async fn detailed_health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Detailed health check requested");

    let storage = state.storage.health_check().await;
    let detailed_status = DetailedHealthStatus {
        status: if storage.overall {
            Cow::Borrowed("healthy")
        } else {
            Cow::Borrowed("degraded")
        },
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        uptime_seconds: get_uptime_seconds(),
        storage,
        active_sessions: state.auth.sessions().len(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(detailed_status)))
}

/// Version information endpoint
async fn version_info() -> HttpResponse {
    debug!("Version info requested");

    let build = crate::build_info();
    let version_info = VersionInfo {
        version: Cow::Borrowed(build.version),
        build_time: Cow::Borrowed(build.build_time),
        git_hash: Cow::Borrowed(build.git_hash),
        rust_version: Cow::Borrowed(build.rust_version),
        document_backends: get_document_backends(),
    };

    HttpResponse::Ok().json(ApiResponse::success(version_info))
}

/// Basic health status
#[derive(Debug, Clone, serde::Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
}

/// Detailed health status
#[derive(Debug, Clone, serde::Serialize)]
struct DetailedHealthStatus {
    status: Cow<'static, str>,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
    uptime_seconds: u64,
    storage: StorageHealthStatus,
    active_sessions: usize,
}

/// Version information
#[derive(Debug, Clone, serde::Serialize)]
struct VersionInfo {
    version: Cow<'static, str>,
    build_time: Cow<'static, str>,
    git_hash: Cow<'static, str>,
    rust_version: Cow<'static, str>,
    document_backends: Vec<Cow<'static, str>>,
}

/// Seconds since the first health probe
fn get_uptime_seconds() -> u64 {
    static START_TIME: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();
    let start = START_TIME.get_or_init(std::time::Instant::now);
    start.elapsed().as_secs()
}

/// Document store backends compiled in
fn get_document_backends() -> Vec<Cow<'static, str>> {
    let mut backends = vec![Cow::Borrowed("memory")];

    #[cfg(feature = "sqlite")]
    backends.push(Cow::Borrowed("sqlite"));

    #[cfg(feature = "postgres")]
    backends.push(Cow::Borrowed("postgres"));

    backends
}
