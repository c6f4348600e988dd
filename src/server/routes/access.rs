//! Access-code unlock endpoints

use crate::auth::RouteGuard;
use crate::server::middleware::authorize;
use crate::server::routes::ok;
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use tracing::info;

/// Configure access-code routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/access", web::get().to(get_access))
        .route("/api/access/verify", web::post().to(verify_code));
}

/// Code entered by a member
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    #[serde(default)]
    pub code: String,
}

/// Unlock flags of the caller's session
async fn get_access(req: HttpRequest) -> ActixResult<HttpResponse> {
    let ctx = authorize(&req, RouteGuard::Authenticated)?;
    Ok(ok(ctx.access))
}

/// Compare a code against the caller's stored codes and unlock on a match
async fn verify_code(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<VerifyCodeRequest>,
) -> ActixResult<HttpResponse> {
    let ctx = authorize(&req, RouteGuard::Authenticated)?;

    let outcome = state
        .access
        .verify(ctx.user_id(), ctx.session_id, &request.code)
        .await?;

    info!(uid = %ctx.user_id(), unlocked = ?outcome.unlocked, "Access code accepted");
    Ok(ok(outcome))
}
