//! Dashboard and transparency endpoints

use crate::auth::{Feature, RouteGuard};
use crate::server::middleware::authorize;
use crate::server::routes::ok;
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::Utc;

/// Configure dashboard routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/admin/dashboard", web::get().to(admin_dashboard))
        .route("/api/transparency", web::get().to(transparency));
}

/// Balance, monthly income, six-month chart, pending requests and user count
async fn admin_dashboard(state: web::Data<AppState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    Ok(ok(state.dashboard.summary(Utc::now())))
}

/// Dashboard figures plus the full ledger, for unlocked members
async fn transparency(state: web::Data<AppState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Feature(Feature::Transparency))?;
    Ok(ok(state.dashboard.transparency(Utc::now())))
}
