//! Site content endpoints

use crate::auth::RouteGuard;
use crate::models::{FooterSettings, HomepageSettings};
use crate::server::middleware::authorize;
use crate::server::routes::ok;
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

/// Configure site content routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/site/homepage", web::get().to(get_homepage))
        .route("/api/site/footer", web::get().to(get_footer))
        .route("/api/admin/site/homepage", web::put().to(save_homepage))
        .route("/api/admin/site/footer", web::put().to(save_footer));
}

async fn get_homepage(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(ok(state.site.homepage().await?))
}

async fn get_footer(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(ok(state.site.footer().await?))
}

async fn save_homepage(
    state: web::Data<AppState>,
    req: HttpRequest,
    settings: web::Json<HomepageSettings>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    Ok(ok(state.site.save_homepage(&settings).await?))
}

async fn save_footer(
    state: web::Data<AppState>,
    req: HttpRequest,
    settings: web::Json<FooterSettings>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    Ok(ok(state.site.save_footer(&settings).await?))
}
