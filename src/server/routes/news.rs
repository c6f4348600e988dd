//! News endpoints

use crate::auth::RouteGuard;
use crate::server::middleware::authorize;
use crate::server::routes::{ApiResponse, ok};
use crate::server::state::AppState;
use crate::services::NewNewsItem;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use serde_json::json;

/// Configure news routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/news", web::get().to(latest_news))
        .route("/api/admin/news", web::post().to(create_news))
        .route("/api/admin/news/{id}", web::delete().to(delete_news));
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    pub limit: Option<usize>,
}

async fn latest_news(
    state: web::Data<AppState>,
    query: web::Query<LatestQuery>,
) -> ActixResult<HttpResponse> {
    let limit = query.limit.map(|l| l.clamp(1, 100));
    Ok(ok(state.news.latest(limit).await?))
}

async fn create_news(
    state: web::Data<AppState>,
    req: HttpRequest,
    item: web::Json<NewNewsItem>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    let created = state.news.create(item.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

async fn delete_news(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    let deleted = state.news.delete(&path).await?;
    Ok(ok(json!({ "deleted": deleted })))
}
