//! Gallery endpoints

use crate::auth::RouteGuard;
use crate::server::middleware::authorize;
use crate::server::routes::{ApiResponse, ok};
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use serde_json::json;

/// Configure gallery routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/gallery", web::get().to(list_albums))
        .route("/api/admin/gallery", web::post().to(create_album))
        .route("/api/admin/gallery/{id}", web::delete().to(delete_album))
        .service(
            web::resource("/api/admin/gallery/{id}/images")
                .route(web::post().to(add_image))
                .route(web::delete().to(remove_image)),
        );
}

#[derive(Debug, Deserialize)]
pub struct AlbumRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub url: String,
}

async fn list_albums(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(ok(state.gallery.list().await?))
}

async fn create_album(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<AlbumRequest>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    let album = state.gallery.create_album(&request.name).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(album)))
}

async fn delete_album(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    let deleted = state.gallery.delete_album(&path).await?;
    Ok(ok(json!({ "deleted": deleted })))
}

async fn add_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<ImageRequest>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    Ok(ok(state.gallery.add_image(&path, &request.url).await?))
}

/// The image URL comes in the query string: `?url=...`
async fn remove_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<ImageRequest>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    Ok(ok(state.gallery.remove_image(&path, &query.url).await?))
}
