//! Funds ledger and funding request endpoints

use crate::auth::RouteGuard;
use crate::models::{NewFundingRequest, NewTransaction, RequestStatus};
use crate::server::middleware::authorize;
use crate::server::routes::{ApiResponse, ok};
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use serde_json::json;

/// Configure finance routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/admin/funds")
            .route(web::get().to(list_funds))
            .route(web::post().to(add_fund)),
    )
    .route("/api/admin/funds/{id}", web::delete().to(delete_fund))
    .service(
        web::resource("/api/requests")
            .route(web::get().to(my_requests))
            .route(web::post().to(submit_request)),
    )
    .route("/api/admin/requests", web::get().to(list_requests))
    .route("/api/admin/requests/{id}/status", web::put().to(set_status));
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: RequestStatus,
}

async fn list_funds(state: web::Data<AppState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    Ok(ok(state.finance.list_funds().await?))
}

async fn add_fund(
    state: web::Data<AppState>,
    req: HttpRequest,
    entry: web::Json<NewTransaction>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    let transaction = state.finance.add_fund(entry.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(transaction)))
}

async fn delete_fund(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    let deleted = state.finance.delete_fund(&path).await?;
    Ok(ok(json!({ "deleted": deleted })))
}

async fn my_requests(state: web::Data<AppState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    let ctx = authorize(&req, RouteGuard::Authenticated)?;
    Ok(ok(state.finance.requests_for(ctx.user_id()).await?))
}

async fn submit_request(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<NewFundingRequest>,
) -> ActixResult<HttpResponse> {
    let ctx = authorize(&req, RouteGuard::Authenticated)?;
    let filed = state
        .finance
        .submit_request(&ctx.user, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(filed)))
}

async fn list_requests(state: web::Data<AppState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    Ok(ok(state.finance.list_requests().await?))
}

async fn set_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<StatusRequest>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    let updated = state.finance.set_request_status(&path, request.status).await?;
    Ok(ok(updated))
}
