//! ID card endpoints
//!
//! Members reach these only after unlocking the ID feature; admins manage
//! any member's card.

use crate::auth::{Feature, RouteGuard};
use crate::models::{CardForm, CardSide};
use crate::server::middleware::authorize;
use crate::server::routes::ok;
use crate::server::state::AppState;
use crate::services::ExportedDocument;
use crate::utils::error::PortalError;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde_json::json;
use tracing::warn;

/// Configure ID card routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/cards/me")
            .route(web::get().to(get_my_card))
            .route(web::put().to(save_my_card))
            .route(web::delete().to(delete_my_card)),
    )
    .route("/api/cards/me/export/{side}", web::get().to(export_my_card))
    .route("/api/admin/cards", web::get().to(list_cards))
    .service(
        web::resource("/api/admin/cards/{uid}")
            .route(web::put().to(save_card_for))
            .route(web::delete().to(delete_card_for)),
    )
    .route("/api/admin/cards/{uid}/export/{side}", web::get().to(export_card_for));
}

const ID_GATE: RouteGuard = RouteGuard::Feature(Feature::IdCard);

fn parse_side(side: &str) -> Result<CardSide, PortalError> {
    side.parse().map_err(PortalError::bad_request)
}

fn pdf_response(document: ExportedDocument) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ExportedDocument::CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(document.filename)],
        })
        .body(document.bytes)
}

async fn get_my_card(state: web::Data<AppState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    let ctx = authorize(&req, ID_GATE)?;
    let card = state.cards.get(ctx.user_id()).await?;
    Ok(ok(card))
}

async fn save_my_card(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Json<CardForm>,
) -> ActixResult<HttpResponse> {
    let ctx = authorize(&req, ID_GATE)?;
    let card = state
        .cards
        .save(ctx.user_id(), Some(&ctx.user.email), form.into_inner())
        .await?;
    Ok(ok(card))
}

async fn delete_my_card(state: web::Data<AppState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    let ctx = authorize(&req, ID_GATE)?;
    state.cards.delete(ctx.user_id()).await?;
    Ok(ok(json!({ "deleted": true })))
}

async fn export_my_card(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let ctx = authorize(&req, ID_GATE)?;
    let side = parse_side(&path)?;
    export(&state, ctx.user_id(), side).await
}

async fn export(state: &AppState, uid: &str, side: CardSide) -> ActixResult<HttpResponse> {
    let card = state.cards.require(uid).await?;
    let document = state
        .exporter
        .export(&card, side)
        .await
        .inspect_err(|e| warn!(uid, side = %side, error = %e, "ID card export failed"))?;
    Ok(pdf_response(document))
}

async fn list_cards(state: web::Data<AppState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    Ok(ok(state.cards.list().await?))
}

async fn save_card_for(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    form: web::Json<CardForm>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    let owner = state.users.require(&path).await?;
    let card = state
        .cards
        .save(&owner.uid, Some(&owner.email), form.into_inner())
        .await?;
    Ok(ok(card))
}

async fn delete_card_for(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    state.cards.delete(&path).await?;
    Ok(ok(json!({ "deleted": true })))
}

async fn export_card_for(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    let (uid, side) = path.into_inner();
    export(&state, &uid, parse_side(&side)?).await
}
