//! User administration endpoints

use crate::auth::{AuthContext, RouteGuard};
use crate::models::{Role, UserProfile, UserRecord};
use crate::server::middleware::authorize;
use crate::server::routes::{ApiResponse, ok};
use crate::server::state::AppState;
use crate::services::{NewUser, UserCodes};
use crate::utils::error::{PortalError, Result};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

/// Configure user administration routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/admin/users")
            .route(web::get().to(list_users))
            .route(web::post().to(create_user)),
    )
    .route("/api/admin/users/{uid}", web::delete().to(delete_user))
    .route("/api/admin/users/{uid}/role", web::put().to(set_role))
    .route("/api/admin/users/{uid}/codes", web::put().to(set_codes));
}

/// User row on the admin page; admins see assigned codes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub access_code: Option<String>,
    pub transparency_code: Option<String>,
}

impl From<UserRecord> for AdminUserView {
    fn from(user: UserRecord) -> Self {
        Self {
            profile: UserProfile::from(&user),
            access_code: user.access_code,
            transparency_code: user.transparency_code,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

async fn list_users(state: web::Data<AppState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    let users: Vec<AdminUserView> = state
        .users
        .list()
        .await?
        .into_iter()
        .map(AdminUserView::from)
        .collect();
    let total = users.len();
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_meta(users, json!({ "total": total }))))
}

/// Only super admins may hand out admin roles
async fn create_user(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<NewUser>,
) -> ActixResult<HttpResponse> {
    let ctx = authorize(&req, RouteGuard::Admin)?;
    let request = request.into_inner();
    if request.role.is_some_and(|r| r > ctx.user.role) {
        return Err(PortalError::forbidden("Cannot grant a role above your own").into());
    }

    let user = state.users.create(request).await?;
    info!(by = %ctx.user_id(), uid = %user.uid, "Admin created user");
    Ok(HttpResponse::Created().json(ApiResponse::success(AdminUserView::from(user))))
}

/// Load a user the caller is allowed to manage
async fn manageable_target(state: &AppState, ctx: &AuthContext, uid: &str) -> Result<UserRecord> {
    let target = state
        .users
        .get(uid)
        .await?
        .ok_or_else(|| PortalError::not_found(format!("User {} not found", uid)))?;
    if !ctx.user.role.can_manage(target.role) {
        return Err(PortalError::forbidden(format!(
            "Cannot manage a {} account",
            target.role
        )));
    }
    Ok(target)
}

async fn delete_user(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let ctx = authorize(&req, RouteGuard::Admin)?;
    if *path == ctx.user.uid {
        return Err(PortalError::bad_request("Cannot delete your own account").into());
    }
    manageable_target(&state, &ctx, &path).await?;

    let deleted = state.users.delete(&path).await?;
    if deleted {
        state.auth.sessions().close_user(&path);
    }
    Ok(ok(json!({ "deleted": deleted })))
}

async fn set_role(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<RoleRequest>,
) -> ActixResult<HttpResponse> {
    let ctx = authorize(&req, RouteGuard::Admin)?;
    if request.role > ctx.user.role {
        return Err(PortalError::forbidden("Cannot grant a role above your own").into());
    }
    manageable_target(&state, &ctx, &path).await?;

    let user = state.users.set_role(&path, request.role).await?;
    Ok(ok(AdminUserView::from(user)))
}

/// Assign codes verbatim; concurrent edits are last-write-wins
async fn set_codes(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<UserCodes>,
) -> ActixResult<HttpResponse> {
    let ctx = authorize(&req, RouteGuard::Admin)?;
    manageable_target(&state, &ctx, &path).await?;
    let user = state.users.set_codes(&path, request.into_inner()).await?;
    Ok(ok(AdminUserView::from(user)))
}
