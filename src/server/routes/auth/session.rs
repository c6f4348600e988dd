//! Session management endpoints

use crate::server::middleware::get_auth_context;
use crate::server::routes::ok;
use crate::server::AppState;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde_json::json;
use tracing::info;

/// User logout endpoint
///
/// Ends the caller's session, dropping both unlock flags. Logging out
/// without a valid session is not an error.
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    let closed = match get_auth_context(&req) {
        Some(ctx) => {
            info!(uid = %ctx.user_id(), "User logout");
            state.auth.logout(ctx.session_id)
        }
        None => false,
    };

    Ok(ok(json!({ "loggedOut": closed })))
}
