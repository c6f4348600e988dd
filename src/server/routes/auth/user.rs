//! Current user endpoint

use crate::auth::RouteGuard;
use crate::server::middleware::authorize;
use crate::server::routes::ok;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::models::CurrentUserResponse;

/// Get current user endpoint
///
/// The profile never carries the user's access codes.
pub async fn get_current_user(req: HttpRequest) -> ActixResult<HttpResponse> {
    debug!("Get current user request");

    let ctx = authorize(&req, RouteGuard::Authenticated)?;
    Ok(ok(CurrentUserResponse {
        user: (&ctx.user).into(),
        access: ctx.access,
    }))
}
