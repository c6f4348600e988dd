//! User login endpoint

use crate::server::routes::ok;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::{info, warn};

use super::models::{LoginRequest, LoginResponse};

/// User login endpoint
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    info!("User login attempt: {}", request.email);

    let user = state
        .users
        .authenticate(&request.email, &request.password)
        .await
        .inspect_err(|e| warn!("Login failed for {}: {}", request.email, e))?;

    let session = state.auth.issue(&user)?;
    info!(uid = %user.uid, session_id = %session.session_id, "User logged in successfully");

    Ok(ok(LoginResponse {
        session,
        user: (&user).into(),
    }))
}
