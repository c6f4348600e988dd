//! User registration endpoint

use crate::models::UserProfile;
use crate::server::state::AppState;
use crate::server::routes::ApiResponse;
use crate::services::NewUser;
use crate::utils::error::PortalError;
use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::info;

use super::models::RegisterRequest;

/// User registration endpoint
///
/// Only open when `auth.allow_signup` is set; accounts start as members.
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    if !state.config.auth().allow_signup {
        return Err(PortalError::forbidden("Registration is disabled").into());
    }
    info!("User registration attempt: {}", request.email);

    let request = request.into_inner();
    if request.password.is_empty() {
        return Err(PortalError::validation("Password is required").into());
    }

    let user = state
        .users
        .create(NewUser {
            name: request.name,
            email: request.email,
            password: Some(request.password),
            role: None,
            designation: None,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(UserProfile::from(&user))))
}
