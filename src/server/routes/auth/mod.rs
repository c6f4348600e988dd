//! Authentication endpoints
//!
//! This module provides authentication-related API endpoints.

mod login;
mod models;
mod register;
mod session;
mod user;

pub use login::login;
pub use models::{LoginRequest, LoginResponse, RegisterRequest};
pub use register::register;
pub use session::logout;
pub use user::get_current_user;

use actix_web::web;

/// Configure authentication routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(get_current_user)),
    );
}
