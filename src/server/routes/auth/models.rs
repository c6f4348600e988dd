//! Request and response models for authentication endpoints

use crate::auth::{AccessState, IssuedSession};
use crate::models::UserProfile;
use serde::{Deserialize, Serialize};

/// Self-service registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub session: IssuedSession,
    pub user: UserProfile,
}

/// Current caller with the unlock flags of their session
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user: UserProfile,
    pub access: AccessState,
}
