//! Authentication configuration

use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT secret
    #[serde(default = "generate_secure_jwt_secret")]
    pub jwt_secret: String,
    /// JWT expiration in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: u64,
    /// Lifetime of a login session (and its unlock flags) in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl: u64,
    /// Interval between expired-session sweeps in seconds
    #[serde(default = "default_session_sweep_interval")]
    pub session_sweep_interval: u64,
    /// Allow self-service registration
    #[serde(default)]
    pub allow_signup: bool,
    /// Password assigned to admin-created members when none is given
    #[serde(default = "default_member_password")]
    pub default_member_password: String,
    /// Super admin created on startup when no users exist
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

/// Initial super admin account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdminConfig {
    pub email: String,
    pub password: String,
    #[serde(default = "default_admin_name")]
    pub name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: generate_secure_jwt_secret(),
            jwt_expiration: default_jwt_expiration(),
            session_ttl: default_session_ttl(),
            session_sweep_interval: default_session_sweep_interval(),
            allow_signup: false,
            default_member_password: default_member_password(),
            bootstrap_admin: None,
        }
    }
}

impl AuthConfig {
    /// Merge auth configurations
    pub fn merge(mut self, other: Self) -> Self {
        if !other.jwt_secret.is_empty() && other.jwt_secret != "your-secret-key" {
            self.jwt_secret = other.jwt_secret;
        }
        if other.jwt_expiration != default_jwt_expiration() {
            self.jwt_expiration = other.jwt_expiration;
        }
        if other.session_ttl != default_session_ttl() {
            self.session_ttl = other.session_ttl;
        }
        if other.session_sweep_interval != default_session_sweep_interval() {
            self.session_sweep_interval = other.session_sweep_interval;
        }
        if other.allow_signup {
            self.allow_signup = other.allow_signup;
        }
        if other.default_member_password != default_member_password() {
            self.default_member_password = other.default_member_password;
        }
        if other.bootstrap_admin.is_some() {
            self.bootstrap_admin = other.bootstrap_admin;
        }
        self
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long for security".to_string());
        }

        if self.jwt_secret == "your-secret-key" || self.jwt_secret == "change-me" {
            return Err(
                "JWT secret must not use default values. Please generate a secure random secret."
                    .to_string(),
            );
        }

        if self.jwt_expiration < 300 {
            return Err("JWT expiration should be at least 5 minutes (300 seconds)".to_string());
        }

        if self.jwt_expiration > 86400 * 30 {
            return Err(
                "JWT expiration should not exceed 30 days for security reasons".to_string(),
            );
        }

        if self.session_ttl < self.jwt_expiration {
            return Err("Session TTL cannot be shorter than the JWT expiration".to_string());
        }

        if self.session_sweep_interval == 0 {
            return Err("Session sweep interval cannot be 0".to_string());
        }

        if self.default_member_password.len() < 6 {
            return Err("Default member password must be at least 6 characters".to_string());
        }

        if let Some(admin) = &self.bootstrap_admin {
            if !crate::utils::is_valid_email(&admin.email) {
                return Err(format!("Bootstrap admin email is invalid: {}", admin.email));
            }
            if admin.password.len() < 8 {
                return Err("Bootstrap admin password must be at least 8 characters".to_string());
            }
        }

        Ok(())
    }
}

fn default_jwt_expiration() -> u64 {
    3600 * 8
}

fn default_session_ttl() -> u64 {
    3600 * 8
}

fn default_session_sweep_interval() -> u64 {
    300
}

fn default_member_password() -> String {
    "member123".to_string()
}

fn default_admin_name() -> String {
    "Super Admin".to_string()
}

/// Generate a secure random JWT secret
fn generate_secure_jwt_secret() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Warn about settings that are acceptable in development only
pub fn warn_insecure_config(config: &AuthConfig) {
    if config.allow_signup {
        warn!("Self-service signup is enabled; any visitor can create a member account");
    }
    if config.default_member_password == default_member_password() {
        warn!("Admin-created members receive the built-in default password");
    }
}
