//! Authentication and authorization system
//!
//! Login sessions, access-code unlocks and route guards.

pub mod access_code;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod session;

pub use access_code::{AccessCodeVerifier, UnlockOutcome};
pub use guard::{RouteGuard, RoutePath};
pub use session::{AccessFlag, AccessState, Feature, SessionRegistry};

use crate::config::AuthConfig;
use crate::models::UserRecord;
use crate::utils::error::{PortalError, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// Caller identity attached to an authenticated request
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Fresh user record
    pub user: UserRecord,
    /// Login session the request belongs to
    pub session_id: Uuid,
    /// Session unlock flags at request time
    pub access: AccessState,
}

impl AuthContext {
    pub fn user_id(&self) -> &str {
        &self.user.uid
    }

    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }

    /// Admin privilege bypasses every feature gate
    pub fn can_use(&self, feature: Feature) -> bool {
        self.is_admin() || self.access.is_unlocked(feature)
    }
}

/// Token handed out on login
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub session_id: Uuid,
}

/// Verified token: who is calling and from which session
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub user_id: String,
    pub session_id: Uuid,
    pub access: AccessState,
}

/// Main authentication system
#[derive(Debug, Clone)]
pub struct AuthSystem {
    /// Authentication configuration
    config: Arc<AuthConfig>,
    /// JWT handler
    jwt: Arc<jwt::JwtHandler>,
    /// Open sessions and their unlock flags
    sessions: Arc<SessionRegistry>,
}

impl AuthSystem {
    /// Create a new authentication system
    pub fn new(config: &AuthConfig) -> Self {
        info!("Initializing authentication system");

        Self {
            jwt: Arc::new(jwt::JwtHandler::new(config)),
            sessions: Arc::new(SessionRegistry::new(config.session_ttl)),
            config: Arc::new(config.clone()),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Open a session for a user and sign a token bound to it
    pub fn issue(&self, user: &UserRecord) -> Result<IssuedSession> {
        let (session_id, _) = self.sessions.open(&user.uid);
        let access_token = self
            .jwt
            .create_access_token(&user.uid, user.role, session_id)
            .inspect_err(|_| {
                self.sessions.close(session_id);
            })?;

        Ok(IssuedSession {
            access_token,
            token_type: "Bearer",
            expires_in: self.jwt.expiration(),
            session_id,
        })
    }

    /// Verify a bearer token and the session it names
    pub fn authenticate(&self, token: &str) -> Result<VerifiedSession> {
        let claims = self
            .jwt
            .verify_token(token)
            .map_err(|_| PortalError::unauthorized("Invalid or expired token"))?;

        let session = self
            .sessions
            .get(claims.session_id)
            .filter(|s| s.user_id == claims.sub)
            .ok_or_else(|| PortalError::unauthorized("Session expired"))?;

        debug!(user_id = %claims.sub, session_id = %claims.session_id, "Authenticated request");
        Ok(VerifiedSession {
            user_id: claims.sub,
            session_id: claims.session_id,
            access: session.access,
        })
    }

    /// End a session; both unlock flags go with it
    pub fn logout(&self, session_id: Uuid) -> bool {
        let closed = self.sessions.close(session_id);
        if closed {
            info!(%session_id, "Session closed");
        }
        closed
    }

    /// Start the background task pruning expired sessions
    pub fn spawn_session_sweeper(&self) -> JoinHandle<()> {
        let interval = std::time::Duration::from_secs(self.config.session_sweep_interval.max(1));
        self.sessions.clone().spawn_sweeper(interval)
    }
}
