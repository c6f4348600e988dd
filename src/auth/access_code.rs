//! Access-code verification
//!
//! Admins assign each member up to two codes: one unlocks ID card
//! generation, the other unlocks the transparency view. A submitted code is
//! compared verbatim against both, so a member whose two codes are identical
//! unlocks both features with a single entry.

use super::session::{AccessState, Feature, SessionRegistry};
use crate::models::UserRecord;
use crate::storage::documents::{Collection, DocumentStore, get_typed};
use crate::utils::error::{PortalError, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Which stored codes a submitted code matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodeMatch {
    pub id_card: bool,
    pub transparency: bool,
}

impl CodeMatch {
    pub fn any(self) -> bool {
        self.id_card || self.transparency
    }

    /// Features to unlock, in a fixed order
    pub fn features(self) -> Vec<Feature> {
        let mut features = Vec::with_capacity(2);
        if self.id_card {
            features.push(Feature::IdCard);
        }
        if self.transparency {
            features.push(Feature::Transparency);
        }
        features
    }
}

/// Exact, case-sensitive comparison; unset or empty codes never match
fn code_matches(input: &str, stored: Option<&str>) -> bool {
    stored.is_some_and(|code| !code.is_empty() && code == input)
}

/// Compare a submitted code against both of a user's codes
pub fn match_codes(input: &str, user: &UserRecord) -> CodeMatch {
    CodeMatch {
        id_card: code_matches(input, user.access_code.as_deref()),
        transparency: code_matches(input, user.transparency_code.as_deref()),
    }
}

/// Result of a successful verification
#[derive(Debug, Clone, Serialize)]
pub struct UnlockOutcome {
    /// Features this code unlocked
    pub unlocked: Vec<Feature>,
    /// Session flags after the unlock
    pub access: AccessState,
}

/// Verifies access codes and flips session flags on a match
#[derive(Debug, Clone)]
pub struct AccessCodeVerifier {
    store: Arc<dyn DocumentStore>,
    sessions: Arc<SessionRegistry>,
}

impl AccessCodeVerifier {
    pub fn new(store: Arc<dyn DocumentStore>, sessions: Arc<SessionRegistry>) -> Self {
        Self { store, sessions }
    }

    /// Check `code` for the user owning `session_id`
    ///
    /// Fails without touching any flag when the code is empty, the user
    /// record is missing, the store cannot be read, or nothing matches.
    pub async fn verify(&self, user_id: &str, session_id: Uuid, code: &str) -> Result<UnlockOutcome> {
        if code.is_empty() {
            return Err(PortalError::validation("Access code is required"));
        }

        let user: UserRecord = get_typed(self.store.as_ref(), Collection::Users, user_id)
            .await?
            .ok_or_else(|| PortalError::not_found("User record not found"))?;

        let matched = match_codes(code, &user);
        if !matched.any() {
            warn!(user_id, "Access code did not match");
            return Err(PortalError::invalid_code("Invalid access code"));
        }

        let unlocked = matched.features();
        let access = self.sessions.unlock(session_id, user_id, &unlocked)?;
        info!(
            user_id,
            features = ?unlocked.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
            "Unlocked session features"
        );

        Ok(UnlockOutcome { unlocked, access })
    }
}
