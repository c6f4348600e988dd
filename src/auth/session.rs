//! Login sessions and their unlock flags
//!
//! Each login opens a session holding two independent flags, one for ID card
//! generation and one for the transparency view. Both start locked, flip to
//! unlocked when the matching access code is entered, and disappear with the
//! session on logout or expiry.

use crate::utils::error::{PortalError, Result};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// Upper bound on session lifetime (one year)
const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// State of one unlock flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessFlag {
    #[default]
    Locked,
    Unlocked,
}

impl AccessFlag {
    pub fn unlock(&mut self) {
        *self = AccessFlag::Unlocked;
    }

    pub fn lock(&mut self) {
        *self = AccessFlag::Locked;
    }

    pub fn is_unlocked(self) -> bool {
        self == AccessFlag::Unlocked
    }
}

/// Features gated behind an access code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    IdCard,
    Transparency,
}

impl Feature {
    pub fn as_str(self) -> &'static str {
        match self {
            Feature::IdCard => "id_card",
            Feature::Transparency => "transparency",
        }
    }
}

/// Unlock flags of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessState {
    pub id_card: AccessFlag,
    pub transparency: AccessFlag,
}

impl AccessState {
    fn flag_mut(&mut self, feature: Feature) -> &mut AccessFlag {
        match feature {
            Feature::IdCard => &mut self.id_card,
            Feature::Transparency => &mut self.transparency,
        }
    }

    pub fn is_unlocked(&self, feature: Feature) -> bool {
        match feature {
            Feature::IdCard => self.id_card.is_unlocked(),
            Feature::Transparency => self.transparency.is_unlocked(),
        }
    }

    pub fn unlock(&mut self, feature: Feature) {
        self.flag_mut(feature).unlock();
    }

    pub fn lock(&mut self, feature: Feature) {
        self.flag_mut(feature).lock();
    }
}

/// A live login session
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub user_id: String,
    pub access: AccessState,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionEntry {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Registry of open sessions, keyed by session id
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, SessionEntry>,
    ttl: Duration,
}

impl SessionRegistry {
    /// Create a registry whose sessions live for `ttl_secs`
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::seconds(ttl_secs.min(MAX_SESSION_TTL_SECS) as i64),
        }
    }

    /// Open a session for a user with both flags locked
    pub fn open(&self, user_id: &str) -> (Uuid, SessionEntry) {
        let now = Utc::now();
        let session_id = Uuid::new_v4();
        let entry = SessionEntry {
            user_id: user_id.to_string(),
            access: AccessState::default(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.insert(session_id, entry.clone());
        debug!(%session_id, user_id, "Opened session");
        (session_id, entry)
    }

    /// Live session by id; expired sessions are dropped on sight
    pub fn get(&self, session_id: Uuid) -> Option<SessionEntry> {
        let entry = self.sessions.get(&session_id).map(|e| e.value().clone())?;
        if entry.is_expired_at(Utc::now()) {
            self.sessions.remove(&session_id);
            return None;
        }
        Some(entry)
    }

    /// Unlock features on a session owned by `user_id`
    pub fn unlock(&self, session_id: Uuid, user_id: &str, features: &[Feature]) -> Result<AccessState> {
        self.update(session_id, user_id, |access| {
            for feature in features {
                access.unlock(*feature);
            }
        })
    }

    /// Lock a feature again on a session owned by `user_id`
    pub fn lock(&self, session_id: Uuid, user_id: &str, feature: Feature) -> Result<AccessState> {
        self.update(session_id, user_id, |access| access.lock(feature))
    }

    fn update<F>(&self, session_id: Uuid, user_id: &str, apply: F) -> Result<AccessState>
    where
        F: FnOnce(&mut AccessState),
    {
        let now = Utc::now();
        let mut entry = self
            .sessions
            .get_mut(&session_id)
            .filter(|e| e.user_id == user_id && !e.is_expired_at(now))
            .ok_or_else(|| PortalError::unauthorized("Session expired"))?;
        apply(&mut entry.access);
        Ok(entry.access)
    }

    /// End a session; its flags are discarded
    pub fn close(&self, session_id: Uuid) -> bool {
        self.sessions.remove(&session_id).is_some()
    }

    /// End every session of a user
    pub fn close_user(&self, user_id: &str) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.user_id != user_id);
        before - self.sessions.len()
    }

    /// Drop sessions that expired before `now`
    pub fn prune_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !entry.is_expired_at(now));
        before - self.sessions.len()
    }

    /// Number of sessions currently held
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Periodically prune expired sessions
    pub fn spawn_sweeper(self: Arc<Self>, interval: std::time::Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let pruned = self.prune_expired_at(Utc::now());
                if pruned > 0 {
                    info!(pruned, remaining = self.len(), "Pruned expired sessions");
                }
            }
        })
    }
}
