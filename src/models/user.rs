//! Member accounts and roles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Privilege level, ordered from least to most privileged
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Role {
    /// Regular society member
    #[default]
    #[serde(rename = "USER")]
    Member,
    /// Committee member with admin access
    #[serde(rename = "MEMBER_ADMIN")]
    Admin,
    /// Full administrative control
    #[serde(rename = "SUPER_ADMIN")]
    SuperAdmin,
}

impl Role {
    /// Admin and super admin pass every admin check
    pub fn is_admin(self) -> bool {
        self >= Role::Admin
    }

    /// Whether an account with this role may edit or delete one with `target`
    ///
    /// Super admin accounts are never managed from the admin pages.
    pub fn can_manage(self, target: Role) -> bool {
        target != Role::SuperAdmin && target <= self
    }

    /// Wire name of the role
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Member => "USER",
            Role::Admin => "MEMBER_ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::Member),
            "MEMBER_ADMIN" => Ok(Role::Admin),
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Stored member record (collection `users`, keyed by uid)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub designation: Option<String>,
    /// Unlocks ID card generation when entered verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
    /// Unlocks the transparency view when entered verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Name shown in the UI
    pub fn display(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

/// User record as returned to its owner; codes are never echoed back
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub designation: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserProfile {
    fn from(user: &UserRecord) -> Self {
        Self {
            uid: user.uid.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            display_name: user.display_name.clone(),
            role: user.role,
            designation: user.designation.clone(),
            created_at: user.created_at,
        }
    }
}

/// Login credential (collection `credentials`, keyed by lowercase email)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub uid: String,
    pub password_hash: String,
}

/// Normalized key under which a credential is stored
pub fn credential_key(email: &str) -> String {
    email.trim().to_lowercase()
}
