//! Digital membership ID cards

use crate::config::CardDefaults;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stored card record (collection `id_cards`, keyed by the owner's uid)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdCard {
    pub uid: String,
    pub full_name: String,
    pub member_id: String,
    pub position: String,
    pub profile_image: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub motto: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub issued_date: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub secretary_name: String,
}

/// Card submission from the generator form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub motto: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub issued_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub secretary_name: Option<String>,
}

impl CardForm {
    /// Names of required fields that are empty, in form order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("profileImage", &self.profile_image),
            ("fullName", &self.full_name),
            ("memberId", &self.member_id),
            ("position", &self.position),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| crate::utils::is_blank(value))
        .map(|(name, _)| name)
        .collect()
    }

    /// Photos must be an http(s) URL or a path to an uploaded blob
    pub fn photo_is_valid(&self) -> bool {
        let photo = self.profile_image.trim();
        crate::utils::is_http_url(photo)
            || (photo.starts_with(crate::storage::files::BLOB_ROUTE)
                && crate::storage::files::blob_id_from_url(photo).is_some())
    }

    /// Build the stored record; the account email wins over the submitted one
    pub fn into_card(
        self,
        uid: &str,
        account_email: Option<&str>,
        defaults: &CardDefaults,
        now: DateTime<Utc>,
    ) -> IdCard {
        fn or_default(value: Option<String>, fallback: &str) -> String {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        }

        let email = account_email
            .filter(|e| !e.trim().is_empty())
            .map(str::to_string)
            .or(self.email)
            .unwrap_or_default();

        IdCard {
            uid: uid.to_string(),
            full_name: self.full_name.trim().to_string(),
            member_id: self.member_id.trim().to_string(),
            position: self.position.trim().to_string(),
            profile_image: self.profile_image.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email,
            generated_at: now,
            motto: or_default(self.motto, &defaults.motto),
            batch: or_default(self.batch, &defaults.batch),
            issued_date: or_default(self.issued_date, &defaults.issued_date),
            expiry_date: or_default(self.expiry_date, &defaults.expiry_date),
            secretary_name: or_default(self.secretary_name, &defaults.secretary_name),
        }
    }
}

/// Card face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSide {
    Front,
    Back,
}

impl CardSide {
    /// Lowercase name used in file names and URLs
    pub fn as_str(self) -> &'static str {
        match self {
            CardSide::Front => "front",
            CardSide::Back => "back",
        }
    }

    /// Uppercase name used in page captions
    pub fn label(self) -> &'static str {
        match self {
            CardSide::Front => "FRONT",
            CardSide::Back => "BACK",
        }
    }
}

impl fmt::Display for CardSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "front" => Ok(CardSide::Front),
            "back" => Ok(CardSide::Back),
            other => Err(format!("Unknown card side: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> CardForm {
        CardForm {
            full_name: "Asha Perera".to_string(),
            member_id: "NCSS-042".to_string(),
            position: "Member".to_string(),
            profile_image: "https://cdn.example.org/asha.png".to_string(),
            phone: "+94 771234567".to_string(),
            ..CardForm::default()
        }
    }

    #[test]
    fn test_missing_fields() {
        assert!(complete_form().missing_fields().is_empty());

        let form = CardForm {
            phone: "  ".to_string(),
            profile_image: String::new(),
            ..complete_form()
        };
        assert_eq!(form.missing_fields(), vec!["profileImage", "phone"]);
    }

    #[test]
    fn test_photo_must_be_http_or_blob() {
        assert!(complete_form().photo_is_valid());
        for photo in ["/api/blobs/abc", "http://cdn.example.org/a.png"] {
            let form = CardForm {
                profile_image: photo.to_string(),
                ..complete_form()
            };
            assert!(form.photo_is_valid(), "{}", photo);
        }
        for photo in ["file:///etc/passwd", "ftp://cdn.example.org/a.png", "asha.png", "/api/blobs/"] {
            let form = CardForm {
                profile_image: photo.to_string(),
                ..complete_form()
            };
            assert!(!form.photo_is_valid(), "{}", photo);
        }
    }

    #[test]
    fn test_into_card_applies_defaults() {
        let defaults = CardDefaults::default();
        let card = complete_form().into_card("u1", None, &defaults, Utc::now());

        assert_eq!(card.uid, "u1");
        assert_eq!(card.motto, "Adhipathi Vidya Labha");
        assert_eq!(card.secretary_name, "J. Doe");
        assert_eq!(card.email, "");
    }

    #[test]
    fn test_into_card_prefers_account_email() {
        let form = CardForm {
            email: Some("typed@example.org".to_string()),
            batch: Some("2024".to_string()),
            ..complete_form()
        };
        let card = form.into_card(
            "u1",
            Some("account@ncss.lk"),
            &CardDefaults::default(),
            Utc::now(),
        );
        assert_eq!(card.email, "account@ncss.lk");
        assert_eq!(card.batch, "2024");

        let form = CardForm {
            email: Some("typed@example.org".to_string()),
            ..complete_form()
        };
        let card = form.into_card("u1", None, &CardDefaults::default(), Utc::now());
        assert_eq!(card.email, "typed@example.org");
    }

    #[test]
    fn test_card_side_parsing() {
        assert_eq!("front".parse::<CardSide>().unwrap(), CardSide::Front);
        assert_eq!("BACK".parse::<CardSide>().unwrap(), CardSide::Back);
        assert!("middle".parse::<CardSide>().is_err());
        assert_eq!(CardSide::Back.label(), "BACK");
    }
}
