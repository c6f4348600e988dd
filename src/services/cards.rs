//! ID card records
//!
//! One card per user id in `id_cards`. Saving overwrites the whole record;
//! concurrent saves are last-write-wins.

use crate::config::CardDefaults;
use crate::models::{CardForm, IdCard};
use crate::storage::documents::{
    Collection, DocumentStore, get_typed, list_typed, to_document_data,
};
use crate::utils::error::{PortalError, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct CardService {
    store: Arc<dyn DocumentStore>,
    defaults: CardDefaults,
}

impl CardService {
    pub fn new(store: Arc<dyn DocumentStore>, defaults: CardDefaults) -> Self {
        Self { store, defaults }
    }

    /// Validate a form and save it as the card of `uid`
    ///
    /// `account_email` wins over the email typed into the form.
    pub async fn save(&self, uid: &str, account_email: Option<&str>, form: CardForm) -> Result<IdCard> {
        let missing = form.missing_fields();
        if !missing.is_empty() {
            return Err(PortalError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        if !form.photo_is_valid() {
            return Err(PortalError::validation(
                "profileImage must be an http(s) URL or an uploaded file",
            ));
        }

        let card = form.into_card(uid, account_email, &self.defaults, Utc::now());
        self.store
            .set(Collection::IdCards, uid, to_document_data(&card)?)
            .await?;

        info!(uid, member_id = %card.member_id, "Saved ID card");
        Ok(card)
    }

    pub async fn get(&self, uid: &str) -> Result<Option<IdCard>> {
        get_typed(self.store.as_ref(), Collection::IdCards, uid).await
    }

    /// Fetch a card or fail with `NotFound`
    pub async fn require(&self, uid: &str) -> Result<IdCard> {
        self.get(uid)
            .await?
            .ok_or_else(|| PortalError::not_found("No ID card has been generated"))
    }

    /// Remove a card; removing a missing card is not an error
    pub async fn delete(&self, uid: &str) -> Result<()> {
        if self.store.delete(Collection::IdCards, uid).await? {
            info!(uid, "Deleted ID card");
        }
        Ok(())
    }

    /// Every card, most recently generated first
    pub async fn list(&self) -> Result<Vec<IdCard>> {
        let mut cards: Vec<IdCard> = list_typed(self.store.as_ref(), Collection::IdCards).await?;
        cards.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(cards)
    }
}
