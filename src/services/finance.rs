//! Ledger entries and project funding requests

use super::dashboard::by_date_desc;
use crate::models::finance::parse_date;
use crate::models::{
    FundingRequest, NewFundingRequest, NewTransaction, RequestStatus, Transaction, UserRecord,
};
use crate::storage::documents::{Collection, DocumentStore, list_typed, to_document_data};
use crate::utils::error::{PortalError, Result};
use crate::utils::is_blank;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct FinanceService {
    store: Arc<dyn DocumentStore>,
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(PortalError::validation("Amount must be a positive number"));
    }
    Ok(())
}

impl FinanceService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Ledger, most recent first
    pub async fn list_funds(&self) -> Result<Vec<Transaction>> {
        let mut funds: Vec<Transaction> = list_typed(self.store.as_ref(), Collection::Funds).await?;
        funds.sort_by(|a, b| by_date_desc(&a.date, &b.date));
        Ok(funds)
    }

    /// Record an income or expense entry
    pub async fn add_fund(&self, entry: NewTransaction) -> Result<Transaction> {
        if is_blank(&entry.kind) {
            return Err(PortalError::validation("Transaction type is required"));
        }
        validate_amount(entry.amount)?;
        if parse_date(&entry.date).is_none() {
            return Err(PortalError::validation(format!("Invalid date: {}", entry.date)));
        }

        let mut transaction = Transaction {
            id: String::new(),
            kind: Some(entry.kind.trim().to_lowercase()),
            amount: entry.amount,
            description: entry.description.trim().to_string(),
            date: entry.date.trim().to_string(),
            source: entry.source.filter(|s| !is_blank(s)),
        };
        let doc = self
            .store
            .add(Collection::Funds, to_document_data(&transaction)?)
            .await?;
        transaction.id = doc.id;

        info!(id = %transaction.id, kind = ?transaction.kind, amount = transaction.amount, "Recorded transaction");
        Ok(transaction)
    }

    pub async fn delete_fund(&self, id: &str) -> Result<bool> {
        let deleted = self.store.delete(Collection::Funds, id).await?;
        if deleted {
            info!(id, "Deleted transaction");
        }
        Ok(deleted)
    }

    /// File a pending funding request on behalf of `requester`
    pub async fn submit_request(
        &self,
        requester: &UserRecord,
        request: NewFundingRequest,
    ) -> Result<FundingRequest> {
        if is_blank(&request.project_name) {
            return Err(PortalError::validation("Project name is required"));
        }
        validate_amount(request.amount)?;

        let mut record = FundingRequest {
            id: String::new(),
            requester_id: requester.uid.clone(),
            requester_name: requester.display().to_string(),
            project_name: request.project_name.trim().to_string(),
            description: request.description.trim().to_string(),
            amount: request.amount,
            status: RequestStatus::Pending,
            date: Utc::now().to_rfc3339(),
            proof_url: request.proof_url.filter(|u| !is_blank(u)),
            deadline: request.deadline.filter(|d| !is_blank(d)),
        };
        let doc = self
            .store
            .add(Collection::ProjectRequests, to_document_data(&record)?)
            .await?;
        record.id = doc.id;

        info!(id = %record.id, requester = %record.requester_id, "Submitted funding request");
        Ok(record)
    }

    /// Every funding request, most recent first
    pub async fn list_requests(&self) -> Result<Vec<FundingRequest>> {
        let mut requests: Vec<FundingRequest> =
            list_typed(self.store.as_ref(), Collection::ProjectRequests).await?;
        requests.sort_by(|a, b| by_date_desc(&a.date, &b.date));
        Ok(requests)
    }

    /// Requests filed by one member
    pub async fn requests_for(&self, uid: &str) -> Result<Vec<FundingRequest>> {
        let mut requests = self.list_requests().await?;
        requests.retain(|r| r.requester_id == uid);
        Ok(requests)
    }

    pub async fn set_request_status(&self, id: &str, status: RequestStatus) -> Result<FundingRequest> {
        let doc = self
            .store
            .update(Collection::ProjectRequests, id, json!({ "status": status }))
            .await?;
        info!(id, status = status.as_str(), "Updated funding request");
        doc.decode()
    }
}
