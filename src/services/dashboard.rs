//! Admin dashboard figures
//!
//! The aggregation functions are pure and recompute everything from the full
//! lists they are given. [`DashboardProjection`] keeps three live
//! subscriptions (funds, funding requests, users) and folds their latest
//! snapshots on every read; the channels are independent of each other.

use crate::models::{FundingRequest, RequestStatus, Transaction, UserRecord};
use crate::storage::documents::{Collection, DocumentStore, Subscription};
use crate::utils::error::Result;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::cmp::Ordering;

/// Number of trailing months in the chart series
pub const SERIES_MONTHS: u32 = 6;
/// Pending requests listed on the dashboard
pub const RECENT_PENDING_LIMIT: usize = 5;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Income and expense of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    pub label: &'static str,
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub expense: f64,
}

/// Everything the dashboard cards and chart show
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub net_balance: f64,
    pub monthly_income: f64,
    pub monthly_series: Vec<MonthBucket>,
    pub pending_count: usize,
    pub recent_pending: Vec<FundingRequest>,
    pub total_users: usize,
}

/// Transparency page payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransparencyReport {
    #[serde(flatten)]
    pub summary: DashboardSummary,
    pub transactions: Vec<Transaction>,
}

/// Sum in ascending value order so the result does not depend on input order
pub fn ordered_sum(amounts: impl IntoIterator<Item = f64>) -> f64 {
    let mut amounts: Vec<f64> = amounts.into_iter().collect();
    amounts.sort_by(f64::total_cmp);
    amounts.into_iter().sum()
}

/// Total income minus total expense
pub fn net_balance(transactions: &[Transaction]) -> f64 {
    ordered_sum(
        transactions
            .iter()
            .map(|tx| if tx.is_income() { tx.amount } else { -tx.amount }),
    )
}

/// Income dated within the calendar month of `today`
pub fn monthly_income(transactions: &[Transaction], today: NaiveDate) -> f64 {
    ordered_sum(
        transactions
            .iter()
            .filter(|tx| tx.is_income())
            .filter(|tx| {
                tx.parsed_date()
                    .is_some_and(|d| d.year() == today.year() && d.month() == today.month())
            })
            .map(|tx| tx.amount),
    )
}

/// Trailing monthly buckets, oldest first, ending with the month of `today`
pub fn six_month_series(transactions: &[Transaction], today: NaiveDate) -> Vec<MonthBucket> {
    let current = today.year() * 12 + today.month0() as i32;

    let mut buckets: Vec<MonthBucket> = (0..SERIES_MONTHS as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            let month0 = index.rem_euclid(12) as usize;
            MonthBucket {
                label: MONTH_LABELS[month0],
                year: index.div_euclid(12),
                month: month0 as u32 + 1,
                income: 0.0,
                expense: 0.0,
            }
        })
        .collect();

    let mut amounts: Vec<(Vec<f64>, Vec<f64>)> = vec![Default::default(); buckets.len()];
    for tx in transactions {
        let Some(date) = tx.parsed_date() else {
            continue;
        };
        let Some(index) = buckets
            .iter()
            .position(|b| b.year == date.year() && b.month == date.month())
        else {
            continue;
        };
        if tx.is_income() {
            amounts[index].0.push(tx.amount);
        } else {
            amounts[index].1.push(tx.amount);
        }
    }

    for (bucket, (income, expense)) in buckets.iter_mut().zip(amounts) {
        bucket.income = ordered_sum(income);
        bucket.expense = ordered_sum(expense);
    }
    buckets
}

/// Pending requests, most recent first
pub fn pending_requests(requests: &[FundingRequest]) -> Vec<FundingRequest> {
    let mut pending: Vec<FundingRequest> = requests
        .iter()
        .filter(|r| r.status == RequestStatus::Pending)
        .cloned()
        .collect();
    pending.sort_by(|a, b| by_date_desc(&a.date, &b.date));
    pending
}

/// Newest first; unparseable dates sort last
pub fn by_date_desc(a: &str, b: &str) -> Ordering {
    let (a, b) = (crate::models::finance::parse_date(a), crate::models::finance::parse_date(b));
    b.cmp(&a)
}

/// Fold the three collections into the dashboard figures
pub fn summarize(
    transactions: &[Transaction],
    requests: &[FundingRequest],
    total_users: usize,
    now: DateTime<Utc>,
) -> DashboardSummary {
    let today = now.date_naive();
    let pending = pending_requests(requests);

    DashboardSummary {
        net_balance: net_balance(transactions),
        monthly_income: monthly_income(transactions, today),
        monthly_series: six_month_series(transactions, today),
        pending_count: pending.len(),
        recent_pending: pending.into_iter().take(RECENT_PENDING_LIMIT).collect(),
        total_users,
    }
}

/// Live dashboard state backed by three collection subscriptions
#[derive(Debug, Clone)]
pub struct DashboardProjection {
    funds: Subscription<Transaction>,
    requests: Subscription<FundingRequest>,
    users: Subscription<UserRecord>,
}

impl DashboardProjection {
    /// Subscribe to funds, funding requests and users
    pub async fn open(store: &dyn DocumentStore) -> Result<Self> {
        Ok(Self {
            funds: Subscription::new(Collection::Funds, store.subscribe(Collection::Funds).await?),
            requests: Subscription::new(
                Collection::ProjectRequests,
                store.subscribe(Collection::ProjectRequests).await?,
            ),
            users: Subscription::new(Collection::Users, store.subscribe(Collection::Users).await?),
        })
    }

    /// Figures as of the latest snapshots
    pub fn summary(&self, now: DateTime<Utc>) -> DashboardSummary {
        summarize(
            &self.funds.current(),
            &self.requests.current(),
            self.users.len(),
            now,
        )
    }

    /// Transactions, most recent first
    pub fn transactions(&self) -> Vec<Transaction> {
        let mut transactions = self.funds.current();
        transactions.sort_by(|a, b| by_date_desc(&a.date, &b.date));
        transactions
    }

    pub fn transparency(&self, now: DateTime<Utc>) -> TransparencyReport {
        TransparencyReport {
            summary: self.summary(now),
            transactions: self.transactions(),
        }
    }

    /// Wait for any of the three channels to publish
    pub async fn changed(&mut self) -> Result<()> {
        tokio::select! {
            res = self.funds.changed() => res,
            res = self.requests.changed() => res,
            res = self.users.changed() => res,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::documents::MemoryDocumentStore;
    use chrono::TimeZone;
    use serde_json::json;
    use std::time::Duration;

    fn tx(kind: &str, amount: f64, date: &str) -> Transaction {
        Transaction {
            id: String::new(),
            kind: Some(kind.to_string()),
            amount,
            description: String::new(),
            date: date.to_string(),
            source: None,
        }
    }

    fn request(status: RequestStatus, date: &str) -> FundingRequest {
        FundingRequest {
            id: date.to_string(),
            requester_id: "u1".to_string(),
            requester_name: "Asha".to_string(),
            project_name: "Rocketry".to_string(),
            description: String::new(),
            amount: 10.0,
            status,
            date: date.to_string(),
            proof_url: None,
            deadline: None,
        }
    }

    fn feb_2025() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 14, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_balance_and_monthly_income() {
        let txs = vec![
            tx("income", 100.0, "2025-01-10"),
            tx("expense", 30.0, "2025-01-12"),
            tx("income", 50.0, "2025-02-03"),
        ];
        let summary = summarize(&txs, &[], 0, feb_2025());

        assert_eq!(summary.monthly_income, 50.0);
        assert_eq!(summary.net_balance, 120.0);
    }

    #[test]
    fn test_balance_is_order_independent() {
        let mut txs = vec![
            tx("income", 100.0, "2025-01-10"),
            tx("expense", 30.0, "2025-01-12"),
            tx("Income", 50.0, "2025-02-03"),
            tx("transfer", 5.0, "2024-12-01"),
        ];
        let forward = net_balance(&txs);
        txs.reverse();
        assert_eq!(net_balance(&txs), forward);
        txs.swap(0, 2);
        assert_eq!(net_balance(&txs), forward);
        assert_eq!(forward, 115.0);
    }

    #[test]
    fn test_decimal_amounts_sum_the_same_in_any_order() {
        let mut txs = vec![
            tx("income", 0.1, "2025-02-01"),
            tx("income", 0.2, "2025-02-02"),
            tx("income", 0.3, "2025-02-03"),
        ];
        let today = feb_2025().date_naive();
        let forward = (net_balance(&txs), monthly_income(&txs, today), six_month_series(&txs, today));
        txs.reverse();
        assert_eq!(net_balance(&txs), forward.0);
        assert_eq!(monthly_income(&txs, today), forward.1);
        assert_eq!(six_month_series(&txs, today), forward.2);
        txs.swap(0, 1);
        assert_eq!(net_balance(&txs), forward.0);
    }

    #[test]
    fn test_series_spans_year_boundary() {
        let txs = vec![
            tx("income", 10.0, "2024-09-30"),
            tx("expense", 4.0, "2024-12-31T23:00:00Z"),
            tx("income", 7.0, "2025-02-01"),
            tx("income", 99.0, "2024-08-31"),
        ];
        let series = six_month_series(&txs, feb_2025().date_naive());

        let labels: Vec<_> = series.iter().map(|b| b.label).collect();
        assert_eq!(labels, ["Sep", "Oct", "Nov", "Dec", "Jan", "Feb"]);
        assert_eq!((series[0].year, series[0].month), (2024, 9));
        assert_eq!(series[0].income, 10.0);
        assert_eq!(series[3].expense, 4.0);
        assert_eq!(series[5].income, 7.0);
        assert_eq!(series[1].income + series[1].expense, 0.0);
    }

    #[test]
    fn test_unparseable_dates_only_affect_balance() {
        let txs = vec![tx("income", 40.0, "someday"), tx("income", 2.0, "2025-02-01")];
        let summary = summarize(&txs, &[], 0, feb_2025());

        assert_eq!(summary.net_balance, 42.0);
        assert_eq!(summary.monthly_income, 2.0);
        let charted: f64 = summary.monthly_series.iter().map(|b| b.income).sum();
        assert_eq!(charted, 2.0);
    }

    #[test]
    fn test_pending_requests() {
        let mut requests: Vec<_> = (1..=7)
            .map(|d| request(RequestStatus::Pending, &format!("2025-01-0{}", d)))
            .collect();
        requests.push(request(RequestStatus::Approved, "2025-01-09"));

        let summary = summarize(&[], &requests, 3, feb_2025());
        assert_eq!(summary.pending_count, 7);
        assert_eq!(summary.recent_pending.len(), RECENT_PENDING_LIMIT);
        assert_eq!(summary.recent_pending[0].date, "2025-01-07");
        assert_eq!(summary.total_users, 3);
    }

    #[tokio::test]
    async fn test_projection_follows_store() {
        let store = MemoryDocumentStore::new();
        let mut projection = DashboardProjection::open(&store).await.unwrap();
        assert_eq!(projection.summary(feb_2025()).net_balance, 0.0);

        store
            .add(
                Collection::Funds,
                json!({"type": "income", "amount": 25, "date": "2025-02-02"}),
            )
            .await
            .unwrap();
        tokio::time::timeout(Duration::from_secs(1), projection.changed())
            .await
            .unwrap()
            .unwrap();

        store
            .set(Collection::Users, "u1", json!({"email": "a@ncss.lk", "name": "A"}))
            .await
            .unwrap();
        store
            .add(
                Collection::ProjectRequests,
                json!({"projectName": "Telescope", "amount": 5, "status": "pending", "date": "2025-02-01"}),
            )
            .await
            .unwrap();

        let summary = projection.summary(feb_2025());
        assert_eq!(summary.net_balance, 25.0);
        assert_eq!(summary.monthly_income, 25.0);
        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.total_users, 1);
        assert_eq!(projection.transactions().len(), 1);
    }
}
