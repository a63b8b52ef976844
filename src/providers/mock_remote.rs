use crate::core::model::{Expense, FinancialSnapshot, Recipient, Transaction};
use crate::core::remote::RemoteSource;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, instrument};

/// Simulated backend that answers after a fixed delay with data dated
/// relative to the current local day.
pub struct MockRemoteSource {
    latency: Duration,
    fail: bool,
}

impl MockRemoteSource {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            fail: false,
        }
    }

    /// A source whose every fetch fails after the delay.
    pub fn failing(latency: Duration) -> Self {
        Self {
            latency,
            fail: true,
        }
    }
}

fn days_ago(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(today)
}

fn mock_snapshot(today: NaiveDate) -> FinancialSnapshot {
    let expense = |id: &str, amount: i64, days: u64, category: &str| Expense {
        id: id.to_string(),
        amount: Decimal::from(amount),
        date: days_ago(today, days),
        category: category.to_string(),
    };
    let recipient = |id: &str, name: &str, recent: i64| Recipient {
        id: id.to_string(),
        name: name.to_string(),
        avatar_ref: None,
        recent_amount: Decimal::from(recent),
    };
    let transaction =
        |id: &str, amount: i64, days: u64, to: (&str, &str), category: &str, is_income: bool| {
            Transaction {
                id: id.to_string(),
                amount: Decimal::from(amount),
                date: days_ago(today, days),
                recipient_id: to.0.to_string(),
                recipient_name: to.1.to_string(),
                category: category.to_string(),
                is_income,
            }
        };

    FinancialSnapshot {
        user_name: "John".to_string(),
        balance: Decimal::from(34996),
        expenses: vec![
            expense("1", 120, 25, "Food"),
            expense("2", 75, 20, "Transport"),
            expense("3", 200, 15, "Shopping"),
            expense("4", 50, 10, "Entertainment"),
            expense("5", 150, 5, "Utilities"),
            expense("6", 90, 1, "Food"),
        ],
        recipients: vec![
            recipient("1", "Alice", 120),
            recipient("2", "Bob", 75),
            recipient("3", "Charlie", 200),
            recipient("4", "David", 50),
            recipient("5", "Esther", 50),
            recipient("6", "Frank", 50),
            recipient("7", "Gabe", 50),
        ],
        recent_transactions: vec![
            transaction("1", 120, 1, ("1", "Alice"), "Food", false),
            transaction("2", 75, 5, ("2", "Company"), "Income", true),
            transaction("3", 200, 10, ("3", "Charlie"), "Shopping", false),
            transaction("4", 50, 15, ("4", "David"), "Entertainment", false),
            transaction("5", 300, 20, ("1", "Company"), "Income", true),
        ],
    }
}

#[async_trait]
impl RemoteSource for MockRemoteSource {
    #[instrument(name = "MockRemoteFetch", skip(self))]
    async fn fetch(&self) -> Result<FinancialSnapshot> {
        debug!("Simulating network latency of {:?}", self.latency);
        tokio::time::sleep(self.latency).await;

        if self.fail {
            return Err(anyhow!("Mock backend is unavailable"));
        }
        Ok(mock_snapshot(Local::now().date_naive()))
    }
}
