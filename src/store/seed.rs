//! Placeholder data written on first launch

use crate::core::model::{Expense, FinancialSnapshot, Recipient, Transaction};
use crate::core::store::SnapshotStore;
use anyhow::Result;
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use tracing::info;

fn days_ago(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(today)
}

/// Builds the snapshot shown before the first successful refresh. Dates are
/// relative to `today` so the chart is never empty on a fresh install.
pub fn placeholder_snapshot(today: NaiveDate) -> FinancialSnapshot {
    let expenses = [
        ("local_1", 100, 25, "Food"),
        ("local_2", 65, 20, "Transport"),
        ("local_3", 180, 15, "Shopping"),
        ("local_4", 45, 10, "Entertainment"),
        ("local_5", 130, 5, "Utilities"),
        ("local_6", 80, 1, "Food"),
    ]
    .into_iter()
    .map(|(id, amount, days, category)| Expense {
        id: id.to_string(),
        amount: Decimal::from(amount),
        date: days_ago(today, days),
        category: category.to_string(),
    })
    .collect();

    let recipients = [
        ("local_1", "Alice", 100),
        ("local_2", "Bob", 65),
        ("local_3", "Charlie", 180),
        ("local_4", "David", 45),
        ("local_5", "Esther", 45),
        ("local_6", "Frank", 45),
        ("local_7", "Gabe", 45),
    ]
    .into_iter()
    .map(|(id, name, recent)| Recipient {
        id: id.to_string(),
        name: name.to_string(),
        avatar_ref: None,
        recent_amount: Decimal::from(recent),
    })
    .collect();

    let recent_transactions = [
        ("local_1", 100, 1, "local_1", "Alice", "Food", false),
        ("local_2", 65, 5, "local_2", "Company", "Income", true),
        ("local_3", 180, 10, "local_3", "Charlie", "Shopping", false),
        ("local_4", 45, 15, "local_4", "David", "Entertainment", false),
        ("local_5", 250, 20, "local_1", "Company", "Income", true),
    ]
    .into_iter()
    .map(
        |(id, amount, days, recipient_id, recipient_name, category, is_income)| Transaction {
            id: id.to_string(),
            amount: Decimal::from(amount),
            date: days_ago(today, days),
            recipient_id: recipient_id.to_string(),
            recipient_name: recipient_name.to_string(),
            category: category.to_string(),
            is_income,
        },
    )
    .collect();

    FinancialSnapshot {
        user_name: "John".to_string(),
        balance: Decimal::from(25000),
        expenses,
        recipients,
        recent_transactions,
    }
}

/// Writes the placeholder snapshot when the store holds nothing yet.
///
/// Returns `true` if the store was seeded.
pub async fn seed_if_empty(store: &dyn SnapshotStore, today: NaiveDate) -> Result<bool> {
    if store.read().await.is_some() {
        return Ok(false);
    }
    store.write(&placeholder_snapshot(today)).await?;
    info!("Seeded local store with placeholder data");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_placeholder_dates_are_relative_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let snapshot = placeholder_snapshot(today);

        assert_eq!(snapshot.balance, Decimal::from(25000));
        assert_eq!(snapshot.expenses.len(), 6);
        assert_eq!(
            snapshot.expenses.first().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 5, 21).unwrap()
        );
        assert_eq!(
            snapshot.expenses.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
        );
        assert_eq!(snapshot.recipients.len(), 7);
        assert_eq!(snapshot.recent_transactions.len(), 5);
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let store = MemoryStore::new();

        assert!(seed_if_empty(&store, today).await.unwrap());
        assert_eq!(store.read().await, Some(placeholder_snapshot(today)));

        let mut custom = placeholder_snapshot(today);
        custom.user_name = "Jane".to_string();
        store.write(&custom).await.unwrap();

        assert!(!seed_if_empty(&store, today).await.unwrap());
        assert_eq!(store.read().await.unwrap().user_name, "Jane");
    }
}
