//! Financial data shown on the home screen

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Suffixes that older builds appended to the user name to show where the
/// data came from.
const ORIGIN_SUFFIXES: [&str; 2] = [" (Network)", " (Local DB)"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar_ref: Option<String>,
    pub recent_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    /// Not checked against the recipients list.
    pub recipient_id: String,
    /// Recipient name at the time of the transaction.
    pub recipient_name: String,
    pub category: String,
    pub is_income: bool,
}

/// The complete home screen bundle. Always cached and replaced as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub user_name: String,
    pub balance: Decimal,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub recipients: Vec<Recipient>,
    #[serde(default)]
    pub recent_transactions: Vec<Transaction>,
}

impl FinancialSnapshot {
    pub fn total_expenses(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    pub fn recent_transactions_newest_first(&self) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = self.recent_transactions.iter().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        transactions
    }

    /// Returns a copy with origin markers removed from the user name.
    pub fn cleaned(mut self) -> Self {
        self.user_name = clean_user_name(&self.user_name);
        self
    }
}

/// Removes the origin markers (" (Network)", " (Local DB)") from a user name.
pub fn clean_user_name(name: &str) -> String {
    ORIGIN_SUFFIXES
        .iter()
        .fold(name.to_string(), |acc, suffix| acc.replace(suffix, ""))
}

/// Where a snapshot handed out by the repository came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataOrigin {
    Local,
    Remote,
}

impl Display for DataOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DataOrigin::Local => "Local Database",
                DataOrigin::Remote => "Network",
            }
        )
    }
}
