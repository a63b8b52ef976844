//! Expense selection for the trend chart

use crate::core::{Expense, TimeRange};
use chrono::NaiveDate;

/// Returns the expenses dated within `[range start, today]`, oldest first.
///
/// The sort is stable, so expenses on the same day keep their input order.
pub fn filter_for_range(expenses: &[Expense], range: TimeRange, today: NaiveDate) -> Vec<Expense> {
    let start = range.start_date(today);
    let mut selected: Vec<Expense> = expenses
        .iter()
        .filter(|e| e.date >= start && e.date <= today)
        .cloned()
        .collect();
    selected.sort_by_key(|e| e.date);
    selected
}
