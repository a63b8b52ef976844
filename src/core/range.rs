//! Time windows for the expense trend chart

use anyhow::Result;
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Ordered from the shortest window to the longest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum TimeRange {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "5D")]
    FiveDays,
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl TimeRange {
    pub const ALL: [TimeRange; 6] = [
        TimeRange::OneDay,
        TimeRange::FiveDays,
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
    ];

    /// First day of the window ending on `today`.
    ///
    /// Month and year windows use calendar arithmetic, so the day of month is
    /// clamped when the target month is shorter (31 March minus one month is
    /// the last day of February).
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        let start = match self {
            TimeRange::OneDay => today.checked_sub_days(Days::new(1)),
            TimeRange::FiveDays => today.checked_sub_days(Days::new(5)),
            TimeRange::OneMonth => today.checked_sub_months(Months::new(1)),
            TimeRange::ThreeMonths => today.checked_sub_months(Months::new(3)),
            TimeRange::SixMonths => today.checked_sub_months(Months::new(6)),
            TimeRange::OneYear => today.checked_sub_months(Months::new(12)),
        };
        start.unwrap_or(NaiveDate::MIN)
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TimeRange::OneDay => "1D",
                TimeRange::FiveDays => "5D",
                TimeRange::OneMonth => "1M",
                TimeRange::ThreeMonths => "3M",
                TimeRange::SixMonths => "6M",
                TimeRange::OneYear => "1Y",
            }
        )
    }
}

impl FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "1D" => Ok(TimeRange::OneDay),
            "5D" => Ok(TimeRange::FiveDays),
            "1M" => Ok(TimeRange::OneMonth),
            "3M" => Ok(TimeRange::ThreeMonths),
            "6M" => Ok(TimeRange::SixMonths),
            "1Y" => Ok(TimeRange::OneYear),
            _ => Err(anyhow::anyhow!("Invalid time range: {}", s)),
        }
    }
}
