//! Penalty period model.
//!
//! This module contains the [`PenaltyPeriod`] type: the fixed monthly window
//! (day 21 through day 20 of the following month) within which violation
//! occurrences are counted.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Day of the month on which every penalty period starts.
pub const PERIOD_START_DAY: u32 = 21;

/// Day of the month on which every penalty period ends.
pub const PERIOD_END_DAY: u32 = 20;

/// A penalty period with inclusive start and end dates.
///
/// Periods are derived from a violation date and never stored.
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::models::PenaltyPeriod;
/// use chrono::NaiveDate;
///
/// let period = PenaltyPeriod::for_date(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
/// assert_eq!(period.start_date, NaiveDate::from_ymd_opt(2025, 12, 21).unwrap());
/// assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2026, 1, 20).unwrap());
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PenaltyPeriod {
    /// The first day of the period (always the 21st).
    pub start_date: NaiveDate,
    /// The last day of the period (always the 20th).
    pub end_date: NaiveDate,
}

impl PenaltyPeriod {
    /// Computes the penalty period containing `date`.
    ///
    /// On or after the 21st, the period runs from the 21st of this month to
    /// the 20th of the next. Before the 21st, it runs from the 21st of the
    /// previous month to the 20th of this one. December and January roll over
    /// the year.
    pub fn for_date(date: NaiveDate) -> Self {
        let (year, month) = (date.year(), date.month());

        let (start_year, start_month) = if date.day() >= PERIOD_START_DAY {
            (year, month)
        } else if month == 1 {
            (year - 1, 12)
        } else {
            (year, month - 1)
        };

        let (end_year, end_month) = if start_month == 12 {
            (start_year + 1, 1)
        } else {
            (start_year, start_month + 1)
        };

        Self {
            start_date: NaiveDate::from_ymd_opt(start_year, start_month, PERIOD_START_DAY)
                .expect("day 21 exists in every month"),
            end_date: NaiveDate::from_ymd_opt(end_year, end_month, PERIOD_END_DAY)
                .expect("day 20 exists in every month"),
        }
    }

    /// Checks if a given date falls within this period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// The number of calendar days in the period.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

impl std::fmt::Display for PenaltyPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start_date, self.end_date)
    }
}
