//! In-memory violation log.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::models::{ViolationCategory, ViolationRecord};

use super::{HistoryLookupError, ViolationHistoryLookup};

/// Aggregated penalties for one employee and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltySummaryRow {
    /// The employee.
    pub employee_id: String,
    /// The violation category.
    pub category: ViolationCategory,
    /// How many records fall in the summary range.
    pub occurrence_count: u32,
    /// Sum of the deduction percentages of those records.
    pub total_percentage: Decimal,
    /// The most recent violation date.
    pub last_violation_date: NaiveDate,
}

/// An append-only, in-memory store of finalized violation records.
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::history::{InMemoryViolationLog, ViolationHistoryLookup};
/// use attendance_penalty_engine::models::ViolationCategory;
/// use chrono::NaiveDate;
///
/// let log = InMemoryViolationLog::new();
/// let count = log
///     .count_prior(
///         "emp_001",
///         ViolationCategory::EarlyDeparture,
///         NaiveDate::from_ymd_opt(2025, 12, 21).unwrap(),
///         NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
///     )
///     .unwrap();
/// assert_eq!(count, 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryViolationLog {
    records: Vec<ViolationRecord>,
}

impl InMemoryViolationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log pre-populated with records.
    pub fn with_records(records: impl IntoIterator<Item = ViolationRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Appends a finalized record and returns its id.
    ///
    /// A record for a punch that is already logged (same employee, date,
    /// category and punch reference) is not stored again; the id of the
    /// existing record is returned instead.
    pub fn record(&mut self, record: ViolationRecord) -> Uuid {
        if let Some(existing) = self.find_recorded(&record) {
            debug!(
                employee_id = %record.employee_id,
                punch_reference = %record.punch_reference,
                "Punch already recorded"
            );
            return existing.id;
        }
        let id = record.id;
        self.records.push(record);
        id
    }

    fn find_recorded(&self, record: &ViolationRecord) -> Option<&ViolationRecord> {
        if record.punch_reference.is_empty() {
            return None;
        }
        self.records.iter().find(|r| {
            r.punch_reference == record.punch_reference
                && r.employee_id == record.employee_id
                && r.violation_date == record.violation_date
                && r.category == record.category
        })
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records have been stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records for an employee, oldest violation first.
    pub fn records_for_employee(&self, employee_id: &str) -> Vec<&ViolationRecord> {
        let mut records: Vec<&ViolationRecord> = self
            .records
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .collect();
        records.sort_by_key(|r| r.violation_date);
        records
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[ViolationRecord] {
        &self.records
    }

    /// Summarises penalties per employee and category.
    ///
    /// Each filter is optional; `from` and `to` are inclusive. Rows are sorted
    /// by employee, then by descending total percentage.
    pub fn summary(
        &self,
        employee_id: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Vec<PenaltySummaryRow> {
        let mut grouped: BTreeMap<(String, ViolationCategory), PenaltySummaryRow> =
            BTreeMap::new();

        let matching = self.records.iter().filter(|r| {
            employee_id.is_none_or(|id| r.employee_id == id)
                && from.is_none_or(|d| r.violation_date >= d)
                && to.is_none_or(|d| r.violation_date <= d)
        });

        for record in matching {
            let row = grouped
                .entry((record.employee_id.clone(), record.category))
                .or_insert_with(|| PenaltySummaryRow {
                    employee_id: record.employee_id.clone(),
                    category: record.category,
                    occurrence_count: 0,
                    total_percentage: Decimal::ZERO,
                    last_violation_date: record.violation_date,
                });
            row.occurrence_count += 1;
            row.total_percentage += record.severity.deduction_percentage();
            row.last_violation_date = row.last_violation_date.max(record.violation_date);
        }

        let mut rows: Vec<PenaltySummaryRow> = grouped.into_values().collect();
        rows.sort_by(|a, b| {
            a.employee_id
                .cmp(&b.employee_id)
                .then(b.total_percentage.cmp(&a.total_percentage))
        });
        rows
    }
}

impl ViolationHistoryLookup for InMemoryViolationLog {
    fn count_prior(
        &self,
        employee_id: &str,
        category: ViolationCategory,
        period_start: NaiveDate,
        before_date: NaiveDate,
    ) -> Result<u32, HistoryLookupError> {
        let count = self
            .records
            .iter()
            .filter(|r| {
                r.employee_id == employee_id
                    && r.category == category
                    && r.violation_date >= period_start
                    && r.violation_date < before_date
            })
            .count();
        Ok(count as u32)
    }
}
