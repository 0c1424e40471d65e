//! Deduction arithmetic for payroll.
//!
//! Severity magnitudes are percentages of one day's wage. These helpers turn
//! them into currency amounts and total an employee's penalties over a salary
//! slip period so a payroll run can add a single "Attendance Penalty" line.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{SeverityLevel, ViolationRecord};

/// Days per month used to derive a daily wage.
pub const DAYS_PER_MONTH: i64 = 30;

/// Name of the salary component penalties are booked against.
pub const ATTENDANCE_PENALTY_COMPONENT: &str = "Attendance Penalty";

/// Attendance penalties totalled over a salary slip period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDeduction {
    /// The employee.
    pub employee_id: String,
    /// First day of the slip period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the slip period (inclusive).
    pub end_date: NaiveDate,
    /// The salary component name.
    pub component: String,
    /// Sum of deduction percentages.
    pub total_percentage: Decimal,
    /// Currency amount, rounded to cents.
    pub amount: Decimal,
    /// Number of records contributing, warnings included.
    pub record_count: u32,
}

/// Converts a monthly base salary into a daily wage (`base / 30`).
///
/// # Errors
///
/// Returns `InvalidInput` if the salary is negative.
pub fn daily_wage_from_monthly(monthly_base: Decimal) -> EngineResult<Decimal> {
    if monthly_base < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "monthly_base",
            "salary cannot be negative",
        ));
    }
    Ok(monthly_base / Decimal::from(DAYS_PER_MONTH))
}

/// The amount deducted for one severity level.
///
/// Warnings deduct nothing. The result is not rounded.
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::calculation::penalty_amount;
/// use attendance_penalty_engine::models::SeverityLevel;
/// use rust_decimal::Decimal;
///
/// let level = SeverityLevel::deduction(2, Decimal::new(5, 0));
/// assert_eq!(penalty_amount(&level, Decimal::new(300, 0)), Decimal::new(15, 0));
/// ```
pub fn penalty_amount(severity: &SeverityLevel, daily_wage: Decimal) -> Decimal {
    severity.deduction_percentage() / Decimal::ONE_HUNDRED * daily_wage
}

/// Totals one employee's penalties dated within `[start_date, end_date]`.
///
/// # Errors
///
/// Returns `InvalidInput` if the range is inverted or the daily wage is negative.
pub fn period_deduction<'a>(
    records: impl IntoIterator<Item = &'a ViolationRecord>,
    employee_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    daily_wage: Decimal,
) -> EngineResult<PeriodDeduction> {
    if end_date < start_date {
        return Err(EngineError::invalid_input(
            "end_date",
            format!("{} is before {}", end_date, start_date),
        ));
    }
    if daily_wage < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "daily_wage",
            "wage cannot be negative",
        ));
    }

    let (total_percentage, record_count) = records
        .into_iter()
        .filter(|r| {
            r.employee_id == employee_id
                && r.violation_date >= start_date
                && r.violation_date <= end_date
        })
        .fold((Decimal::ZERO, 0u32), |(total, count), r| {
            (total + r.severity.deduction_percentage(), count + 1)
        });

    let amount = (total_percentage / Decimal::ONE_HUNDRED * daily_wage)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok(PeriodDeduction {
        employee_id: employee_id.to_string(),
        start_date,
        end_date,
        component: ATTENDANCE_PENALTY_COMPONENT.to_string(),
        total_percentage,
        amount,
        record_count,
    })
}
