//! Calculation logic for the Attendance Penalty Engine.
//!
//! This module contains the decision pipeline for a single punch: violation
//! classification, penalty period windowing, occurrence escalation and
//! severity lookup, combined by [`evaluate`]. It also provides the deduction
//! arithmetic used to turn severities into payroll amounts.

mod classifier;
mod deduction;
mod escalation;
mod evaluate;
mod penalty_period;
mod severity_lookup;

pub use classifier::{ClassificationResult, classify, classify_punch};
pub use deduction::{
    ATTENDANCE_PENALTY_COMPONENT, DAYS_PER_MONTH, PeriodDeduction, daily_wage_from_monthly,
    penalty_amount, period_deduction,
};
pub use escalation::{Escalation, escalate};
pub use evaluate::evaluate;
pub use penalty_period::period_for;
pub use severity_lookup::{SeverityResolution, resolve_severity};
