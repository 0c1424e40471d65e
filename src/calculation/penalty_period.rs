//! Penalty period windowing.

use chrono::NaiveDate;

use crate::models::{AuditStep, PenaltyPeriod};

/// Returns the penalty period containing `date`.
///
/// Total over all valid dates.
pub fn period_for(date: NaiveDate) -> PenaltyPeriod {
    PenaltyPeriod::for_date(date)
}

/// Computes the period for `date` and records the audit step.
pub(crate) fn window_with_audit(date: NaiveDate, step_number: u32) -> (PenaltyPeriod, AuditStep) {
    let period = period_for(date);
    let step = AuditStep {
        step_number,
        rule_id: "penalty_period".to_string(),
        rule_name: "Penalty Period".to_string(),
        input: serde_json::json!({ "violation_date": date.to_string() }),
        output: serde_json::json!({
            "start_date": period.start_date.to_string(),
            "end_date": period.end_date.to_string()
        }),
        reasoning: format!("{} falls in penalty period {}", date, period),
    };
    (period, step)
}
