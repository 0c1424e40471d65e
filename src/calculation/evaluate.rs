//! The evaluation pipeline.
//!
//! This module ties classification, period windowing, escalation and
//! severity lookup together into a single [`EvaluationResult`] with an audit
//! trace. It is the entry point callers use for each punch.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::PenaltyPolicy;
use crate::error::EngineResult;
use crate::history::ViolationHistoryLookup;
use crate::models::{
    AuditStep, AuditTrace, EvaluationResult, PunchEvent, RecommendedAction, SeverityLevel,
    ShiftWindow,
};

use super::classifier::classify_punch;
use super::escalation::escalate_with_audit;

/// Evaluates one punch against its shift and the employee's history.
///
/// # Pipeline
///
/// 1. Classify the punch ([`classify_punch`]).
/// 2. For a violation, compute the penalty period, count prior violations and
///    resolve the severity ([`super::escalate`]).
/// 3. Recommend withholding promotion when the deduction reaches the policy
///    threshold.
///
/// Compliant punches stop after step 1 and never touch the history.
///
/// # Errors
///
/// - `InvalidInput` for a zero-length shift or blank employee.
/// - `MissingConfiguration` if the violated category has no severity table.
/// - `HistoryLookup` if the history store fails.
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::calculation::evaluate;
/// use attendance_penalty_engine::config::PenaltyPolicy;
/// use attendance_penalty_engine::history::InMemoryViolationLog;
/// use attendance_penalty_engine::models::{PunchDirection, PunchEvent, ShiftWindow};
/// use chrono::{NaiveDateTime, NaiveTime};
///
/// let shift = ShiftWindow::new(
///     NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
/// )
/// .unwrap();
/// let punch = PunchEvent::new(
///     "emp_001",
///     NaiveDateTime::parse_from_str("2026-01-15 08:05:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     PunchDirection::In,
/// )
/// .unwrap();
///
/// let result = evaluate(&shift, &punch, &InMemoryViolationLog::new(), &PenaltyPolicy::default()).unwrap();
/// assert!(!result.violated);
/// ```
pub fn evaluate<H>(
    shift: &ShiftWindow,
    punch: &PunchEvent,
    history: &H,
    policy: &PenaltyPolicy,
) -> EngineResult<EvaluationResult>
where
    H: ViolationHistoryLookup + ?Sized,
{
    let mut trace = AuditTrace::default();

    let classification =
        classify_punch(shift, punch, policy.thresholds(), trace.next_step_number())?;
    trace.steps.push(classification.audit_step);

    let Some(category) = classification.category else {
        debug!(
            employee_id = %punch.employee_id,
            direction = %punch.direction,
            reason = %classification.description,
            "No violation"
        );
        return Ok(EvaluationResult::no_violation(
            classification.deviation_minutes,
            classification.description,
            trace,
        ));
    };

    let violation_date = shift.shift_date(punch.timestamp);
    let outcome = escalate_with_audit(
        &punch.employee_id,
        category,
        violation_date,
        history,
        policy,
        trace.next_step_number(),
    )?;
    trace.steps.extend(outcome.audit_steps);
    let escalation = outcome.escalation;

    let recommended_action = recommend_action(&escalation.severity, policy, violation_date)
        .map(|(action, step)| {
            let step = AuditStep {
                step_number: trace.next_step_number(),
                ..step
            };
            trace.steps.push(step);
            action
        });

    info!(
        employee_id = %punch.employee_id,
        category = category.code(),
        occurrence = escalation.occurrence_number,
        level = escalation.applied_level,
        percentage = %escalation.severity.deduction_percentage(),
        "Violation evaluated"
    );

    Ok(EvaluationResult {
        violated: true,
        category: Some(category),
        occurrence_number: Some(escalation.occurrence_number),
        applied_level: Some(escalation.applied_level),
        severity: Some(escalation.severity),
        violation_date: Some(violation_date),
        period: Some(escalation.period),
        deviation_minutes: classification.deviation_minutes,
        description: classification.description,
        recommended_action,
        audit_trace: trace,
    })
}

/// Returns a withhold-promotion recommendation when the deduction reaches the threshold.
fn recommend_action(
    severity: &SeverityLevel,
    policy: &PenaltyPolicy,
    effective_date: NaiveDate,
) -> Option<(RecommendedAction, AuditStep)> {
    let percentage = severity.deduction_percentage();
    let threshold = policy.withhold_promotion_percentage();
    if severity.is_warning() || percentage < threshold {
        return None;
    }

    let step = AuditStep {
        step_number: 0,
        rule_id: "withhold_promotion".to_string(),
        rule_name: "Withhold Promotion".to_string(),
        input: serde_json::json!({
            "deduction_percentage": percentage.to_string(),
            "threshold": threshold.to_string()
        }),
        output: serde_json::json!({
            "action": "withhold_promotion",
            "effective_date": effective_date.to_string()
        }),
        reasoning: format!(
            "Deduction of {}% reaches the {}% threshold; withhold next promotion",
            percentage, threshold
        ),
    };

    Some((RecommendedAction::WithholdPromotion { effective_date }, step))
}
