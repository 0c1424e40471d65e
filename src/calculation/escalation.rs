//! Occurrence escalation.
//!
//! Counts prior violations of the same category within the penalty period
//! and resolves the resulting occurrence number against the category's
//! severity table.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::PenaltyPolicy;
use crate::error::EngineResult;
use crate::history::{HistoryLookupError, ViolationHistoryLookup};
use crate::models::{AuditStep, PenaltyPeriod, SeverityLevel, ViolationCategory};

use super::penalty_period::window_with_audit;
use super::severity_lookup::{SeverityResolution, lookup_with_audit};

/// The result of escalating one violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escalation {
    /// The period in which occurrences were counted.
    pub period: PenaltyPeriod,
    /// Prior same-category violations in the period, plus one.
    pub occurrence_number: u32,
    /// The severity level applied after clamping.
    pub applied_level: u32,
    /// The resolved severity.
    pub severity: SeverityLevel,
}

/// Escalation plus its audit steps.
#[derive(Debug, Clone)]
pub(crate) struct EscalationOutcome {
    pub escalation: Escalation,
    pub audit_steps: Vec<AuditStep>,
}

/// Determines the occurrence number and severity for a violation.
///
/// Only records dated `period.start_date <= d < violation_date` are counted,
/// so the occurrence number depends on the set of prior dates and not on the
/// order in which they were recorded.
///
/// # Errors
///
/// - `MissingConfiguration` if the category has no severity table. This is
///   checked before the history is queried.
/// - `HistoryLookup` if the history store fails. No retry is attempted.
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::calculation::escalate;
/// use attendance_penalty_engine::config::PenaltyPolicy;
/// use attendance_penalty_engine::history::InMemoryViolationLog;
/// use attendance_penalty_engine::models::ViolationCategory;
/// use chrono::NaiveDate;
///
/// let escalation = escalate(
///     "emp_001",
///     ViolationCategory::LateArrival30To45,
///     NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
///     &InMemoryViolationLog::new(),
///     &PenaltyPolicy::default(),
/// )
/// .unwrap();
/// assert_eq!(escalation.occurrence_number, 1);
/// ```
pub fn escalate<H>(
    employee_id: &str,
    category: ViolationCategory,
    violation_date: NaiveDate,
    history: &H,
    policy: &PenaltyPolicy,
) -> EngineResult<Escalation>
where
    H: ViolationHistoryLookup + ?Sized,
{
    escalate_with_audit(employee_id, category, violation_date, history, policy, 1)
        .map(|outcome| outcome.escalation)
}

/// Escalates and records the period, counting and severity audit steps.
pub(crate) fn escalate_with_audit<H>(
    employee_id: &str,
    category: ViolationCategory,
    violation_date: NaiveDate,
    history: &H,
    policy: &PenaltyPolicy,
    start_step_number: u32,
) -> EngineResult<EscalationOutcome>
where
    H: ViolationHistoryLookup + ?Sized,
{
    let mut audit_steps = Vec::with_capacity(3);

    let (period, period_step) = window_with_audit(violation_date, start_step_number);
    audit_steps.push(period_step);

    let table = policy.severity_table(category)?;

    let prior = history.count_prior(employee_id, category, period.start_date, violation_date)?;
    let occurrence_number = prior.checked_add(1).ok_or_else(|| {
        HistoryLookupError::new(format!("prior count {} is out of range", prior))
    })?;

    debug!(
        employee_id,
        category = category.code(),
        prior,
        occurrence_number,
        "Counted prior violations"
    );

    audit_steps.push(AuditStep {
        step_number: start_step_number + 1,
        rule_id: "occurrence_escalation".to_string(),
        rule_name: "Occurrence Escalation".to_string(),
        input: serde_json::json!({
            "employee_id": employee_id,
            "category": category.code(),
            "period_start": period.start_date.to_string(),
            "before_date": violation_date.to_string()
        }),
        output: serde_json::json!({
            "prior_count": prior,
            "occurrence_number": occurrence_number
        }),
        reasoning: format!(
            "{} prior '{}' violation(s) since {}; this is occurrence {}",
            prior, category, period.start_date, occurrence_number
        ),
    });

    let (resolution, severity_step) =
        lookup_with_audit(category, table, occurrence_number, start_step_number + 2)?;
    audit_steps.push(severity_step);

    let SeverityResolution {
        applied_level,
        severity,
        ..
    } = resolution;

    Ok(EscalationOutcome {
        escalation: Escalation {
            period,
            occurrence_number,
            applied_level,
            severity,
        },
        audit_steps,
    })
}
