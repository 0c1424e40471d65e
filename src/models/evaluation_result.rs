//! Evaluation result models for the Attendance Penalty Engine.
//!
//! This module contains the [`EvaluationResult`] type and its associated
//! structures capturing the decision made for one punch: the category, the
//! occurrence number, the resolved severity, any recommended follow-up
//! action, and an audit trace of each pipeline stage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PenaltyPeriod, SeverityLevel, ViolationCategory};

/// A follow-up the caller should apply alongside the violation record.
///
/// The engine never mutates employee data itself; it only recommends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RecommendedAction {
    /// Withhold the employee's next promotion or allowance increase.
    WithholdPromotion {
        /// The violation date that triggered the recommendation.
        effective_date: NaiveDate,
    },
}

/// A single step in the audit trace recording a pipeline decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete audit trace for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of pipeline steps.
    pub steps: Vec<AuditStep>,
}

impl AuditTrace {
    /// The number to give the next step.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }
}

/// The outcome of evaluating one punch against a shift.
///
/// When `violated` is false every optional field is `None`, and
/// `description` carries the classifier's reason (on time, grace, ...).
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::models::{AuditTrace, EvaluationResult};
///
/// let result = EvaluationResult::no_violation(0, "On time or early", AuditTrace::default());
/// assert!(!result.violated);
/// assert!(result.category.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Whether the punch is a violation.
    pub violated: bool,
    /// The violation category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ViolationCategory>,
    /// The raw occurrence number within the period (prior count + 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence_number: Option<u32>,
    /// The severity level applied after clamping to the table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_level: Option<u32>,
    /// The resolved severity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<SeverityLevel>,
    /// The date the violation is filed under: the day the shift started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_date: Option<NaiveDate>,
    /// The penalty period used for counting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<PenaltyPeriod>,
    /// Minutes late (IN) or early (OUT), floored and never negative.
    pub deviation_minutes: i64,
    /// Human-readable description of the decision.
    pub description: String,
    /// Follow-up for the caller to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_action: Option<RecommendedAction>,
    /// Audit trace of every stage that ran.
    pub audit_trace: AuditTrace,
}

impl EvaluationResult {
    /// A result for a compliant punch.
    pub fn no_violation(
        deviation_minutes: i64,
        description: impl Into<String>,
        audit_trace: AuditTrace,
    ) -> Self {
        Self {
            violated: false,
            category: None,
            occurrence_number: None,
            applied_level: None,
            severity: None,
            violation_date: None,
            period: None,
            deviation_minutes,
            description: description.into(),
            recommended_action: None,
            audit_trace,
        }
    }
}
