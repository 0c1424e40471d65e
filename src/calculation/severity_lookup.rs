//! Severity lookup.
//!
//! Maps an occurrence number onto a row of a category's severity table.
//! Occurrences beyond the table are clamped to its highest level, and a
//! sparse table resolves a missing level to the nearest lower one.

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, SeverityLevel, SeverityTable, ViolationCategory};

/// A resolved severity level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityResolution {
    /// `min(occurrence_number, max_level)`.
    pub applied_level: u32,
    /// The row used.
    pub severity: SeverityLevel,
    /// False when the table had no row for `applied_level` and a fallback was used.
    pub exact: bool,
}

/// Resolves the severity for an occurrence number.
///
/// # Errors
///
/// Returns `InvalidInput` for occurrence number zero.
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::calculation::resolve_severity;
/// use attendance_penalty_engine::config::PenaltyPolicy;
/// use attendance_penalty_engine::models::ViolationCategory;
/// use rust_decimal::Decimal;
///
/// let policy = PenaltyPolicy::default();
/// let table = policy.severity_table(ViolationCategory::LateArrival15To30).unwrap();
///
/// let resolution = resolve_severity(table, 7).unwrap();
/// assert_eq!(resolution.applied_level, 4);
/// assert_eq!(resolution.severity.magnitude, Decimal::new(20, 0));
/// ```
pub fn resolve_severity(table: &SeverityTable, occurrence_number: u32) -> EngineResult<SeverityResolution> {
    if occurrence_number == 0 {
        return Err(EngineError::invalid_input(
            "occurrence_number",
            "occurrence numbers start at 1",
        ));
    }

    let applied_level = occurrence_number.min(table.max_level());

    if let Some(level) = table.get(applied_level) {
        return Ok(SeverityResolution {
            applied_level,
            severity: level.clone(),
            exact: true,
        });
    }

    // Sparse table: nearest lower row, then the top row.
    let fallback = table
        .floor(applied_level)
        .or_else(|| table.highest())
        .ok_or_else(|| EngineError::invalid_configuration("severity table has no levels"))?;

    warn!(
        requested = applied_level,
        used = fallback.occurrence_number,
        "Severity level not defined; using fallback level"
    );

    Ok(SeverityResolution {
        applied_level,
        severity: fallback.clone(),
        exact: false,
    })
}

/// Resolves the severity and records the audit step.
pub(crate) fn lookup_with_audit(
    category: ViolationCategory,
    table: &SeverityTable,
    occurrence_number: u32,
    step_number: u32,
) -> EngineResult<(SeverityResolution, AuditStep)> {
    let resolution = resolve_severity(table, occurrence_number)?;

    let mut reasoning = if resolution.severity.is_warning() {
        format!("Level {} of '{}': warning", resolution.applied_level, category)
    } else {
        format!(
            "Level {} of '{}': {}% of daily wage",
            resolution.applied_level,
            category,
            resolution.severity.magnitude
        )
    };
    if occurrence_number > table.max_level() {
        reasoning.push_str(&format!(
            " (occurrence {} clamped to highest level {})",
            occurrence_number,
            table.max_level()
        ));
    }
    if !resolution.exact {
        reasoning.push_str(&format!(
            " (level {} not defined, used level {})",
            resolution.applied_level, resolution.severity.occurrence_number
        ));
    }

    let step = AuditStep {
        step_number,
        rule_id: "severity_lookup".to_string(),
        rule_name: "Severity Lookup".to_string(),
        input: serde_json::json!({
            "category": category.code(),
            "occurrence_number": occurrence_number,
            "max_level": table.max_level()
        }),
        output: serde_json::json!({
            "applied_level": resolution.applied_level,
            "kind": resolution.severity.kind,
            "magnitude": resolution.severity.magnitude.to_string(),
            "exact": resolution.exact
        }),
        reasoning,
    };

    Ok((resolution, step))
}
