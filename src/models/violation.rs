//! Violation categories and historical violation records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EvaluationResult, PunchEvent, SeverityLevel};

/// The kind of attendance violation a punch can produce.
///
/// The set is fixed; the minute ranges that select each category are
/// configuration (see [`crate::config::ClassificationThresholds`]).
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::models::ViolationCategory;
///
/// let category = ViolationCategory::LateArrival15To30;
/// assert_eq!(category.to_string(), "Late Arrival 15-30 Minutes");
/// assert!(category.is_late_arrival());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// Late by at least 15 and under 30 minutes.
    #[serde(rename = "late_arrival_15_30")]
    LateArrival15To30,
    /// Late by at least 30 and under 45 minutes.
    #[serde(rename = "late_arrival_30_45")]
    LateArrival30To45,
    /// Late by at least 45 and under 75 minutes.
    #[serde(rename = "late_arrival_45_75")]
    LateArrival45To75,
    /// Late by 75 minutes or more.
    #[serde(rename = "late_arrival_over_75")]
    LateArrivalOver75,
    /// Left more than 15 minutes before shift end.
    EarlyDeparture,
}

impl ViolationCategory {
    /// All categories, late arrivals first in ascending order.
    pub const ALL: [ViolationCategory; 5] = [
        ViolationCategory::LateArrival15To30,
        ViolationCategory::LateArrival30To45,
        ViolationCategory::LateArrival45To75,
        ViolationCategory::LateArrivalOver75,
        ViolationCategory::EarlyDeparture,
    ];

    /// Returns true for the four late-arrival buckets.
    pub fn is_late_arrival(&self) -> bool {
        !matches!(self, ViolationCategory::EarlyDeparture)
    }

    /// Stable identifier used in configuration files and audit steps.
    pub fn code(&self) -> &'static str {
        match self {
            ViolationCategory::LateArrival15To30 => "late_arrival_15_30",
            ViolationCategory::LateArrival30To45 => "late_arrival_30_45",
            ViolationCategory::LateArrival45To75 => "late_arrival_45_75",
            ViolationCategory::LateArrivalOver75 => "late_arrival_over_75",
            ViolationCategory::EarlyDeparture => "early_departure",
        }
    }
}

impl std::fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationCategory::LateArrival15To30 => write!(f, "Late Arrival 15-30 Minutes"),
            ViolationCategory::LateArrival30To45 => write!(f, "Late Arrival 30-45 Minutes"),
            ViolationCategory::LateArrival45To75 => write!(f, "Late Arrival 45-75 Minutes"),
            ViolationCategory::LateArrivalOver75 => write!(f, "Late Arrival Over 75 Minutes"),
            ViolationCategory::EarlyDeparture => write!(f, "Early Departure Over 15 Minutes"),
        }
    }
}

/// A finalized violation, as persisted by the caller.
///
/// Records are immutable once created. The engine only reads them back
/// through [`crate::history::ViolationHistoryLookup`] to count occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee who committed the violation.
    pub employee_id: String,
    /// The violation category.
    pub category: ViolationCategory,
    /// The date the violated shift started on.
    pub violation_date: NaiveDate,
    /// Reference of the punch that produced the record.
    ///
    /// See [`PunchEvent::reference`]. Empty for records without a known punch.
    #[serde(default)]
    pub punch_reference: String,
    /// The raw occurrence number within the penalty period.
    pub occurrence_number: u32,
    /// The severity level actually applied (clamped to the table).
    pub applied_level: u32,
    /// The resolved severity.
    pub severity: SeverityLevel,
    /// Minutes late or early, floored.
    pub deviation_minutes: i64,
    /// Human-readable description of the violation.
    pub description: String,
}

impl ViolationRecord {
    /// Builds the record a caller should persist for a violating evaluation.
    ///
    /// Returns `None` when the evaluation found no violation.
    pub fn from_evaluation(punch: &PunchEvent, result: &EvaluationResult) -> Option<Self> {
        if !result.violated {
            return None;
        }

        Some(ViolationRecord {
            id: Uuid::new_v4(),
            employee_id: punch.employee_id.clone(),
            category: result.category?,
            violation_date: result.violation_date?,
            punch_reference: punch.reference(),
            occurrence_number: result.occurrence_number?,
            applied_level: result.applied_level?,
            severity: result.severity.clone()?,
            deviation_minutes: result.deviation_minutes,
            description: result.description.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serialization_uses_codes() {
        for category in ViolationCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.code()));
        }
    }

    #[test]
    fn test_category_deserialization() {
        let category: ViolationCategory = serde_json::from_str("\"late_arrival_over_75\"").unwrap();
        assert_eq!(category, ViolationCategory::LateArrivalOver75);

        let category: ViolationCategory = serde_json::from_str("\"early_departure\"").unwrap();
        assert_eq!(category, ViolationCategory::EarlyDeparture);
    }

    #[test]
    fn test_only_early_departure_is_not_late_arrival() {
        let late: Vec<_> = ViolationCategory::ALL
            .iter()
            .filter(|c| c.is_late_arrival())
            .collect();
        assert_eq!(late.len(), 4);
        assert!(!ViolationCategory::EarlyDeparture.is_late_arrival());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(
            ViolationCategory::LateArrival45To75.to_string(),
            "Late Arrival 45-75 Minutes"
        );
        assert_eq!(
            ViolationCategory::EarlyDeparture.to_string(),
            "Early Departure Over 15 Minutes"
        );
    }
}
