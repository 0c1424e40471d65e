//! Request types for the Attendance Penalty Engine API.
//!
//! Fields a caller may forget are optional here so that a missing time is
//! reported as `INVALID_INPUT` naming the field, rather than as a JSON error.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{PunchDirection, PunchEvent, ShiftWindow};

/// Request body for the `/evaluate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// The scheduled shift.
    pub shift: ShiftRequest,
    /// The punch to evaluate.
    pub punch: PunchRequest,
    /// Whether to append the resulting violation to the log.
    #[serde(default = "default_record")]
    pub record: bool,
}

fn default_record() -> bool {
    true
}

/// Shift times in an evaluation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftRequest {
    /// Scheduled start, e.g. `"08:00:00"`.
    #[serde(default)]
    pub start: Option<NaiveTime>,
    /// Scheduled end.
    #[serde(default)]
    pub end: Option<NaiveTime>,
}

/// Punch data in an evaluation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PunchRequest {
    /// The employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Local date and time of the punch, e.g. `"2026-01-15T08:32:00"`.
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    /// `IN` or `OUT`.
    #[serde(default)]
    pub direction: Option<PunchDirection>,
}

impl TryFrom<ShiftRequest> for ShiftWindow {
    type Error = EngineError;

    fn try_from(req: ShiftRequest) -> EngineResult<Self> {
        let start = req
            .start
            .ok_or_else(|| EngineError::invalid_input("shift.start", "start time is required"))?;
        let end = req
            .end
            .ok_or_else(|| EngineError::invalid_input("shift.end", "end time is required"))?;
        ShiftWindow::new(start, end)
    }
}

impl TryFrom<PunchRequest> for PunchEvent {
    type Error = EngineError;

    fn try_from(req: PunchRequest) -> EngineResult<Self> {
        let employee_id = req.employee_id.ok_or_else(|| {
            EngineError::invalid_input("punch.employee_id", "employee is required")
        })?;
        let timestamp = req.timestamp.ok_or_else(|| {
            EngineError::invalid_input("punch.timestamp", "timestamp is required")
        })?;
        let direction = req.direction.ok_or_else(|| {
            EngineError::invalid_input("punch.direction", "direction must be IN or OUT")
        })?;
        PunchEvent::new(employee_id, timestamp, direction)
    }
}

/// Query parameters for `GET /penalties/summary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryQuery {
    /// Restrict to one employee.
    pub employee_id: Option<String>,
    /// First violation date to include.
    pub from: Option<NaiveDate>,
    /// Last violation date to include.
    pub to: Option<NaiveDate>,
}

impl SummaryQuery {
    /// Rejects an inverted date range.
    pub fn validate(&self) -> EngineResult<()> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if to < from => Err(EngineError::invalid_input(
                "to",
                format!("{} is before {}", to, from),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults_to_true() {
        let json = r#"{
            "shift": {"start": "08:00:00", "end": "16:00:00"},
            "punch": {"employee_id": "emp_001", "timestamp": "2026-01-15T08:32:00", "direction": "IN"}
        }"#;
        let req: EvaluationRequest = serde_json::from_str(json).unwrap();
        assert!(req.record);

        let punch = PunchEvent::try_from(req.punch).unwrap();
        assert_eq!(punch.direction, PunchDirection::In);
        let shift = ShiftWindow::try_from(req.shift).unwrap();
        assert!(!shift.is_overnight());
    }

    #[test]
    fn test_missing_shift_time_names_the_field() {
        let req = ShiftRequest {
            start: NaiveTime::from_hms_opt(8, 0, 0),
            end: None,
        };
        match ShiftWindow::try_from(req) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "shift.end"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_timestamp_names_the_field() {
        let req = PunchRequest {
            employee_id: Some("emp_001".to_string()),
            timestamp: None,
            direction: Some(PunchDirection::Out),
        };
        match PunchEvent::try_from(req) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "punch.timestamp"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_summary_range_is_rejected() {
        let query = SummaryQuery {
            employee_id: None,
            from: NaiveDate::from_ymd_opt(2026, 2, 1),
            to: NaiveDate::from_ymd_opt(2026, 1, 1),
        };
        assert!(query.validate().is_err());
    }
}
