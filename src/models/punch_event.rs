//! Punch event model.
//!
//! A punch is a single clock-in or clock-out produced by the time-clock
//! integration. Punches are facts and are never mutated.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The direction of a punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PunchDirection {
    /// Clock-in at the start of a shift.
    In,
    /// Clock-out at the end of a shift.
    Out,
}

impl std::fmt::Display for PunchDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PunchDirection::In => write!(f, "IN"),
            PunchDirection::Out => write!(f, "OUT"),
        }
    }
}

/// A timestamped clock event for one employee.
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::models::{PunchDirection, PunchEvent};
/// use chrono::NaiveDateTime;
///
/// let punch = PunchEvent::new(
///     "emp_001",
///     NaiveDateTime::parse_from_str("2026-01-15 08:32:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     PunchDirection::In,
/// )
/// .unwrap();
/// assert_eq!(punch.date().to_string(), "2026-01-15");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchEvent {
    /// The employee who punched.
    pub employee_id: String,
    /// When the punch happened (local wall-clock time).
    pub timestamp: NaiveDateTime,
    /// Whether this was a clock-in or clock-out.
    pub direction: PunchDirection,
}

impl PunchEvent {
    /// Creates a validated punch event.
    ///
    /// Returns `InvalidInput` if the employee identifier is blank.
    pub fn new(
        employee_id: impl Into<String>,
        timestamp: NaiveDateTime,
        direction: PunchDirection,
    ) -> EngineResult<Self> {
        let punch = Self {
            employee_id: employee_id.into(),
            timestamp,
            direction,
        };
        punch.validate()?;
        Ok(punch)
    }

    /// Checks the invariants a deserialized punch may not satisfy.
    pub fn validate(&self) -> EngineResult<()> {
        if self.employee_id.trim().is_empty() {
            return Err(EngineError::invalid_input(
                "punch.employee_id",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// The calendar date of the punch.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// The time of day of the punch.
    pub fn time(&self) -> NaiveTime {
        self.timestamp.time()
    }

    /// Identifies the punch itself: employee, timestamp and direction.
    ///
    /// Two deliveries of the same clock event share a reference.
    pub fn reference(&self) -> String {
        format!(
            "{}/{}/{}",
            self.employee_id,
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%.f"),
            self.direction
        )
    }
}
