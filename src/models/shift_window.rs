//! Shift window model.
//!
//! This module defines the [`ShiftWindow`] struct, the scheduled
//! time-of-day range a punch is measured against.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A scheduled shift, expressed as times of day without a date.
///
/// When `end` is earlier than `start` the shift runs overnight and ends on
/// the following calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    /// Scheduled start time.
    pub start: NaiveTime,
    /// Scheduled end time.
    pub end: NaiveTime,
}

impl ShiftWindow {
    /// Creates a validated shift window.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_penalty_engine::models::ShiftWindow;
    /// use chrono::NaiveTime;
    ///
    /// let night = ShiftWindow::new(
    ///     NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
    /// )
    /// .unwrap();
    /// assert!(night.is_overnight());
    /// assert_eq!(night.duration().num_hours(), 8);
    /// ```
    pub fn new(start: NaiveTime, end: NaiveTime) -> EngineResult<Self> {
        let shift = Self { start, end };
        shift.validate()?;
        Ok(shift)
    }

    /// Rejects zero-length shifts.
    pub fn validate(&self) -> EngineResult<()> {
        if self.start == self.end {
            return Err(EngineError::invalid_input(
                "shift",
                format!("start and end are both {}", self.start),
            ));
        }
        Ok(())
    }

    /// Returns true when the shift crosses midnight.
    pub fn is_overnight(&self) -> bool {
        self.end < self.start
    }

    /// The scheduled length of the shift.
    pub fn duration(&self) -> Duration {
        let raw = self.end - self.start;
        if self.is_overnight() {
            raw + Duration::days(1)
        } else {
            raw
        }
    }

    /// Returns true if `time` falls in the post-midnight part of an overnight shift.
    pub fn is_after_midnight_portion(&self, time: NaiveTime) -> bool {
        self.is_overnight() && time <= self.end
    }

    /// The date the shift containing `timestamp` started on.
    ///
    /// A punch in the post-midnight part of an overnight shift belongs to the
    /// previous day's shift.
    pub fn shift_date(&self, timestamp: NaiveDateTime) -> NaiveDate {
        let date = timestamp.date();
        if self.is_after_midnight_portion(timestamp.time()) {
            date.pred_opt().unwrap_or(date)
        } else {
            date
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_day_shift_is_not_overnight() {
        let shift = ShiftWindow::new(t(8, 0), t(16, 0)).unwrap();
        assert!(!shift.is_overnight());
        assert_eq!(shift.duration(), Duration::hours(8));
        assert!(!shift.is_after_midnight_portion(t(2, 0)));
    }

    #[test]
    fn test_overnight_shift_duration_wraps_midnight() {
        let shift = ShiftWindow::new(t(22, 0), t(6, 0)).unwrap();
        assert!(shift.is_overnight());
        assert_eq!(shift.duration(), Duration::hours(8));
        assert!(shift.is_after_midnight_portion(t(0, 30)));
        assert!(shift.is_after_midnight_portion(t(6, 0)));
        assert!(!shift.is_after_midnight_portion(t(23, 0)));
    }

    #[test]
    fn test_shift_date_of_post_midnight_punch_is_previous_day() {
        let night = ShiftWindow::new(t(22, 0), t(6, 0)).unwrap();
        let day = ShiftWindow::new(t(8, 0), t(16, 0)).unwrap();
        let on = |d: u32, h: u32, m: u32| {
            NaiveDate::from_ymd_opt(2026, 1, d).unwrap().and_time(t(h, m))
        };
        let jan = |d: u32| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();

        assert_eq!(night.shift_date(on(16, 0, 30)), jan(15));
        assert_eq!(night.shift_date(on(15, 22, 40)), jan(15));
        assert_eq!(night.shift_date(on(16, 7, 0)), jan(16));
        assert_eq!(day.shift_date(on(16, 0, 30)), jan(16));
    }

    #[test]
    fn test_zero_length_shift_is_invalid() {
        let result = ShiftWindow::new(t(9, 0), t(9, 0));
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_shift_deserialization() {
        let shift: ShiftWindow =
            serde_json::from_str(r#"{"start": "08:00:00", "end": "16:00:00"}"#).unwrap();
        assert_eq!(shift.start, t(8, 0));
        assert_eq!(shift.end, t(16, 0));
    }
}
