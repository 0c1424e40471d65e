//! Violation classification.
//!
//! This module maps a punch and the shift it belongs to onto a violation
//! category. Deviations are measured as elapsed time relative to the shift,
//! so overnight shifts are handled without naive time-of-day subtraction.

use chrono::{Duration, NaiveTime};

use crate::config::ClassificationThresholds;
use crate::error::EngineResult;
use crate::models::{AuditStep, PunchDirection, PunchEvent, ShiftWindow, ViolationCategory};

/// The result of classifying one punch, including the audit step.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// The violation category, or `None` for a compliant punch.
    pub category: Option<ViolationCategory>,
    /// Full-precision lateness (IN) or earliness (OUT); negative when compliant.
    pub deviation: Duration,
    /// Whole minutes of deviation, floored and never negative.
    pub deviation_minutes: i64,
    /// Human-readable reason for the decision.
    pub description: String,
    /// The audit step recording this classification.
    pub audit_step: AuditStep,
}

/// Elapsed time from the scheduled start to `time`.
///
/// For an overnight shift, a punch in the post-midnight portion is measured
/// from the previous evening's start.
fn lateness(shift: &ShiftWindow, time: NaiveTime) -> Duration {
    let raw = time - shift.start;
    if raw < Duration::zero() && shift.is_after_midnight_portion(time) {
        raw + Duration::days(1)
    } else {
        raw
    }
}

/// Elapsed time from `time` to the scheduled end.
///
/// For an overnight shift, a punch before midnight is measured to the next
/// morning's end.
fn earliness(shift: &ShiftWindow, time: NaiveTime) -> Duration {
    let raw = shift.end - time;
    if shift.is_overnight() && time >= shift.start {
        raw + Duration::days(1)
    } else {
        raw
    }
}

/// Classifies a punch against its shift.
///
/// # Behavior
///
/// - `IN`: lateness of zero or less is on time. Otherwise the late-arrival
///   category whose range contains the lateness is returned; lateness below
///   every range is within the grace period.
/// - `OUT`: earliness of zero or less is compliant. Otherwise the
///   early-departure range decides between a violation and grace.
/// - Ranges are compared at full precision, so exactly 15:00.000 late falls
///   in the 15-30 bucket while 14:59.940 is grace.
///
/// # Errors
///
/// Returns `InvalidInput` if the shift has zero length or the punch has no
/// employee.
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::calculation::classify_punch;
/// use attendance_penalty_engine::config::ClassificationThresholds;
/// use attendance_penalty_engine::models::{PunchDirection, PunchEvent, ShiftWindow, ViolationCategory};
/// use chrono::{NaiveDateTime, NaiveTime};
///
/// let shift = ShiftWindow::new(
///     NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
/// )
/// .unwrap();
/// let punch = PunchEvent::new(
///     "emp_001",
///     NaiveDateTime::parse_from_str("2026-01-15 08:32:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     PunchDirection::In,
/// )
/// .unwrap();
///
/// let result = classify_punch(&shift, &punch, &ClassificationThresholds::default(), 1).unwrap();
/// assert_eq!(result.category, Some(ViolationCategory::LateArrival30To45));
/// assert_eq!(result.deviation_minutes, 32);
/// ```
pub fn classify_punch(
    shift: &ShiftWindow,
    punch: &PunchEvent,
    thresholds: &ClassificationThresholds,
    step_number: u32,
) -> EngineResult<ClassificationResult> {
    shift.validate()?;
    punch.validate()?;

    let time = punch.time();
    let late_arrival = punch.direction == PunchDirection::In;
    let deviation = if late_arrival {
        lateness(shift, time)
    } else {
        earliness(shift, time)
    };
    let deviation_minutes = deviation.num_minutes().max(0);

    let category = if deviation > Duration::zero() {
        thresholds.categorize(late_arrival, deviation)
    } else {
        None
    };

    let description = match (punch.direction, category, deviation > Duration::zero()) {
        (PunchDirection::In, _, false) => "On time or early".to_string(),
        (PunchDirection::Out, _, false) => "On time or late".to_string(),
        (PunchDirection::In, None, true) => {
            format!("Late by {}m, within grace period", deviation_minutes)
        }
        (PunchDirection::Out, None, true) => {
            format!("Left {}m early, within grace period", deviation_minutes)
        }
        (PunchDirection::In, Some(category), true) => {
            format!("Late by {}m ({})", deviation_minutes, category)
        }
        (PunchDirection::Out, Some(category), true) => {
            format!("Left {}m early ({})", deviation_minutes, category)
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "violation_classification".to_string(),
        rule_name: "Violation Classification".to_string(),
        input: serde_json::json!({
            "shift_start": shift.start.to_string(),
            "shift_end": shift.end.to_string(),
            "overnight": shift.is_overnight(),
            "punch_time": punch.timestamp.to_string(),
            "direction": punch.direction.to_string()
        }),
        output: serde_json::json!({
            "deviation_seconds": deviation.num_seconds(),
            "deviation_minutes": deviation_minutes,
            "category": category.map(|c| c.code())
        }),
        reasoning: description.clone(),
    };

    Ok(ClassificationResult {
        category,
        deviation,
        deviation_minutes,
        description,
        audit_step,
    })
}

/// Returns the violation category for a punch, if any.
///
/// A thin wrapper over [`classify_punch`] for callers that do not need the
/// audit step.
pub fn classify(
    shift: &ShiftWindow,
    punch: &PunchEvent,
    thresholds: &ClassificationThresholds,
) -> EngineResult<Option<ViolationCategory>> {
    classify_punch(shift, punch, thresholds, 1).map(|result| result.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use chrono::{NaiveDate, NaiveDateTime};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn shift(start: NaiveTime, end: NaiveTime) -> ShiftWindow {
        ShiftWindow::new(start, end).unwrap()
    }

    fn day_shift() -> ShiftWindow {
        shift(t(8, 0), t(16, 0))
    }

    fn night_shift() -> ShiftWindow {
        shift(t(22, 0), t(6, 0))
    }

    fn punch_at(time: NaiveTime, direction: PunchDirection) -> PunchEvent {
        let timestamp = NaiveDateTime::new(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(), time);
        PunchEvent::new("emp_001", timestamp, direction).unwrap()
    }

    fn categorize(shift: &ShiftWindow, time: NaiveTime, direction: PunchDirection) -> Option<ViolationCategory> {
        classify(shift, &punch_at(time, direction), &ClassificationThresholds::default()).unwrap()
    }

    #[test]
    fn test_on_time_arrival_is_not_a_violation() {
        let result = classify_punch(
            &day_shift(),
            &punch_at(t(8, 0), PunchDirection::In),
            &ClassificationThresholds::default(),
            1,
        )
        .unwrap();
        assert_eq!(result.category, None);
        assert_eq!(result.description, "On time or early");
        assert_eq!(result.deviation_minutes, 0);
    }

    #[test]
    fn test_early_arrival_is_not_a_violation() {
        assert_eq!(categorize(&day_shift(), t(7, 45), PunchDirection::In), None);
    }

    #[test]
    fn test_grace_boundary_at_full_precision() {
        let just_under = NaiveTime::from_hms_milli_opt(8, 14, 59, 940).unwrap();
        assert_eq!(categorize(&day_shift(), just_under, PunchDirection::In), None);
        assert_eq!(
            categorize(&day_shift(), t(8, 15), PunchDirection::In),
            Some(ViolationCategory::LateArrival15To30)
        );
    }

    #[test]
    fn test_grace_description_reports_floored_minutes() {
        let result = classify_punch(
            &day_shift(),
            &punch_at(NaiveTime::from_hms_opt(8, 14, 59).unwrap(), PunchDirection::In),
            &ClassificationThresholds::default(),
            1,
        )
        .unwrap();
        assert_eq!(result.deviation_minutes, 14);
        assert_eq!(result.description, "Late by 14m, within grace period");
    }

    #[test]
    fn test_bucket_boundaries_fall_in_higher_bucket() {
        let shift = day_shift();
        assert_eq!(
            categorize(&shift, t(8, 30), PunchDirection::In),
            Some(ViolationCategory::LateArrival30To45)
        );
        assert_eq!(
            categorize(&shift, t(8, 45), PunchDirection::In),
            Some(ViolationCategory::LateArrival45To75)
        );
        assert_eq!(
            categorize(&shift, t(9, 15), PunchDirection::In),
            Some(ViolationCategory::LateArrivalOver75)
        );
        assert_eq!(
            categorize(&shift, t(9, 14), PunchDirection::In),
            Some(ViolationCategory::LateArrival45To75)
        );
    }

    #[test]
    fn test_early_departure_requires_more_than_fifteen_minutes() {
        let shift = day_shift();
        assert_eq!(categorize(&shift, t(15, 45), PunchDirection::Out), None);
        assert_eq!(
            categorize(&shift, t(15, 44), PunchDirection::Out),
            Some(ViolationCategory::EarlyDeparture)
        );
        assert_eq!(categorize(&shift, t(16, 0), PunchDirection::Out), None);
        assert_eq!(categorize(&shift, t(17, 30), PunchDirection::Out), None);
    }

    #[test]
    fn test_early_departure_description() {
        let result = classify_punch(
            &day_shift(),
            &punch_at(t(15, 20), PunchDirection::Out),
            &ClassificationThresholds::default(),
            3,
        )
        .unwrap();
        assert_eq!(result.deviation_minutes, 40);
        assert_eq!(
            result.description,
            "Left 40m early (Early Departure Over 15 Minutes)"
        );
        assert_eq!(result.audit_step.step_number, 3);
        assert_eq!(result.audit_step.output["category"], "early_departure");
    }

    #[test]
    fn test_overnight_arrival_uses_shift_relative_time() {
        let shift = night_shift();
        assert_eq!(categorize(&shift, t(22, 10), PunchDirection::In), None);
        assert_eq!(
            categorize(&shift, t(22, 20), PunchDirection::In),
            Some(ViolationCategory::LateArrival15To30)
        );
        assert_eq!(categorize(&shift, t(21, 50), PunchDirection::In), None);
    }

    #[test]
    fn test_overnight_arrival_after_midnight_is_very_late() {
        // 00:30 is 2h30m after a 22:00 start
        assert_eq!(
            categorize(&night_shift(), t(0, 30), PunchDirection::In),
            Some(ViolationCategory::LateArrivalOver75)
        );
    }

    #[test]
    fn test_overnight_departure() {
        let shift = night_shift();
        assert_eq!(
            categorize(&shift, t(5, 30), PunchDirection::Out),
            Some(ViolationCategory::EarlyDeparture)
        );
        assert_eq!(categorize(&shift, t(5, 50), PunchDirection::Out), None);
        assert_eq!(categorize(&shift, t(6, 10), PunchDirection::Out), None);
        // Leaving before midnight is measured to the next morning's end
        assert_eq!(
            categorize(&shift, t(23, 0), PunchDirection::Out),
            Some(ViolationCategory::EarlyDeparture)
        );
    }

    #[test]
    fn test_zero_length_shift_is_invalid_input() {
        let bad = ShiftWindow {
            start: t(9, 0),
            end: t(9, 0),
        };
        let result = classify(
            &bad,
            &punch_at(t(9, 30), PunchDirection::In),
            &ClassificationThresholds::default(),
        );
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_blank_employee_is_invalid_input() {
        let mut punch = punch_at(t(9, 30), PunchDirection::In);
        punch.employee_id = String::new();
        let result = classify(&day_shift(), &punch, &ClassificationThresholds::default());
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_custom_thresholds_are_honoured() {
        let mut thresholds = ClassificationThresholds::default();
        thresholds.thresholds.insert(
            ViolationCategory::LateArrival15To30,
            crate::config::ThresholdRule::between(10, 30),
        );
        let result = classify(&day_shift(), &punch_at(t(8, 12), PunchDirection::In), &thresholds).unwrap();
        assert_eq!(result, Some(ViolationCategory::LateArrival15To30));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn arrival_violates_exactly_from_fifteen_minutes(late_secs in 1u32..(7 * 3600)) {
                let time = t(8, 0) + Duration::seconds(i64::from(late_secs));
                let category = categorize(&day_shift(), time, PunchDirection::In);
                prop_assert_eq!(category.is_some(), late_secs >= 15 * 60);
            }

            #[test]
            fn overnight_arrival_matches_shifted_day_shift(late_secs in 1u32..(7 * 3600)) {
                // 22:00-06:00 shifted by ten hours is 08:00-16:00
                let night = categorize(
                    &night_shift(),
                    t(22, 0) + Duration::seconds(i64::from(late_secs)),
                    PunchDirection::In,
                );
                let day = categorize(
                    &day_shift(),
                    t(8, 0) + Duration::seconds(i64::from(late_secs)),
                    PunchDirection::In,
                );
                prop_assert_eq!(night, day);
            }
        }
    }
}
