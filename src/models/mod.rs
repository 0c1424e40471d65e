//! Core data models for the Attendance Penalty Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod evaluation_result;
mod penalty_period;
mod punch_event;
mod severity;
mod shift_window;
mod violation;

pub use evaluation_result::{AuditStep, AuditTrace, EvaluationResult, RecommendedAction};
pub use penalty_period::{PERIOD_END_DAY, PERIOD_START_DAY, PenaltyPeriod};
pub use punch_event::{PunchDirection, PunchEvent};
pub use severity::{SeverityKind, SeverityLevel, SeverityTable};
pub use shift_window::ShiftWindow;
pub use violation::{ViolationCategory, ViolationRecord};
