//! Violation history: the engine's only external dependency.
//!
//! The engine counts prior violations through the [`ViolationHistoryLookup`]
//! trait and never writes to it. [`InMemoryViolationLog`] is the bundled
//! implementation used by the HTTP service and the tests.

mod in_memory;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::ViolationCategory;

pub use in_memory::{InMemoryViolationLog, PenaltySummaryRow};

/// Failure reported by a history store.
///
/// The engine wraps it in [`crate::error::EngineError::HistoryLookup`] and
/// does not retry.
#[derive(Debug, Error)]
#[error("Violation history lookup failed: {message}")]
pub struct HistoryLookupError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl HistoryLookupError {
    /// Creates an error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping the store's own error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The store's description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Read-only access to finalized violation records.
///
/// Implementations must count records for `employee_id` and `category` whose
/// violation date `d` satisfies `period_start <= d < before_date`. Records on
/// or after `before_date` are never counted, so the result depends only on the
/// set of prior dates and not on insertion order.
pub trait ViolationHistoryLookup {
    /// Counts prior violations in the half-open date range.
    fn count_prior(
        &self,
        employee_id: &str,
        category: ViolationCategory,
        period_start: NaiveDate,
        before_date: NaiveDate,
    ) -> Result<u32, HistoryLookupError>;
}

impl<T: ViolationHistoryLookup + ?Sized> ViolationHistoryLookup for &T {
    fn count_prior(
        &self,
        employee_id: &str,
        category: ViolationCategory,
        period_start: NaiveDate,
        before_date: NaiveDate,
    ) -> Result<u32, HistoryLookupError> {
        (**self).count_prior(employee_id, category, period_start, before_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_exposes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timed out");
        let error = HistoryLookupError::with_source("store unavailable", io);
        assert_eq!(error.message(), "store unavailable");
        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_without_source() {
        let error = HistoryLookupError::new("store unavailable");
        assert!(error.source().is_none());
        assert_eq!(
            error.to_string(),
            "Violation history lookup failed: store unavailable"
        );
    }
}
