//! Application state for the Attendance Penalty Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::{ConfigLoader, PenaltyPolicy};
use crate::history::InMemoryViolationLog;

/// Shared application state.
///
/// Holds the loaded penalty policy and the violation log. The log sits behind
/// one async mutex that is held across "count prior, then record", so two
/// punches for the same employee and category can never be given the same
/// occurrence number.
#[derive(Clone)]
pub struct AppState {
    /// The loaded penalty policy.
    config: Arc<ConfigLoader>,
    /// Finalized violation records.
    log: Arc<Mutex<InMemoryViolationLog>>,
}

impl AppState {
    /// Creates application state with an empty violation log.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_log(config, InMemoryViolationLog::new())
    }

    /// Creates application state with a pre-populated violation log.
    pub fn with_log(config: ConfigLoader, log: InMemoryViolationLog) -> Self {
        Self {
            config: Arc::new(config),
            log: Arc::new(Mutex::new(log)),
        }
    }

    /// Returns the penalty policy.
    pub fn policy(&self) -> &PenaltyPolicy {
        self.config.policy()
    }

    /// Returns the shared violation log.
    pub fn log(&self) -> &Mutex<InMemoryViolationLog> {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_clones_share_the_log() {
        let state = AppState::new(ConfigLoader::from_policy(PenaltyPolicy::default()));
        let other = state.clone();
        assert!(other.log().lock().await.is_empty());
        assert!(Arc::ptr_eq(&state.log, &other.log));
    }
}
