//! Configuration loading and management for the Attendance Penalty Engine.
//!
//! This module provides functionality to load penalty policies from YAML
//! files: classification thresholds, per-category severity tables, and
//! policy metadata.
//!
//! # Example
//!
//! ```no_run
//! use attendance_penalty_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/attendance_penalties").unwrap();
//! println!("Loaded policy: {}", config.policy().metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ClassificationThresholds, DEFAULT_MAX_LEVEL, DEFAULT_WITHHOLD_PROMOTION_PERCENTAGE,
    PenaltyPolicy, PolicyFile, PolicyMetadata, SeverityTables, ThresholdRule,
};
