//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading penalty
//! policies from YAML files.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{SeverityTable, ViolationCategory};

use super::types::{ClassificationThresholds, PenaltyPolicy, PolicyFile, SeverityTables};

/// Loads and provides access to a penalty policy.
///
/// # Directory Structure
///
/// ```text
/// config/attendance_penalties/
/// ├── policy.yaml           # Policy metadata and withhold-promotion threshold
/// ├── thresholds.yaml       # Minute ranges per violation category
/// └── severity_levels.yaml  # Severity table per violation category
/// ```
///
/// Every file is validated while loading, so a malformed table is rejected
/// before any punch is evaluated.
///
/// # Example
///
/// ```no_run
/// use attendance_penalty_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/attendance_penalties")?;
/// println!("Loaded policy: {}", loader.policy().metadata().name);
/// # Ok::<(), attendance_penalty_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: PenaltyPolicy,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML or an invalid severity table
    /// - The thresholds overlap or are otherwise inconsistent
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy_file = Self::load_yaml::<PolicyFile>(&path.join("policy.yaml"))?;
        let thresholds =
            Self::load_yaml::<ClassificationThresholds>(&path.join("thresholds.yaml"))?;
        let severity_tables =
            Self::load_yaml::<SeverityTables>(&path.join("severity_levels.yaml"))?;

        for category in ViolationCategory::ALL {
            if thresholds.rule(category).is_some()
                && !severity_tables.severity_levels.contains_key(&category)
            {
                debug!(
                    category = category.code(),
                    "No severity table configured; violations in this category will fail"
                );
            }
        }

        let policy = PenaltyPolicy::new(
            policy_file.policy,
            thresholds,
            severity_tables,
            policy_file.withhold_promotion_percentage,
        )?;

        info!(
            policy = %policy.metadata().code,
            version = %policy.metadata().version,
            tables = policy.severity_tables().severity_levels.len(),
            "Loaded penalty policy"
        );

        Ok(Self { policy })
    }

    /// Wraps an already-built policy, typically [`PenaltyPolicy::default`].
    pub fn from_policy(policy: PenaltyPolicy) -> Self {
        Self { policy }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded policy.
    pub fn policy(&self) -> &PenaltyPolicy {
        &self.policy
    }

    /// Gets the severity table for a category.
    pub fn severity_table(&self, category: ViolationCategory) -> EngineResult<&SeverityTable> {
        self.policy.severity_table(category)
    }
}
