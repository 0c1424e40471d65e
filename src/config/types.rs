//! Configuration types for attendance penalties.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, plus the built-in
//! defaults used when no site configuration is supplied.

use std::collections::BTreeMap;

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{SeverityLevel, SeverityTable, ViolationCategory};

/// Number of levels in each built-in severity table.
pub const DEFAULT_MAX_LEVEL: u32 = 4;

/// Deduction percentage at or above which promotion is withheld by default.
pub const DEFAULT_WITHHOLD_PROMOTION_PERCENTAGE: i64 = 100;

/// Metadata about the penalty policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyMetadata {
    /// Short identifier for the policy.
    pub code: String,
    /// The human-readable name of the policy.
    pub name: String,
    /// The version or effective date of the policy.
    pub version: String,
}

impl Default for PolicyMetadata {
    fn default() -> Self {
        Self {
            code: "attendance_default".to_string(),
            name: "Attendance Penalty Policy".to_string(),
            version: "built-in".to_string(),
        }
    }
}

/// Contents of `policy.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyFile {
    /// Policy metadata.
    pub policy: PolicyMetadata,
    /// Deduction percentage that triggers a withhold-promotion recommendation.
    #[serde(default = "default_withhold_promotion_percentage")]
    pub withhold_promotion_percentage: Decimal,
}

fn default_withhold_promotion_percentage() -> Decimal {
    Decimal::new(DEFAULT_WITHHOLD_PROMOTION_PERCENTAGE, 0)
}

/// The minute range that selects one violation category.
///
/// The lower bound is inclusive unless `min_inclusive` is false; the upper
/// bound, when present, is always exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRule {
    /// Lower bound in minutes.
    pub min_minutes: u32,
    /// Exclusive upper bound in minutes; `None` means unbounded.
    #[serde(default)]
    pub max_minutes: Option<u32>,
    /// Whether `min_minutes` itself belongs to the range.
    #[serde(default = "default_min_inclusive")]
    pub min_inclusive: bool,
}

fn default_min_inclusive() -> bool {
    true
}

impl ThresholdRule {
    /// A range `[min, max)`.
    pub fn between(min_minutes: u32, max_minutes: u32) -> Self {
        Self {
            min_minutes,
            max_minutes: Some(max_minutes),
            min_inclusive: true,
        }
    }

    /// A range `[min, ∞)`.
    pub fn at_least(min_minutes: u32) -> Self {
        Self {
            min_minutes,
            max_minutes: None,
            min_inclusive: true,
        }
    }

    /// A range `(min, ∞)`.
    pub fn more_than(min_minutes: u32) -> Self {
        Self {
            min_minutes,
            max_minutes: None,
            min_inclusive: false,
        }
    }

    /// Checks a full-precision deviation against the range.
    pub fn contains(&self, deviation: Duration) -> bool {
        let min = Duration::minutes(i64::from(self.min_minutes));
        let above_min = if self.min_inclusive {
            deviation >= min
        } else {
            deviation > min
        };
        let below_max = self
            .max_minutes
            .is_none_or(|max| deviation < Duration::minutes(i64::from(max)));
        above_min && below_max
    }

    fn describe(&self) -> String {
        let open = if self.min_inclusive { "[" } else { "(" };
        match self.max_minutes {
            Some(max) => format!("{}{},{})", open, self.min_minutes, max),
            None => format!("{}{},inf)", open, self.min_minutes),
        }
    }
}

/// Minute ranges for every category, as loaded from `thresholds.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    /// The rule for each category.
    pub thresholds: BTreeMap<ViolationCategory, ThresholdRule>,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        let thresholds = BTreeMap::from([
            (ViolationCategory::LateArrival15To30, ThresholdRule::between(15, 30)),
            (ViolationCategory::LateArrival30To45, ThresholdRule::between(30, 45)),
            (ViolationCategory::LateArrival45To75, ThresholdRule::between(45, 75)),
            (ViolationCategory::LateArrivalOver75, ThresholdRule::at_least(75)),
            (ViolationCategory::EarlyDeparture, ThresholdRule::more_than(15)),
        ]);
        Self { thresholds }
    }
}

impl ClassificationThresholds {
    /// Rejects empty, inverted, zero-inclusive and overlapping ranges.
    pub fn validate(&self) -> EngineResult<()> {
        if self.thresholds.is_empty() {
            return Err(EngineError::invalid_configuration(
                "at least one threshold must be configured",
            ));
        }

        for (category, rule) in &self.thresholds {
            if rule.min_minutes == 0 && rule.min_inclusive {
                return Err(EngineError::invalid_configuration(format!(
                    "'{}' would classify zero minutes as a violation",
                    category
                )));
            }
            if rule.max_minutes.is_some_and(|max| max <= rule.min_minutes) {
                return Err(EngineError::invalid_configuration(format!(
                    "'{}' has an empty range {}",
                    category,
                    rule.describe()
                )));
            }
        }

        for late in [true, false] {
            let mut rules: Vec<(&ViolationCategory, &ThresholdRule)> = self
                .thresholds
                .iter()
                .filter(|(c, _)| c.is_late_arrival() == late)
                .collect();
            rules.sort_by_key(|(_, r)| r.min_minutes);

            for pair in rules.windows(2) {
                let (lower_cat, lower) = pair[0];
                let (upper_cat, upper) = pair[1];
                let overlaps = match lower.max_minutes {
                    Some(max) => max > upper.min_minutes,
                    None => true,
                };
                if overlaps {
                    return Err(EngineError::invalid_configuration(format!(
                        "'{}' {} overlaps '{}' {}",
                        lower_cat,
                        lower.describe(),
                        upper_cat,
                        upper.describe()
                    )));
                }
            }
        }

        Ok(())
    }

    /// The rule for a category, if configured.
    pub fn rule(&self, category: ViolationCategory) -> Option<&ThresholdRule> {
        self.thresholds.get(&category)
    }

    /// The first category in the given direction whose range contains `deviation`.
    pub fn categorize(&self, late_arrival: bool, deviation: Duration) -> Option<ViolationCategory> {
        self.thresholds
            .iter()
            .filter(|(category, _)| category.is_late_arrival() == late_arrival)
            .find(|(_, rule)| rule.contains(deviation))
            .map(|(category, _)| *category)
    }
}

/// Severity tables for every category, as loaded from `severity_levels.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityTables {
    /// The table for each category.
    pub severity_levels: BTreeMap<ViolationCategory, SeverityTable>,
}

impl SeverityTables {
    fn built_in_table(levels: [(u32, i64); 4]) -> SeverityTable {
        let rows = levels
            .into_iter()
            .map(|(occurrence, pct)| {
                if pct == 0 {
                    SeverityLevel::warning(occurrence)
                } else {
                    SeverityLevel::deduction(occurrence, Decimal::new(pct, 0))
                }
            })
            .collect();
        SeverityTable::new(rows).expect("built-in severity tables are valid")
    }
}

impl Default for SeverityTables {
    fn default() -> Self {
        let severity_levels = BTreeMap::from([
            (
                ViolationCategory::LateArrival15To30,
                Self::built_in_table([(1, 0), (2, 5), (3, 10), (4, 20)]),
            ),
            (
                ViolationCategory::LateArrival30To45,
                Self::built_in_table([(1, 10), (2, 20), (3, 30), (4, 50)]),
            ),
            (
                ViolationCategory::LateArrival45To75,
                Self::built_in_table([(1, 30), (2, 50), (3, 50), (4, 100)]),
            ),
            (
                ViolationCategory::LateArrivalOver75,
                Self::built_in_table([(1, 0), (2, 100), (3, 150), (4, 200)]),
            ),
            (
                ViolationCategory::EarlyDeparture,
                Self::built_in_table([(1, 0), (2, 5), (3, 15), (4, 50)]),
            ),
        ]);
        Self { severity_levels }
    }
}

/// The complete penalty policy the engine evaluates against.
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::config::PenaltyPolicy;
/// use attendance_penalty_engine::models::ViolationCategory;
///
/// let policy = PenaltyPolicy::default();
/// let table = policy.severity_table(ViolationCategory::LateArrival30To45).unwrap();
/// assert_eq!(table.max_level(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PenaltyPolicy {
    metadata: PolicyMetadata,
    thresholds: ClassificationThresholds,
    severity_tables: SeverityTables,
    withhold_promotion_percentage: Decimal,
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        Self {
            metadata: PolicyMetadata::default(),
            thresholds: ClassificationThresholds::default(),
            severity_tables: SeverityTables::default(),
            withhold_promotion_percentage: default_withhold_promotion_percentage(),
        }
    }
}

impl PenaltyPolicy {
    /// Creates a validated policy from its component parts.
    pub fn new(
        metadata: PolicyMetadata,
        thresholds: ClassificationThresholds,
        severity_tables: SeverityTables,
        withhold_promotion_percentage: Decimal,
    ) -> EngineResult<Self> {
        thresholds.validate()?;
        if withhold_promotion_percentage <= Decimal::ZERO {
            return Err(EngineError::invalid_configuration(
                "withhold_promotion_percentage must be positive",
            ));
        }
        Ok(Self {
            metadata,
            thresholds,
            severity_tables,
            withhold_promotion_percentage,
        })
    }

    /// Replaces the severity table for one category.
    pub fn with_severity_table(mut self, category: ViolationCategory, table: SeverityTable) -> Self {
        self.severity_tables.severity_levels.insert(category, table);
        self
    }

    /// Removes the severity table for one category.
    pub fn without_severity_table(mut self, category: ViolationCategory) -> Self {
        self.severity_tables.severity_levels.remove(&category);
        self
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        &self.metadata
    }

    /// Returns the classification thresholds.
    pub fn thresholds(&self) -> &ClassificationThresholds {
        &self.thresholds
    }

    /// Returns all severity tables.
    pub fn severity_tables(&self) -> &SeverityTables {
        &self.severity_tables
    }

    /// Returns the deduction percentage that triggers withholding promotion.
    pub fn withhold_promotion_percentage(&self) -> Decimal {
        self.withhold_promotion_percentage
    }

    /// Gets the severity table for a category.
    ///
    /// Returns `MissingConfiguration` if none is defined.
    pub fn severity_table(&self, category: ViolationCategory) -> EngineResult<&SeverityTable> {
        self.severity_tables
            .severity_levels
            .get(&category)
            .ok_or(EngineError::MissingConfiguration { category })
    }
}
