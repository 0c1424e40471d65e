//! Severity levels and per-category severity tables.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};

/// What a severity level does to the employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityKind {
    /// A recorded warning with no deduction.
    Warning,
    /// A deduction expressed as a percentage of one day's wage.
    PercentageDeduction,
}

impl std::fmt::Display for SeverityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityKind::Warning => write!(f, "Warning"),
            SeverityKind::PercentageDeduction => write!(f, "Percentage Deduction"),
        }
    }
}

/// One row of a severity table.
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::models::{SeverityKind, SeverityLevel};
/// use rust_decimal::Decimal;
///
/// let level = SeverityLevel::deduction(2, Decimal::new(5, 0));
/// assert_eq!(level.kind, SeverityKind::PercentageDeduction);
/// assert_eq!(level.deduction_percentage(), Decimal::new(5, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityLevel {
    /// The occurrence number this level applies to (1-based).
    pub occurrence_number: u32,
    /// Warning or percentage deduction.
    pub kind: SeverityKind,
    /// Percentage of a daily wage; zero for warnings.
    #[serde(default)]
    pub magnitude: Decimal,
}

impl SeverityLevel {
    /// A warning level.
    pub fn warning(occurrence_number: u32) -> Self {
        Self {
            occurrence_number,
            kind: SeverityKind::Warning,
            magnitude: Decimal::ZERO,
        }
    }

    /// A percentage-deduction level.
    pub fn deduction(occurrence_number: u32, percentage: Decimal) -> Self {
        Self {
            occurrence_number,
            kind: SeverityKind::PercentageDeduction,
            magnitude: percentage,
        }
    }

    /// Returns true if this level only warns.
    pub fn is_warning(&self) -> bool {
        self.kind == SeverityKind::Warning
    }

    /// The percentage to deduct; warnings deduct nothing.
    pub fn deduction_percentage(&self) -> Decimal {
        match self.kind {
            SeverityKind::Warning => Decimal::ZERO,
            SeverityKind::PercentageDeduction => self.magnitude,
        }
    }
}

/// A validated, ordered table of severity levels for one category.
///
/// Construction rejects empty tables, occurrence number zero, duplicate
/// occurrence numbers, negative magnitudes, and warnings that carry a
/// magnitude. Gaps in the occurrence numbers are accepted; lookups for a
/// missing number fall back to the nearest lower level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SeverityLevel>", into = "Vec<SeverityLevel>")]
pub struct SeverityTable {
    levels: BTreeMap<u32, SeverityLevel>,
}

impl SeverityTable {
    /// Builds a table from its rows.
    pub fn new(levels: Vec<SeverityLevel>) -> EngineResult<Self> {
        if levels.is_empty() {
            return Err(EngineError::invalid_configuration(
                "severity table must define at least one level",
            ));
        }

        let mut map = BTreeMap::new();
        for level in levels {
            if level.occurrence_number == 0 {
                return Err(EngineError::invalid_configuration(
                    "occurrence numbers start at 1",
                ));
            }
            if level.magnitude.is_sign_negative() && !level.magnitude.is_zero() {
                return Err(EngineError::invalid_configuration(format!(
                    "level {} has negative magnitude {}",
                    level.occurrence_number, level.magnitude
                )));
            }
            if level.is_warning() && !level.magnitude.is_zero() {
                return Err(EngineError::invalid_configuration(format!(
                    "level {} is a warning but carries magnitude {}",
                    level.occurrence_number, level.magnitude
                )));
            }
            let number = level.occurrence_number;
            if map.insert(number, level).is_some() {
                return Err(EngineError::invalid_configuration(format!(
                    "occurrence number {} defined twice",
                    number
                )));
            }
        }

        let table = Self { levels: map };
        if !table.is_contiguous() {
            warn!(
                levels = ?table.levels.keys().collect::<Vec<_>>(),
                "Severity table has gaps; missing levels fall back to the nearest lower level"
            );
        }
        Ok(table)
    }

    /// The highest occurrence number defined.
    pub fn max_level(&self) -> u32 {
        self.levels.keys().next_back().copied().unwrap_or_default()
    }

    /// The level defined for exactly `occurrence_number`, if any.
    pub fn get(&self, occurrence_number: u32) -> Option<&SeverityLevel> {
        self.levels.get(&occurrence_number)
    }

    /// The highest level whose occurrence number is `<= occurrence_number`.
    pub fn floor(&self, occurrence_number: u32) -> Option<&SeverityLevel> {
        self.levels
            .range(..=occurrence_number)
            .next_back()
            .map(|(_, level)| level)
    }

    /// The level with the highest occurrence number.
    pub fn highest(&self) -> Option<&SeverityLevel> {
        self.levels.values().next_back()
    }

    /// Returns true if the occurrence numbers are exactly `1..=max_level`.
    pub fn is_contiguous(&self) -> bool {
        self.levels.keys().copied().eq(1..=self.max_level())
    }

    /// Iterates the levels in ascending occurrence order.
    pub fn levels(&self) -> impl Iterator<Item = &SeverityLevel> {
        self.levels.values()
    }

    /// The number of levels defined.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false for a constructed table; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl TryFrom<Vec<SeverityLevel>> for SeverityTable {
    type Error = EngineError;

    fn try_from(levels: Vec<SeverityLevel>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<SeverityTable> for Vec<SeverityLevel> {
    fn from(table: SeverityTable) -> Self {
        table.levels.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn four_levels() -> SeverityTable {
        SeverityTable::new(vec![
            SeverityLevel::warning(1),
            SeverityLevel::deduction(2, dec("5")),
            SeverityLevel::deduction(3, dec("10")),
            SeverityLevel::deduction(4, dec("20")),
        ])
        .unwrap()
    }

    #[test]
    fn test_max_level_and_contiguity() {
        let table = four_levels();
        assert_eq!(table.max_level(), 4);
        assert!(table.is_contiguous());
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_rows_are_ordered_regardless_of_input_order() {
        let table = SeverityTable::new(vec![
            SeverityLevel::deduction(3, dec("10")),
            SeverityLevel::warning(1),
            SeverityLevel::deduction(2, dec("5")),
        ])
        .unwrap();
        let numbers: Vec<u32> = table.levels().map(|l| l.occurrence_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_table_is_rejected() {
        assert!(matches!(
            SeverityTable::new(vec![]),
            Err(EngineError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_zero_occurrence_is_rejected() {
        let result = SeverityTable::new(vec![SeverityLevel::warning(0)]);
        assert!(matches!(result, Err(EngineError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_duplicate_occurrence_is_rejected() {
        let result = SeverityTable::new(vec![
            SeverityLevel::deduction(1, dec("5")),
            SeverityLevel::deduction(1, dec("10")),
        ]);
        match result {
            Err(EngineError::InvalidConfiguration { message }) => {
                assert!(message.contains("defined twice"));
            }
            other => panic!("Expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_magnitude_is_rejected() {
        let result = SeverityTable::new(vec![SeverityLevel::deduction(1, dec("-5"))]);
        assert!(matches!(result, Err(EngineError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_warning_with_magnitude_is_rejected() {
        let level = SeverityLevel {
            occurrence_number: 1,
            kind: SeverityKind::Warning,
            magnitude: dec("5"),
        };
        assert!(SeverityTable::new(vec![level]).is_err());
    }

    #[test]
    fn test_sparse_table_is_accepted_and_floors() {
        let table = SeverityTable::new(vec![
            SeverityLevel::warning(1),
            SeverityLevel::deduction(3, dec("10")),
        ])
        .unwrap();
        assert!(!table.is_contiguous());
        assert_eq!(table.floor(2).unwrap().occurrence_number, 1);
        assert_eq!(table.floor(3).unwrap().occurrence_number, 3);
        assert!(table.get(2).is_none());
    }

    #[test]
    fn test_table_deserializes_from_list() {
        let yaml = r#"
- occurrence_number: 1
  kind: warning
- occurrence_number: 2
  kind: percentage_deduction
  magnitude: 5
"#;
        let table: SeverityTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(table.max_level(), 2);
        assert_eq!(table.get(2).unwrap().magnitude, dec("5"));
    }

    #[test]
    fn test_invalid_table_fails_deserialization() {
        let yaml = r#"
- occurrence_number: 0
  kind: warning
"#;
        let result: Result<SeverityTable, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_warning_deducts_nothing() {
        assert_eq!(SeverityLevel::warning(1).deduction_percentage(), Decimal::ZERO);
    }
}
