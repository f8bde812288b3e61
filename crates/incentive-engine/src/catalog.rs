use crate::error::ConfigError;
use serde::Serialize;

/// The three domains the ten conditions fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionCategory {
    Attendance,
    Quality,
    Inspection,
}

/// Comparison operator a condition applies to its threshold. The operators
/// are part of the policy contract and must not be altered at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    AtLeast,
    AtMost,
    GreaterThan,
    LessThan,
    Exactly,
    /// Passes when the subject is not continuously failing the rolling
    /// window; no numeric threshold is involved.
    WindowClear,
}

impl Comparator {
    pub fn compare(self, actual: f64, threshold: f64) -> bool {
        match self {
            Comparator::AtLeast => actual >= threshold,
            Comparator::AtMost => actual <= threshold,
            Comparator::GreaterThan => actual > threshold,
            Comparator::LessThan => actual < threshold,
            Comparator::Exactly => (actual - threshold).abs() < f64::EPSILON,
            // Window conditions are evaluated against the failure windows,
            // never against a numeric threshold.
            Comparator::WindowClear => false,
        }
    }
}

/// One of the ten standardized eligibility conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConditionDefinition {
    pub id: u8,
    pub category: ConditionCategory,
    pub comparator: Comparator,
    pub default_threshold: Option<f64>,
    pub unit: &'static str,
}

pub const CONDITION_COUNT: u8 = 10;

const DEFINITIONS: [ConditionDefinition; CONDITION_COUNT as usize] = [
    ConditionDefinition {
        id: 1,
        category: ConditionCategory::Attendance,
        comparator: Comparator::AtLeast,
        default_threshold: Some(88.0),
        unit: "%",
    },
    ConditionDefinition {
        id: 2,
        category: ConditionCategory::Attendance,
        comparator: Comparator::AtMost,
        default_threshold: Some(2.0),
        unit: "days",
    },
    ConditionDefinition {
        id: 3,
        category: ConditionCategory::Attendance,
        comparator: Comparator::GreaterThan,
        default_threshold: Some(0.0),
        unit: "days",
    },
    ConditionDefinition {
        id: 4,
        category: ConditionCategory::Attendance,
        comparator: Comparator::AtLeast,
        default_threshold: Some(12.0),
        unit: "days",
    },
    ConditionDefinition {
        id: 5,
        category: ConditionCategory::Quality,
        comparator: Comparator::Exactly,
        default_threshold: Some(0.0),
        unit: "failures",
    },
    ConditionDefinition {
        id: 6,
        category: ConditionCategory::Quality,
        comparator: Comparator::WindowClear,
        default_threshold: None,
        unit: "periods",
    },
    ConditionDefinition {
        id: 7,
        category: ConditionCategory::Quality,
        comparator: Comparator::WindowClear,
        default_threshold: None,
        unit: "periods",
    },
    ConditionDefinition {
        id: 8,
        category: ConditionCategory::Quality,
        comparator: Comparator::LessThan,
        default_threshold: Some(0.03),
        unit: "ratio",
    },
    ConditionDefinition {
        id: 9,
        category: ConditionCategory::Inspection,
        comparator: Comparator::AtLeast,
        default_threshold: Some(95.0),
        unit: "%",
    },
    ConditionDefinition {
        id: 10,
        category: ConditionCategory::Inspection,
        comparator: Comparator::AtLeast,
        default_threshold: Some(100.0),
        unit: "units",
    },
];

/// Static registry of the ten condition definitions. Pure lookup, fixed at
/// design time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionCatalog;

impl ConditionCatalog {
    pub fn get(id: u8) -> Result<&'static ConditionDefinition, ConfigError> {
        if (1..=CONDITION_COUNT).contains(&id) {
            Ok(&DEFINITIONS[usize::from(id - 1)])
        } else {
            Err(ConfigError::UnknownCondition { id })
        }
    }

    /// All definitions in id order.
    pub fn all() -> impl Iterator<Item = &'static ConditionDefinition> {
        DEFINITIONS.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_every_catalog_id() {
        for id in 1..=CONDITION_COUNT {
            let definition = ConditionCatalog::get(id).expect("catalog id resolves");
            assert_eq!(definition.id, id);
        }
    }

    #[test]
    fn get_rejects_out_of_range_ids() {
        for id in [0u8, 11, 42] {
            match ConditionCatalog::get(id) {
                Err(ConfigError::UnknownCondition { id: reported }) => assert_eq!(reported, id),
                other => panic!("expected unknown condition error, got {other:?}"),
            }
        }
    }

    #[test]
    fn attendance_floor_uses_inclusive_comparison() {
        let definition = ConditionCatalog::get(1).expect("condition 1 exists");
        assert_eq!(definition.comparator, Comparator::AtLeast);
        assert!(definition.comparator.compare(88.0, 88.0));
        assert!(!definition.comparator.compare(87.9, 88.0));
    }

    #[test]
    fn window_conditions_carry_no_threshold() {
        for id in [6u8, 7] {
            let definition = ConditionCatalog::get(id).expect("window condition exists");
            assert_eq!(definition.comparator, Comparator::WindowClear);
            assert!(definition.default_threshold.is_none());
        }
    }
}
