use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::catalog::ConditionCatalog;
use crate::domain::{AreaId, EmployeeCategory};
use crate::error::ConfigError;

/// How rule patterns are matched against a normalized job title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    #[default]
    Substring,
    Exact,
    Regex,
}

/// Condition ids a matched rule switches on or off. Ids appearing in neither
/// list are simply not applicable; the two lists need not partition all ten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    #[serde(default)]
    pub applicable: Vec<u8>,
    #[serde(default)]
    pub excluded: Vec<u8>,
}

/// One ordered position rule. Rules are evaluated in configuration order and
/// the first rule with any matching pattern wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRule {
    pub patterns: Vec<String>,
    #[serde(default)]
    pub strategy: MatchStrategy,
    #[serde(flatten)]
    pub outcome: RuleOutcome,
}

/// Rule list plus fallback for one employee category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRules {
    #[serde(default)]
    pub rules: Vec<PositionRule>,
    pub default: RuleOutcome,
}

/// Responsible-area scope attached to an area-assignment rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AreaScope {
    /// The employee answers for their own area only.
    Own,
    /// Whole-facility responsibility.
    All,
    /// No area responsibility.
    None,
    /// An explicit list of areas (auditor/trainer style roles).
    List { areas: Vec<AreaId> },
}

/// Title-matched override for responsible-area resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaAssignmentRule {
    pub patterns: Vec<String>,
    #[serde(default)]
    pub strategy: MatchStrategy,
    pub scope: AreaScope,
}

fn default_area_scope() -> AreaScope {
    AreaScope::Own
}

/// The declarative incentive policy: the position rule matrix, area
/// responsibilities, and per-condition threshold overrides. Loaded once per
/// run and passed in by value — never ambient state — so multiple policy
/// versions can coexist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub categories: BTreeMap<EmployeeCategory, CategoryRules>,
    #[serde(default)]
    pub area_assignments: Vec<AreaAssignmentRule>,
    #[serde(default = "default_area_scope")]
    pub default_area_scope: AreaScope,
    #[serde(default)]
    pub thresholds: BTreeMap<u8, f64>,
}

impl PolicyConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::MalformedRuleTable {
                detail: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_reader(reader).map_err(|err| ConfigError::MalformedRuleTable {
                detail: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject bad tables eagerly; nothing downstream of a malformed policy is
    /// trustworthy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (category, rules) in &self.categories {
            for rule in &rules.rules {
                if rule.patterns.is_empty() {
                    return Err(ConfigError::MalformedRuleTable {
                        detail: format!(
                            "category '{}' has a position rule with an empty pattern list",
                            category.label()
                        ),
                    });
                }
                check_outcome_ids(&rule.outcome)?;
            }
            check_outcome_ids(&rules.default)?;
        }
        for rule in &self.area_assignments {
            if rule.patterns.is_empty() {
                return Err(ConfigError::MalformedRuleTable {
                    detail: "area assignment rule with an empty pattern list".to_string(),
                });
            }
        }
        for id in self.thresholds.keys() {
            let definition = ConditionCatalog::get(*id)?;
            if definition.default_threshold.is_none() {
                return Err(ConfigError::MalformedRuleTable {
                    detail: format!("condition {id} does not take a numeric threshold"),
                });
            }
        }
        Ok(())
    }

    /// Threshold for a condition: the configured override when present,
    /// otherwise the catalog default. `None` for the window conditions.
    pub fn threshold(&self, id: u8) -> Option<f64> {
        self.thresholds.get(&id).copied().or_else(|| {
            ConditionCatalog::get(id)
                .ok()
                .and_then(|definition| definition.default_threshold)
        })
    }

    /// The baseline factory policy used by the demo batch and tests: ordinary
    /// inspectors carry all ten conditions, line leaders only the attendance
    /// block plus the area window, quality leads add the area reject-rate cap
    /// and answer for the whole facility.
    pub fn standard_policy() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(
            EmployeeCategory::Standard,
            CategoryRules {
                rules: vec![
                    PositionRule {
                        patterns: vec!["LINE LEADER".to_string()],
                        strategy: MatchStrategy::Substring,
                        outcome: RuleOutcome {
                            applicable: vec![1, 2, 3, 4, 7],
                            excluded: vec![5, 6, 8, 9, 10],
                        },
                    },
                    PositionRule {
                        patterns: vec![
                            "QUALITY SUPERVISOR".to_string(),
                            "QUALITY MANAGER".to_string(),
                        ],
                        strategy: MatchStrategy::Substring,
                        outcome: RuleOutcome {
                            applicable: vec![1, 2, 3, 4, 7, 8],
                            excluded: vec![5, 6, 9, 10],
                        },
                    },
                ],
                default: RuleOutcome {
                    applicable: (1..=10).collect(),
                    excluded: Vec::new(),
                },
            },
        );
        categories.insert(
            EmployeeCategory::Contractor,
            CategoryRules {
                rules: Vec::new(),
                default: RuleOutcome {
                    applicable: vec![1, 2, 3, 4, 5, 6, 9, 10],
                    excluded: vec![7, 8],
                },
            },
        );

        Self {
            categories,
            area_assignments: vec![AreaAssignmentRule {
                patterns: vec![
                    "QUALITY SUPERVISOR".to_string(),
                    "QUALITY MANAGER".to_string(),
                ],
                strategy: MatchStrategy::Substring,
                scope: AreaScope::All,
            }],
            default_area_scope: AreaScope::Own,
            thresholds: BTreeMap::new(),
        }
    }
}

fn check_outcome_ids(outcome: &RuleOutcome) -> Result<(), ConfigError> {
    for id in outcome.applicable.iter().chain(outcome.excluded.iter()) {
        ConditionCatalog::get(*id)?;
    }
    Ok(())
}
