use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::catalog::ConditionCatalog;
use crate::config::{MatchStrategy, PolicyConfig, RuleOutcome};
use crate::domain::EmployeeCategory;
use crate::error::ConfigError;

/// Normalize a free-text job title for rule matching: trim, collapse inner
/// whitespace, uppercase.
pub(crate) fn normalize_title(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// A title pattern compiled for its configured match strategy. Substring and
/// exact patterns are normalized the same way titles are; regex patterns run
/// against the normalized title as written.
#[derive(Debug)]
pub(crate) enum CompiledPattern {
    Substring(String),
    Exact(String),
    Regex(Regex),
}

impl CompiledPattern {
    pub(crate) fn compile(pattern: &str, strategy: MatchStrategy) -> Result<Self, ConfigError> {
        match strategy {
            MatchStrategy::Substring => Ok(Self::Substring(normalize_title(pattern))),
            MatchStrategy::Exact => Ok(Self::Exact(normalize_title(pattern))),
            MatchStrategy::Regex => Regex::new(pattern)
                .map(Self::Regex)
                .map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }),
        }
    }

    pub(crate) fn matches(&self, normalized_title: &str) -> bool {
        match self {
            CompiledPattern::Substring(needle) => normalized_title.contains(needle.as_str()),
            CompiledPattern::Exact(expected) => normalized_title == expected,
            CompiledPattern::Regex(pattern) => pattern.is_match(normalized_title),
        }
    }
}

/// The resolved condition sets for one position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSets {
    pub applicable: BTreeSet<u8>,
    pub excluded: BTreeSet<u8>,
}

impl ConditionSets {
    fn from_outcome(outcome: &RuleOutcome) -> Self {
        Self {
            applicable: outcome.applicable.iter().copied().collect(),
            excluded: outcome.excluded.iter().copied().collect(),
        }
    }

    /// Exclusion wins over inclusion when a rule lists an id in both sets.
    pub fn is_applicable(&self, id: u8) -> bool {
        self.applicable.contains(&id) && !self.excluded.contains(&id)
    }
}

#[derive(Debug)]
struct CompiledRule {
    patterns: Vec<CompiledPattern>,
    sets: ConditionSets,
}

#[derive(Debug)]
struct CompiledCategory {
    rules: Vec<CompiledRule>,
    default: ConditionSets,
}

/// Resolves (employee category, job title) to the applicable and excluded
/// condition sets. Compiled once from an immutable policy; bad patterns and
/// out-of-range ids are rejected here so `resolve` never sees an invalid
/// table.
#[derive(Debug)]
pub struct PositionMatrix {
    tables: BTreeMap<EmployeeCategory, CompiledCategory>,
}

impl PositionMatrix {
    pub fn new(config: &PolicyConfig) -> Result<Self, ConfigError> {
        let mut tables = BTreeMap::new();
        for (category, rules) in &config.categories {
            let mut compiled = Vec::with_capacity(rules.rules.len());
            for rule in &rules.rules {
                check_ids(&rule.outcome)?;
                let patterns = rule
                    .patterns
                    .iter()
                    .map(|pattern| CompiledPattern::compile(pattern, rule.strategy))
                    .collect::<Result<Vec<_>, _>>()?;
                compiled.push(CompiledRule {
                    patterns,
                    sets: ConditionSets::from_outcome(&rule.outcome),
                });
            }
            check_ids(&rules.default)?;
            tables.insert(
                *category,
                CompiledCategory {
                    rules: compiled,
                    default: ConditionSets::from_outcome(&rules.default),
                },
            );
        }
        Ok(Self { tables })
    }

    /// Rules are evaluated in configuration order; the first rule with any
    /// matching pattern wins, and unmatched titles fall back to the
    /// category's default rule.
    pub fn resolve(
        &self,
        category: EmployeeCategory,
        title: &str,
    ) -> Result<&ConditionSets, ConfigError> {
        let table = self
            .tables
            .get(&category)
            .ok_or_else(|| ConfigError::UnknownCategory {
                category: category.label().to_string(),
            })?;
        let normalized = normalize_title(title);
        for rule in &table.rules {
            if rule.patterns.iter().any(|pattern| pattern.matches(&normalized)) {
                return Ok(&rule.sets);
            }
        }
        Ok(&table.default)
    }
}

fn check_ids(outcome: &RuleOutcome) -> Result<(), ConfigError> {
    for id in outcome.applicable.iter().chain(outcome.excluded.iter()) {
        ConditionCatalog::get(*id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AreaScope, CategoryRules, PositionRule};
    use std::collections::BTreeMap;

    fn policy_with_rules(rules: Vec<PositionRule>) -> PolicyConfig {
        let mut categories = BTreeMap::new();
        categories.insert(
            EmployeeCategory::Standard,
            CategoryRules {
                rules,
                default: RuleOutcome {
                    applicable: (1..=10).collect(),
                    excluded: Vec::new(),
                },
            },
        );
        PolicyConfig {
            categories,
            area_assignments: Vec::new(),
            default_area_scope: AreaScope::Own,
            thresholds: BTreeMap::new(),
        }
    }

    fn rule(patterns: &[&str], strategy: MatchStrategy, applicable: &[u8]) -> PositionRule {
        PositionRule {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            strategy,
            outcome: RuleOutcome {
                applicable: applicable.to_vec(),
                excluded: Vec::new(),
            },
        }
    }

    #[test]
    fn first_matching_rule_wins_in_configuration_order() {
        let matrix = PositionMatrix::new(&policy_with_rules(vec![
            rule(&["LEADER"], MatchStrategy::Substring, &[1]),
            rule(&["LINE LEADER"], MatchStrategy::Substring, &[2]),
        ]))
        .expect("matrix compiles");

        let sets = matrix
            .resolve(EmployeeCategory::Standard, "Line Leader")
            .expect("resolves");
        assert!(sets.is_applicable(1));
        assert!(!sets.is_applicable(2));
    }

    #[test]
    fn normalization_ignores_case_and_extra_whitespace() {
        let matrix = PositionMatrix::new(&policy_with_rules(vec![rule(
            &["LINE LEADER"],
            MatchStrategy::Substring,
            &[1, 2],
        )]))
        .expect("matrix compiles");

        let sets = matrix
            .resolve(EmployeeCategory::Standard, "  senior   line   leader ")
            .expect("resolves");
        assert!(sets.is_applicable(1));
    }

    #[test]
    fn exact_strategy_requires_full_title_match() {
        let matrix = PositionMatrix::new(&policy_with_rules(vec![rule(
            &["INSPECTOR"],
            MatchStrategy::Exact,
            &[9],
        )]))
        .expect("matrix compiles");

        let exact = matrix
            .resolve(EmployeeCategory::Standard, "inspector")
            .expect("resolves");
        assert!(exact.is_applicable(9));

        let fallback = matrix
            .resolve(EmployeeCategory::Standard, "senior inspector")
            .expect("resolves");
        assert!(fallback.is_applicable(10), "unmatched titles use the default rule");
    }

    #[test]
    fn regex_strategy_matches_normalized_title() {
        let matrix = PositionMatrix::new(&policy_with_rules(vec![rule(
            &["^(LEAD|CHIEF) AUDITOR$"],
            MatchStrategy::Regex,
            &[3],
        )]))
        .expect("matrix compiles");

        let sets = matrix
            .resolve(EmployeeCategory::Standard, "chief auditor")
            .expect("resolves");
        assert!(sets.is_applicable(3));
    }

    #[test]
    fn invalid_regex_is_a_configuration_error() {
        let result = PositionMatrix::new(&policy_with_rules(vec![rule(
            &["(unclosed"],
            MatchStrategy::Regex,
            &[1],
        )]));
        match result {
            Err(ConfigError::InvalidPattern { pattern, .. }) => {
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("expected invalid pattern, got {other:?}"),
        }
    }

    #[test]
    fn missing_category_table_is_fatal() {
        let matrix =
            PositionMatrix::new(&policy_with_rules(Vec::new())).expect("matrix compiles");
        match matrix.resolve(EmployeeCategory::Contractor, "Inspector") {
            Err(ConfigError::UnknownCategory { category }) => {
                assert_eq!(category, "contractor");
            }
            other => panic!("expected unknown category, got {other:?}"),
        }
    }

    #[test]
    fn exclusion_wins_when_an_id_is_listed_in_both_sets() {
        let sets = ConditionSets::from_outcome(&RuleOutcome {
            applicable: vec![5],
            excluded: vec![5],
        });
        assert!(!sets.is_applicable(5));
    }
}
