use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{AreaScope, PolicyConfig};
use crate::domain::{AreaId, PeriodQualityDataset};
use crate::error::ConfigError;
use crate::matrix::{normalize_title, CompiledPattern};

/// Current-period inspection counts for one area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AreaTally {
    pub failed: u32,
    pub total: u32,
}

impl AreaTally {
    /// failed/total; 0 when the area recorded no inspections.
    pub fn reject_rate(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.failed) / f64::from(self.total)
        }
    }
}

/// Per-area reject statistics for the current period, frozen after one pass
/// over the dataset.
#[derive(Debug, Clone, Default)]
pub struct AreaAggregator {
    tallies: BTreeMap<AreaId, AreaTally>,
}

impl AreaAggregator {
    pub fn compute(dataset: &PeriodQualityDataset) -> Self {
        let mut tallies: BTreeMap<AreaId, AreaTally> = BTreeMap::new();
        for sample in &dataset.samples {
            let tally = tallies.entry(sample.area_id.clone()).or_default();
            tally.total += 1;
            if sample.failed {
                tally.failed += 1;
            }
        }
        Self { tallies }
    }

    /// Areas absent from the current dataset tally as 0/0.
    pub fn tally(&self, area: &AreaId) -> AreaTally {
        self.tallies.get(area).copied().unwrap_or_default()
    }

    pub fn reject_rate(&self, area: &AreaId) -> f64 {
        self.tally(area).reject_rate()
    }

    pub fn contains(&self, area: &AreaId) -> bool {
        self.tallies.contains_key(area)
    }

    pub fn areas(&self) -> impl Iterator<Item = &AreaId> {
        self.tallies.keys()
    }

    /// Pooled failed/total across the given areas. Pooling counts avoids the
    /// distortion an average of per-area rates picks up from unequal area
    /// sizes.
    pub fn pooled_rate<'a, I>(&self, areas: I) -> f64
    where
        I: IntoIterator<Item = &'a AreaId>,
    {
        let mut pooled = AreaTally::default();
        for area in areas {
            let tally = self.tally(area);
            pooled.failed += tally.failed;
            pooled.total += tally.total;
        }
        pooled.reject_rate()
    }

    /// Pooled rate over every area in the current period.
    pub fn facility_rate(&self) -> f64 {
        self.pooled_rate(self.tallies.keys())
    }

    /// Effective reject rate over a responsible-area scope.
    pub fn effective_reject_rate(&self, scope: &ResponsibleArea, own_area: &AreaId) -> f64 {
        match scope {
            ResponsibleArea::None => 0.0,
            ResponsibleArea::OwnArea => self.reject_rate(own_area),
            ResponsibleArea::Areas(areas) => self.pooled_rate(areas.iter()),
            ResponsibleArea::AllAreas => self.facility_rate(),
        }
    }
}

/// The area(s) an employee answers for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResponsibleArea {
    None,
    OwnArea,
    Areas(Vec<AreaId>),
    AllAreas,
}

struct CompiledAssignment {
    patterns: Vec<CompiledPattern>,
    scope: AreaScope,
}

/// Resolves job titles to responsible-area scopes via the policy's ordered
/// assignment rules; unmatched titles take the configured default scope.
pub struct AreaResolver {
    rules: Vec<CompiledAssignment>,
    default_scope: AreaScope,
}

impl AreaResolver {
    pub fn new(config: &PolicyConfig) -> Result<Self, ConfigError> {
        let mut rules = Vec::with_capacity(config.area_assignments.len());
        for rule in &config.area_assignments {
            let patterns = rule
                .patterns
                .iter()
                .map(|pattern| CompiledPattern::compile(pattern, rule.strategy))
                .collect::<Result<Vec<_>, _>>()?;
            rules.push(CompiledAssignment {
                patterns,
                scope: rule.scope.clone(),
            });
        }
        Ok(Self {
            rules,
            default_scope: config.default_area_scope.clone(),
        })
    }

    pub fn resolve(&self, title: &str) -> ResponsibleArea {
        let normalized = normalize_title(title);
        let scope = self
            .rules
            .iter()
            .find(|rule| rule.patterns.iter().any(|pattern| pattern.matches(&normalized)))
            .map(|rule| &rule.scope)
            .unwrap_or(&self.default_scope);
        match scope {
            AreaScope::Own => ResponsibleArea::OwnArea,
            AreaScope::All => ResponsibleArea::AllAreas,
            AreaScope::None => ResponsibleArea::None,
            AreaScope::List { areas } => ResponsibleArea::Areas(areas.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AreaAssignmentRule, MatchStrategy};
    use crate::domain::{EmployeeId, QualitySample};
    use chrono::NaiveDate;

    fn area(id: &str) -> AreaId {
        AreaId(id.to_string())
    }

    fn dataset(samples: Vec<(&str, &str, bool)>) -> PeriodQualityDataset {
        PeriodQualityDataset {
            period: NaiveDate::from_ymd_opt(2026, 8, 1).expect("valid date"),
            samples: samples
                .into_iter()
                .map(|(subject, area_id, failed)| QualitySample {
                    subject_id: EmployeeId(subject.to_string()),
                    area_id: area(area_id),
                    failed,
                })
                .collect(),
        }
    }

    #[test]
    fn compute_tallies_failed_over_total() {
        let aggregator = AreaAggregator::compute(&dataset(vec![
            ("e1", "X", true),
            ("e2", "X", false),
            ("e3", "X", true),
            ("e4", "Y", false),
        ]));

        assert_eq!(
            aggregator.tally(&area("X")),
            AreaTally { failed: 2, total: 3 }
        );
        assert!((aggregator.reject_rate(&area("Y")) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_inspection_area_has_zero_rate() {
        let aggregator = AreaAggregator::compute(&dataset(Vec::new()));
        assert_eq!(aggregator.reject_rate(&area("missing")), 0.0);
        assert!(!aggregator.contains(&area("missing")));
    }

    #[test]
    fn pooled_rate_is_not_an_average_of_per_area_rates() {
        // Area A: 1/2 failed. Area B: 0/98 failed. Pooled: 1/100.
        let mut samples = vec![("a1", "A", true), ("a2", "A", false)];
        for _ in 0..98 {
            samples.push(("b", "B", false));
        }
        let aggregator = AreaAggregator::compute(&dataset(samples));

        let pooled = aggregator.pooled_rate([area("A"), area("B")].iter());
        assert!((pooled - 0.01).abs() < 1e-9);

        let averaged =
            (aggregator.reject_rate(&area("A")) + aggregator.reject_rate(&area("B"))) / 2.0;
        assert!((averaged - 0.25).abs() < 1e-9, "averaging would distort");
    }

    #[test]
    fn resolver_defaults_to_own_area() {
        let resolver = AreaResolver::new(&PolicyConfig::standard_policy()).expect("resolver");
        assert_eq!(resolver.resolve("Inspector"), ResponsibleArea::OwnArea);
        assert_eq!(
            resolver.resolve("Quality Supervisor"),
            ResponsibleArea::AllAreas
        );
    }

    #[test]
    fn explicit_area_lists_resolve_in_rule_order() {
        let mut config = PolicyConfig::standard_policy();
        config.area_assignments.insert(
            0,
            AreaAssignmentRule {
                patterns: vec!["AUDITOR".to_string()],
                strategy: MatchStrategy::Substring,
                scope: AreaScope::List {
                    areas: vec![area("A"), area("B")],
                },
            },
        );
        let resolver = AreaResolver::new(&config).expect("resolver");
        assert_eq!(
            resolver.resolve("Senior Auditor"),
            ResponsibleArea::Areas(vec![area("A"), area("B")])
        );
    }

    #[test]
    fn effective_rate_pools_across_scope() {
        let aggregator = AreaAggregator::compute(&dataset(vec![
            ("e1", "A", true),
            ("e2", "A", false),
            ("e3", "B", false),
            ("e4", "B", false),
        ]));
        let own = area("A");

        let rate = aggregator.effective_reject_rate(
            &ResponsibleArea::Areas(vec![area("A"), area("B")]),
            &own,
        );
        assert!((rate - 0.25).abs() < 1e-9);

        let all = aggregator.effective_reject_rate(&ResponsibleArea::AllAreas, &own);
        assert!((all - 0.25).abs() < 1e-9);

        let none = aggregator.effective_reject_rate(&ResponsibleArea::None, &own);
        assert_eq!(none, 0.0);
    }
}
