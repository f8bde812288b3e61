use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{EligibilityReport, EmployeeCategory};
use crate::matrix::normalize_title;

/// Batch-level eligibility counts, derived purely from report outcomes.
/// Monetary amounts are a separate pay-scale concern and never computed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub eligible: usize,
    pub ineligible: usize,
    pub policy_excluded: usize,
    pub by_category: Vec<CategoryBreakdown>,
    pub by_title: Vec<TitleBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: EmployeeCategory,
    pub eligible: usize,
    pub ineligible: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleBreakdown {
    pub title: String,
    pub eligible: usize,
    pub ineligible: usize,
}

#[derive(Default)]
struct Split {
    eligible: usize,
    ineligible: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[EligibilityReport]) -> Self {
        let mut eligible = 0;
        let mut policy_excluded = 0;
        let mut by_category: BTreeMap<EmployeeCategory, Split> = BTreeMap::new();
        let mut by_title: BTreeMap<String, Split> = BTreeMap::new();

        for report in reports {
            if report.overall_eligible {
                eligible += 1;
            }
            if report.exclusion_reason.is_some() {
                policy_excluded += 1;
            }
            let category = by_category.entry(report.category).or_default();
            let title = by_title.entry(normalize_title(&report.title)).or_default();
            if report.overall_eligible {
                category.eligible += 1;
                title.eligible += 1;
            } else {
                category.ineligible += 1;
                title.ineligible += 1;
            }
        }

        Self {
            total: reports.len(),
            eligible,
            ineligible: reports.len() - eligible,
            policy_excluded,
            by_category: by_category
                .into_iter()
                .map(|(category, split)| CategoryBreakdown {
                    category,
                    eligible: split.eligible,
                    ineligible: split.ineligible,
                })
                .collect(),
            by_title: by_title
                .into_iter()
                .map(|(title, split)| TitleBreakdown {
                    title,
                    eligible: split.eligible,
                    ineligible: split.ineligible,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConditionResult, EmployeeId, ExclusionReason};

    fn report(
        id: &str,
        category: EmployeeCategory,
        title: &str,
        eligible: bool,
        excluded: bool,
    ) -> EligibilityReport {
        EligibilityReport {
            employee_id: EmployeeId(id.to_string()),
            category,
            title: title.to_string(),
            conditions: (1..=10).map(ConditionResult::not_applicable).collect(),
            overall_eligible: eligible,
            exclusion_reason: excluded.then_some(ExclusionReason::PolicyExcluded),
        }
    }

    #[test]
    fn counts_split_by_category_and_title() {
        let reports = vec![
            report("e1", EmployeeCategory::Standard, "Inspector", true, false),
            report("e2", EmployeeCategory::Standard, "inspector", false, false),
            report("e3", EmployeeCategory::Standard, "Line Leader", true, false),
            report("e4", EmployeeCategory::NewHire, "Inspector", false, true),
        ];

        let summary = BatchSummary::from_reports(&reports);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.eligible, 2);
        assert_eq!(summary.ineligible, 2);
        assert_eq!(summary.policy_excluded, 1);

        let standard = summary
            .by_category
            .iter()
            .find(|entry| entry.category == EmployeeCategory::Standard)
            .expect("standard bucket");
        assert_eq!(standard.eligible, 2);
        assert_eq!(standard.ineligible, 1);

        let inspectors = summary
            .by_title
            .iter()
            .find(|entry| entry.title == "INSPECTOR")
            .expect("titles are normalized for grouping");
        assert_eq!(inspectors.eligible, 1);
        assert_eq!(inspectors.ineligible, 2);
    }

    #[test]
    fn empty_batch_produces_zeroed_summary() {
        let summary = BatchSummary::from_reports(&[]);
        assert_eq!(summary, BatchSummary::default());
    }
}
