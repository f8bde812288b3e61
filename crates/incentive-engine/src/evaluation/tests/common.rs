use chrono::NaiveDate;

use crate::config::{AreaAssignmentRule, AreaScope, MatchStrategy, PolicyConfig};
use crate::domain::{
    AreaId, ConditionResult, EligibilityReport, EmployeeCategory, EmployeeId, EmployeeRecord,
    MetricsSnapshot, PeriodQualityDataset, QualitySample,
};
use crate::evaluation::EligibilityEngine;

/// Baseline policy plus an auditor override responsible for areas X and Y.
pub(super) fn policy() -> PolicyConfig {
    let mut config = PolicyConfig::standard_policy();
    config.area_assignments.insert(
        0,
        AreaAssignmentRule {
            patterns: vec!["AUDITOR".to_string()],
            strategy: MatchStrategy::Substring,
            scope: AreaScope::List {
                areas: vec![AreaId("X".to_string()), AreaId("Y".to_string())],
            },
        },
    );
    config
}

pub(super) fn sample(subject: &str, area: &str, failed: bool) -> QualitySample {
    QualitySample {
        subject_id: EmployeeId(subject.to_string()),
        area_id: AreaId(area.to_string()),
        failed,
    }
}

pub(super) fn period(month: u32, samples: Vec<QualitySample>) -> PeriodQualityDataset {
    PeriodQualityDataset {
        period: NaiveDate::from_ymd_opt(2026, month, 1).expect("valid date"),
        samples,
    }
}

/// Three periods in which every sample passes.
pub(super) fn clean_periods() -> Vec<PeriodQualityDataset> {
    (6..=8)
        .map(|month| {
            period(
                month,
                vec![sample("e-1", "X", false), sample("e-2", "Y", false)],
            )
        })
        .collect()
}

/// Three periods in which area X produces a reject every period.
pub(super) fn area_x_failing_periods() -> Vec<PeriodQualityDataset> {
    (6..=8)
        .map(|month| {
            period(
                month,
                vec![sample("e-1", "X", true), sample("e-2", "Y", false)],
            )
        })
        .collect()
}

pub(super) fn passing_metrics() -> MetricsSnapshot {
    MetricsSnapshot {
        attendance_rate: Some(95.0),
        unapproved_absence_days: Some(0),
        actual_working_days: Some(22),
        personal_monthly_fail_count: Some(0),
        inspection_pass_rate: Some(98.0),
        inspection_volume: Some(150),
    }
}

pub(super) fn employee(
    id: &str,
    category: EmployeeCategory,
    title: &str,
    area: &str,
    metrics: MetricsSnapshot,
) -> EmployeeRecord {
    EmployeeRecord {
        employee_id: EmployeeId(id.to_string()),
        category,
        title: title.to_string(),
        area_id: AreaId(area.to_string()),
        metrics,
    }
}

pub(super) fn engine(periods: &[PeriodQualityDataset]) -> EligibilityEngine {
    EligibilityEngine::new(policy(), periods).expect("engine builds from baseline policy")
}

pub(super) fn condition(report: &EligibilityReport, id: u8) -> &ConditionResult {
    report
        .conditions
        .iter()
        .find(|result| result.id == id)
        .expect("all ten condition ids are present")
}
