//! The orchestrating engine: combines the position matrix, failure windows,
//! and area statistics into one immutable decision report per employee.

mod conditions;
mod defaults;

#[cfg(test)]
mod tests;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::area::{AreaAggregator, AreaResolver, ResponsibleArea};
use crate::catalog::{ConditionCatalog, CONDITION_COUNT};
use crate::config::PolicyConfig;
use crate::domain::{
    ConditionResult, DataQualityWarning, EligibilityReport, EmployeeRecord, ExclusionReason,
    MetricField, PeriodQualityDataset,
};
use crate::error::ConfigError;
use crate::matrix::PositionMatrix;
use crate::report::BatchSummary;
use crate::rolling::{
    area_marks, employee_marks, FailureWindow, RollingFailureTracker, ROLLING_WINDOW_PERIODS,
};
use conditions::ConditionInput;
use defaults::resolve_metrics;

/// Shared read-only context built once per period batch: current-period area
/// tallies plus the two rolling failure windows.
#[derive(Debug)]
pub struct PeriodContext {
    pub(crate) area_stats: AreaAggregator,
    pub(crate) personal_failures: FailureWindow,
    pub(crate) area_failures: FailureWindow,
}

impl PeriodContext {
    /// `periods` are ordered oldest to newest; the last one is the current
    /// reporting period. Fewer than the full rolling window produces empty
    /// failure windows rather than an error.
    pub fn build(periods: &[PeriodQualityDataset]) -> Self {
        if periods.len() < ROLLING_WINDOW_PERIODS {
            warn!(
                supplied = periods.len(),
                window = ROLLING_WINDOW_PERIODS,
                "rolling history shorter than the window; continuous-failure checks pass vacuously"
            );
        }
        let mut personal = RollingFailureTracker::new(ROLLING_WINDOW_PERIODS);
        let mut areas = RollingFailureTracker::new(ROLLING_WINDOW_PERIODS);
        for dataset in periods {
            personal.push_period(employee_marks(dataset));
            areas.push_period(area_marks(dataset));
        }
        let area_stats = periods
            .last()
            .map(AreaAggregator::compute)
            .unwrap_or_default();
        Self {
            area_stats,
            personal_failures: personal.build(),
            area_failures: areas.build(),
        }
    }

    pub fn area_stats(&self) -> &AreaAggregator {
        &self.area_stats
    }
}

/// One employee's report plus the data-quality warnings its evaluation
/// surfaced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeEvaluation {
    pub report: EligibilityReport,
    pub warnings: Vec<DataQualityWarning>,
}

/// Everything a batch run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub reports: Vec<EligibilityReport>,
    pub warnings: Vec<DataQualityWarning>,
    pub summary: BatchSummary,
}

/// Stateless per-employee evaluator over a frozen period context.
pub struct EligibilityEngine {
    policy: PolicyConfig,
    matrix: PositionMatrix,
    areas: AreaResolver,
    context: PeriodContext,
}

impl EligibilityEngine {
    /// Validates and compiles the policy, then builds the shared context in
    /// a single pass over the period datasets.
    pub fn new(
        policy: PolicyConfig,
        periods: &[PeriodQualityDataset],
    ) -> Result<Self, ConfigError> {
        policy.validate()?;
        let matrix = PositionMatrix::new(&policy)?;
        let areas = AreaResolver::new(&policy)?;
        let context = PeriodContext::build(periods);
        Ok(Self {
            policy,
            matrix,
            areas,
            context,
        })
    }

    pub fn context(&self) -> &PeriodContext {
        &self.context
    }

    /// Pure per-employee evaluation. The only fatal failure is a rule table
    /// that does not cover the employee's category; incomplete metrics
    /// become warnings, never errors.
    pub fn evaluate(&self, employee: &EmployeeRecord) -> Result<EmployeeEvaluation, ConfigError> {
        if employee.category.is_policy_excluded() {
            return Ok(EmployeeEvaluation {
                report: Self::excluded_report(employee),
                warnings: Vec::new(),
            });
        }

        let sets = self.matrix.resolve(employee.category, &employee.title)?;
        let mut warnings = Vec::new();
        let metrics = resolve_metrics(employee, &mut warnings);
        let scope = self.areas.resolve(&employee.title);
        let input = ConditionInput {
            employee,
            metrics: &metrics,
            scope: &scope,
            context: &self.context,
        };

        let mut results = Vec::with_capacity(usize::from(CONDITION_COUNT));
        for definition in ConditionCatalog::all() {
            if !sets.is_applicable(definition.id) {
                results.push(ConditionResult::not_applicable(definition.id));
                continue;
            }
            match definition.id {
                6 => self.warn_partial_personal_history(employee, &mut warnings),
                7 => self.warn_partial_area_history(employee, &scope, &mut warnings),
                _ => {}
            }
            let threshold = self.policy.threshold(definition.id);
            let check = conditions::evaluate(definition, threshold, &input);
            results.push(ConditionResult {
                id: definition.id,
                applicable: true,
                passed: check.passed,
                actual: check.actual,
                threshold: check.threshold,
            });
        }

        // An empty applicable set is vacuously eligible: the matrix chose to
        // subject this position to no checks.
        let overall_eligible = results
            .iter()
            .filter(|result| result.applicable)
            .all(|result| result.passed);

        Ok(EmployeeEvaluation {
            report: EligibilityReport {
                employee_id: employee.employee_id.clone(),
                category: employee.category,
                title: employee.title.clone(),
                conditions: results,
                overall_eligible,
                exclusion_reason: None,
            },
            warnings,
        })
    }

    /// Fan out over employees with no shared mutable state; the context is
    /// frozen before the first evaluation. Report order follows input order.
    pub fn evaluate_batch(
        &self,
        employees: &[EmployeeRecord],
    ) -> Result<BatchOutcome, ConfigError> {
        let evaluations: Vec<EmployeeEvaluation> = employees
            .par_iter()
            .map(|employee| self.evaluate(employee))
            .collect::<Result<_, _>>()?;

        let mut reports = Vec::with_capacity(evaluations.len());
        let mut warnings = Vec::new();
        for evaluation in evaluations {
            reports.push(evaluation.report);
            warnings.extend(evaluation.warnings);
        }
        let summary = BatchSummary::from_reports(&reports);

        if !warnings.is_empty() {
            warn!(
                count = warnings.len(),
                "batch completed with data-quality warnings"
            );
        }
        debug!(
            employees = reports.len(),
            eligible = summary.eligible,
            "eligibility batch evaluated"
        );

        Ok(BatchOutcome {
            reports,
            warnings,
            summary,
        })
    }

    fn warn_partial_personal_history(
        &self,
        employee: &EmployeeRecord,
        warnings: &mut Vec<DataQualityWarning>,
    ) {
        if !self
            .context
            .personal_failures
            .has_full_history(&employee.employee_id.0)
        {
            warnings.push(DataQualityWarning {
                employee_id: employee.employee_id.clone(),
                field: MetricField::RollingHistory,
                detail: "no personal quality record for one or more rolling periods".to_string(),
            });
        }
    }

    fn warn_partial_area_history(
        &self,
        employee: &EmployeeRecord,
        scope: &ResponsibleArea,
        warnings: &mut Vec<DataQualityWarning>,
    ) {
        if matches!(scope, ResponsibleArea::OwnArea)
            && !self
                .context
                .area_failures
                .has_full_history(&employee.area_id.0)
        {
            warnings.push(DataQualityWarning {
                employee_id: employee.employee_id.clone(),
                field: MetricField::AreaCoverage,
                detail: format!(
                    "area '{}' has no quality record for one or more rolling periods",
                    employee.area_id.0
                ),
            });
        }
    }

    /// The excluded tier is an explicit terminal state, not a fall-through
    /// of individual failures.
    fn excluded_report(employee: &EmployeeRecord) -> EligibilityReport {
        EligibilityReport {
            employee_id: employee.employee_id.clone(),
            category: employee.category,
            title: employee.title.clone(),
            conditions: ConditionCatalog::all()
                .map(|definition| ConditionResult::not_applicable(definition.id))
                .collect(),
            overall_eligible: false,
            exclusion_reason: Some(ExclusionReason::PolicyExcluded),
        }
    }
}
