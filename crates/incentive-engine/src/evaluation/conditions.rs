use super::defaults::ResolvedMetrics;
use super::PeriodContext;
use crate::area::ResponsibleArea;
use crate::catalog::ConditionDefinition;
use crate::domain::{EmployeeRecord, MetricValue};

/// Outcome of one condition evaluation before report assembly.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConditionCheck {
    pub passed: bool,
    pub actual: Option<MetricValue>,
    pub threshold: Option<MetricValue>,
}

/// Everything a single condition may draw on. The context is frozen before
/// the first evaluation of a batch.
pub(crate) struct ConditionInput<'a> {
    pub employee: &'a EmployeeRecord,
    pub metrics: &'a ResolvedMetrics,
    pub scope: &'a ResponsibleArea,
    pub context: &'a PeriodContext,
}

pub(crate) fn evaluate(
    definition: &ConditionDefinition,
    threshold: Option<f64>,
    input: &ConditionInput<'_>,
) -> ConditionCheck {
    match definition.id {
        1 => attendance_rate_floor(definition, threshold, input),
        2 => unapproved_absence_cap(definition, threshold, input),
        3 => worked_at_all(definition, threshold, input),
        4 => working_days_floor(definition, threshold, input),
        5 => monthly_fail_count_exact(definition, threshold, input),
        6 => personal_window_clear(input),
        7 => area_window_clear(input),
        8 => area_reject_rate_cap(definition, threshold, input),
        9 => inspection_pass_rate_floor(definition, threshold, input),
        10 => inspection_volume_floor(definition, threshold, input),
        // Ids come straight out of the catalog iteration.
        _ => unreachable!("condition ids are catalog-validated"),
    }
}

fn rate_check(
    definition: &ConditionDefinition,
    threshold: Option<f64>,
    actual: f64,
) -> ConditionCheck {
    let limit = threshold.or(definition.default_threshold).unwrap_or(0.0);
    ConditionCheck {
        passed: definition.comparator.compare(actual, limit),
        actual: Some(MetricValue::Decimal(actual)),
        threshold: Some(MetricValue::Decimal(limit)),
    }
}

fn count_check(
    definition: &ConditionDefinition,
    threshold: Option<f64>,
    actual: u32,
) -> ConditionCheck {
    let limit = threshold.or(definition.default_threshold).unwrap_or(0.0);
    ConditionCheck {
        passed: definition.comparator.compare(f64::from(actual), limit),
        actual: Some(MetricValue::Count(actual)),
        threshold: Some(MetricValue::Decimal(limit)),
    }
}

fn window_check(continuously_failing: bool) -> ConditionCheck {
    ConditionCheck {
        passed: !continuously_failing,
        actual: Some(MetricValue::Flag(continuously_failing)),
        threshold: None,
    }
}

fn attendance_rate_floor(
    definition: &ConditionDefinition,
    threshold: Option<f64>,
    input: &ConditionInput<'_>,
) -> ConditionCheck {
    rate_check(definition, threshold, input.metrics.attendance_rate)
}

fn unapproved_absence_cap(
    definition: &ConditionDefinition,
    threshold: Option<f64>,
    input: &ConditionInput<'_>,
) -> ConditionCheck {
    count_check(definition, threshold, input.metrics.unapproved_absence_days)
}

fn worked_at_all(
    definition: &ConditionDefinition,
    threshold: Option<f64>,
    input: &ConditionInput<'_>,
) -> ConditionCheck {
    count_check(definition, threshold, input.metrics.actual_working_days)
}

fn working_days_floor(
    definition: &ConditionDefinition,
    threshold: Option<f64>,
    input: &ConditionInput<'_>,
) -> ConditionCheck {
    count_check(definition, threshold, input.metrics.actual_working_days)
}

fn monthly_fail_count_exact(
    definition: &ConditionDefinition,
    threshold: Option<f64>,
    input: &ConditionInput<'_>,
) -> ConditionCheck {
    count_check(
        definition,
        threshold,
        input.metrics.personal_monthly_fail_count,
    )
}

fn personal_window_clear(input: &ConditionInput<'_>) -> ConditionCheck {
    let failing = input
        .context
        .personal_failures
        .is_continuous_failure(&input.employee.employee_id.0);
    window_check(failing)
}

fn area_window_clear(input: &ConditionInput<'_>) -> ConditionCheck {
    let windows = &input.context.area_failures;
    let failing = match input.scope {
        ResponsibleArea::None => false,
        ResponsibleArea::OwnArea => windows.is_continuous_failure(&input.employee.area_id.0),
        ResponsibleArea::Areas(areas) => areas
            .iter()
            .any(|area| windows.is_continuous_failure(&area.0)),
        // Whole-facility responsibility: any continuously failing area counts.
        ResponsibleArea::AllAreas => !windows.is_empty(),
    };
    window_check(failing)
}

fn area_reject_rate_cap(
    definition: &ConditionDefinition,
    threshold: Option<f64>,
    input: &ConditionInput<'_>,
) -> ConditionCheck {
    let rate = input
        .context
        .area_stats
        .effective_reject_rate(input.scope, &input.employee.area_id);
    rate_check(definition, threshold, rate)
}

fn inspection_pass_rate_floor(
    definition: &ConditionDefinition,
    threshold: Option<f64>,
    input: &ConditionInput<'_>,
) -> ConditionCheck {
    rate_check(definition, threshold, input.metrics.inspection_pass_rate)
}

fn inspection_volume_floor(
    definition: &ConditionDefinition,
    threshold: Option<f64>,
    input: &ConditionInput<'_>,
) -> ConditionCheck {
    count_check(definition, threshold, input.metrics.inspection_volume)
}
