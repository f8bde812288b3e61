use tracing::debug;

use crate::domain::{DataQualityWarning, EmployeeRecord, MetricField};

/// Documented defaults for missing metric fields. Optimistic on purpose:
/// incomplete employee data must never sink a batch, only surface as
/// warnings an operator can audit afterwards.
pub(crate) const DEFAULT_ATTENDANCE_RATE: f64 = 100.0;
pub(crate) const DEFAULT_UNAPPROVED_ABSENCE_DAYS: u32 = 0;
/// A full reporting period of working days.
pub(crate) const DEFAULT_ACTUAL_WORKING_DAYS: u32 = 26;
pub(crate) const DEFAULT_PERSONAL_MONTHLY_FAIL_COUNT: u32 = 0;
pub(crate) const DEFAULT_INSPECTION_PASS_RATE: f64 = 100.0;
/// A full inspection quota.
pub(crate) const DEFAULT_INSPECTION_VOLUME: u32 = 100;

/// Metrics after the single default-resolution step. Conditions only ever
/// see resolved values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ResolvedMetrics {
    pub attendance_rate: f64,
    pub unapproved_absence_days: u32,
    pub actual_working_days: u32,
    pub personal_monthly_fail_count: u32,
    pub inspection_pass_rate: f64,
    pub inspection_volume: u32,
}

pub(crate) fn resolve_metrics(
    employee: &EmployeeRecord,
    warnings: &mut Vec<DataQualityWarning>,
) -> ResolvedMetrics {
    let metrics = &employee.metrics;

    let attendance_rate = match metrics.attendance_rate {
        Some(value) => value,
        None => {
            record_default(
                employee,
                MetricField::AttendanceRate,
                DEFAULT_ATTENDANCE_RATE,
                warnings,
            );
            DEFAULT_ATTENDANCE_RATE
        }
    };
    let unapproved_absence_days = match metrics.unapproved_absence_days {
        Some(value) => value,
        None => {
            record_default(
                employee,
                MetricField::UnapprovedAbsenceDays,
                f64::from(DEFAULT_UNAPPROVED_ABSENCE_DAYS),
                warnings,
            );
            DEFAULT_UNAPPROVED_ABSENCE_DAYS
        }
    };
    let actual_working_days = match metrics.actual_working_days {
        Some(value) => value,
        None => {
            record_default(
                employee,
                MetricField::ActualWorkingDays,
                f64::from(DEFAULT_ACTUAL_WORKING_DAYS),
                warnings,
            );
            DEFAULT_ACTUAL_WORKING_DAYS
        }
    };
    let personal_monthly_fail_count = match metrics.personal_monthly_fail_count {
        Some(value) => value,
        None => {
            record_default(
                employee,
                MetricField::PersonalMonthlyFailCount,
                f64::from(DEFAULT_PERSONAL_MONTHLY_FAIL_COUNT),
                warnings,
            );
            DEFAULT_PERSONAL_MONTHLY_FAIL_COUNT
        }
    };
    let inspection_pass_rate = match metrics.inspection_pass_rate {
        Some(value) => value,
        None => {
            record_default(
                employee,
                MetricField::InspectionPassRate,
                DEFAULT_INSPECTION_PASS_RATE,
                warnings,
            );
            DEFAULT_INSPECTION_PASS_RATE
        }
    };
    let inspection_volume = match metrics.inspection_volume {
        Some(value) => value,
        None => {
            record_default(
                employee,
                MetricField::InspectionVolume,
                f64::from(DEFAULT_INSPECTION_VOLUME),
                warnings,
            );
            DEFAULT_INSPECTION_VOLUME
        }
    };

    ResolvedMetrics {
        attendance_rate,
        unapproved_absence_days,
        actual_working_days,
        personal_monthly_fail_count,
        inspection_pass_rate,
        inspection_volume,
    }
}

fn record_default(
    employee: &EmployeeRecord,
    field: MetricField,
    default: f64,
    warnings: &mut Vec<DataQualityWarning>,
) {
    debug!(
        employee = %employee.employee_id.0,
        field = field.label(),
        default,
        "metric missing, default applied"
    );
    warnings.push(DataQualityWarning {
        employee_id: employee.employee_id.clone(),
        field,
        detail: format!("missing {}; defaulted to {default}", field.label()),
    });
}
