use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for employees under evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

/// Identifier wrapper for production areas, the physical zones used as the
/// unit of quality aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaId(pub String);

/// Employment tiers recognized by the incentive policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeCategory {
    Standard,
    Contractor,
    NewHire,
}

impl EmployeeCategory {
    pub const fn label(self) -> &'static str {
        match self {
            EmployeeCategory::Standard => "standard",
            EmployeeCategory::Contractor => "contractor",
            EmployeeCategory::NewHire => "new_hire",
        }
    }

    /// New hires sit outside the incentive entirely; their reports carry an
    /// explicit exclusion reason rather than per-condition failures.
    pub const fn is_policy_excluded(self) -> bool {
        matches!(self, EmployeeCategory::NewHire)
    }
}

/// Raw per-period metrics as delivered by ingestion. Every field is optional;
/// missing values are resolved to documented defaults in one centralized step
/// before any condition sees them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub attendance_rate: Option<f64>,
    pub unapproved_absence_days: Option<u32>,
    pub actual_working_days: Option<u32>,
    pub personal_monthly_fail_count: Option<u32>,
    pub inspection_pass_rate: Option<f64>,
    pub inspection_volume: Option<u32>,
}

/// One employee's snapshot for the reporting period. Immutable per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub employee_id: EmployeeId,
    pub category: EmployeeCategory,
    pub title: String,
    pub area_id: AreaId,
    pub metrics: MetricsSnapshot,
}

/// One inspection outcome attributed to a subject and an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySample {
    pub subject_id: EmployeeId,
    pub area_id: AreaId,
    pub failed: bool,
}

/// All quality samples recorded for one reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodQualityDataset {
    /// First day of the reporting period.
    pub period: NaiveDate,
    pub samples: Vec<QualitySample>,
}

/// Value representation for condition actuals and thresholds so renderers can
/// consume structured data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    Decimal(f64),
    Count(u32),
    Flag(bool),
}

/// Outcome of one condition for one employee. `passed` is meaningful only
/// when `applicable` is true; downstream renderers must branch on the
/// applicability flag first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionResult {
    pub id: u8,
    pub applicable: bool,
    pub passed: bool,
    pub actual: Option<MetricValue>,
    pub threshold: Option<MetricValue>,
}

impl ConditionResult {
    pub fn not_applicable(id: u8) -> Self {
        Self {
            id,
            applicable: false,
            passed: false,
            actual: None,
            threshold: None,
        }
    }
}

/// Terminal report states that bypass per-condition evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExclusionReason {
    PolicyExcluded,
}

impl ExclusionReason {
    pub const fn label(self) -> &'static str {
        match self {
            ExclusionReason::PolicyExcluded => "policy_excluded",
        }
    }
}

/// The immutable per-employee decision. Always carries all ten condition ids
/// in order so renderers can distinguish "not applicable" from "failed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub employee_id: EmployeeId,
    pub category: EmployeeCategory,
    pub title: String,
    pub conditions: Vec<ConditionResult>,
    pub overall_eligible: bool,
    pub exclusion_reason: Option<ExclusionReason>,
}

/// Fields a data-quality warning can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    AttendanceRate,
    UnapprovedAbsenceDays,
    ActualWorkingDays,
    PersonalMonthlyFailCount,
    InspectionPassRate,
    InspectionVolume,
    RollingHistory,
    AreaCoverage,
}

impl MetricField {
    pub const fn label(self) -> &'static str {
        match self {
            MetricField::AttendanceRate => "attendance_rate",
            MetricField::UnapprovedAbsenceDays => "unapproved_absence_days",
            MetricField::ActualWorkingDays => "actual_working_days",
            MetricField::PersonalMonthlyFailCount => "personal_monthly_fail_count",
            MetricField::InspectionPassRate => "inspection_pass_rate",
            MetricField::InspectionVolume => "inspection_volume",
            MetricField::RollingHistory => "rolling_history",
            MetricField::AreaCoverage => "area_coverage",
        }
    }
}

/// Non-fatal input deficiency, accumulated at batch level so operators can
/// audit incomplete data without losing the rest of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    pub employee_id: EmployeeId,
    pub field: MetricField,
    pub detail: String,
}
