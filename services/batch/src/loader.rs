use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use incentive_engine::{
    AreaId, EmployeeCategory, EmployeeId, EmployeeRecord, MetricsSnapshot, PeriodQualityDataset,
    PolicyConfig,
};

use crate::error::AppError;

pub(crate) fn load_policy(path: &Path) -> Result<PolicyConfig, AppError> {
    let file = File::open(path)?;
    PolicyConfig::from_reader(BufReader::new(file)).map_err(AppError::from)
}

/// Period datasets arrive as a JSON array ordered oldest first.
pub(crate) fn load_periods(path: &Path) -> Result<Vec<PeriodQualityDataset>, AppError> {
    let file = File::open(path)?;
    let periods = serde_json::from_reader(BufReader::new(file))?;
    Ok(periods)
}

pub(crate) fn load_metrics(path: &Path) -> Result<Vec<EmployeeRecord>, AppError> {
    let file = File::open(path)?;
    parse_metrics(BufReader::new(file))
}

/// One row per employee; empty metric cells mean "missing" and are left for
/// the engine's default-resolution step.
#[derive(Debug, Deserialize)]
struct MetricsRow {
    employee_id: String,
    category: EmployeeCategory,
    title: String,
    area_id: String,
    attendance_rate: Option<f64>,
    unapproved_absence_days: Option<u32>,
    actual_working_days: Option<u32>,
    personal_monthly_fail_count: Option<u32>,
    inspection_pass_rate: Option<f64>,
    inspection_volume: Option<u32>,
}

impl MetricsRow {
    fn into_record(self) -> EmployeeRecord {
        EmployeeRecord {
            employee_id: EmployeeId(self.employee_id),
            category: self.category,
            title: self.title,
            area_id: AreaId(self.area_id),
            metrics: MetricsSnapshot {
                attendance_rate: self.attendance_rate,
                unapproved_absence_days: self.unapproved_absence_days,
                actual_working_days: self.actual_working_days,
                personal_monthly_fail_count: self.personal_monthly_fail_count,
                inspection_pass_rate: self.inspection_pass_rate,
                inspection_volume: self.inspection_volume,
            },
        }
    }
}

fn parse_metrics<R: Read>(reader: R) -> Result<Vec<EmployeeRecord>, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize::<MetricsRow>() {
        records.push(row?.into_record());
    }
    Ok(records)
}
