use chrono::{Duration, Local, NaiveDate};
use clap::Args;

use incentive_engine::{
    AreaId, BatchOutcome, EligibilityEngine, EmployeeCategory, EmployeeId, EmployeeRecord,
    EligibilityReport, MetricValue, MetricsSnapshot, PeriodQualityDataset, PolicyConfig,
    QualitySample, ROLLING_WINDOW_PERIODS,
};

use crate::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// First day of the current reporting period (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub(crate) period_start: Option<NaiveDate>,
    /// Dump the full batch outcome as JSON instead of the rendered report.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let period_start = args
        .period_start
        .unwrap_or_else(|| Local::now().date_naive());

    let policy = PolicyConfig::standard_policy();
    let periods = demo_periods(period_start);
    let employees = demo_employees();

    let engine = EligibilityEngine::new(policy, &periods)?;
    let outcome = engine.evaluate_batch(&employees)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    render_outcome(&outcome, period_start, periods.len());
    Ok(())
}

/// Three rolling periods ending at `period_start`. Area A is clean throughout;
/// area B carries one inspector (E-2001) who fails in every period, which
/// keeps the whole area inside a continuous failure window.
fn demo_periods(period_start: NaiveDate) -> Vec<PeriodQualityDataset> {
    let window = ROLLING_WINDOW_PERIODS as i64;
    (0..window)
        .map(|offset| {
            let period = period_start - Duration::days(30 * (window - 1 - offset));
            let mut samples = Vec::new();
            for unit in 0..45 {
                samples.push(sample(&format!("crew-a-{unit}"), "A", false));
            }
            for unit in 0..9 {
                samples.push(sample(&format!("crew-b-{unit}"), "B", false));
            }
            samples.push(sample("E-2001", "B", true));
            PeriodQualityDataset { period, samples }
        })
        .collect()
}

fn sample(subject: &str, area: &str, failed: bool) -> QualitySample {
    QualitySample {
        subject_id: EmployeeId(subject.to_string()),
        area_id: AreaId(area.to_string()),
        failed,
    }
}

fn demo_employees() -> Vec<EmployeeRecord> {
    let passing = MetricsSnapshot {
        attendance_rate: Some(96.0),
        unapproved_absence_days: Some(0),
        actual_working_days: Some(22),
        personal_monthly_fail_count: Some(0),
        inspection_pass_rate: Some(98.0),
        inspection_volume: Some(150),
    };

    vec![
        employee("E-1001", EmployeeCategory::Standard, "Line Leader", "A", passing.clone()),
        employee("E-1002", EmployeeCategory::Standard, "Inspector", "B", passing.clone()),
        employee(
            "E-2001",
            EmployeeCategory::Standard,
            "Inspector",
            "B",
            MetricsSnapshot {
                personal_monthly_fail_count: Some(1),
                ..passing.clone()
            },
        ),
        employee("E-3001", EmployeeCategory::NewHire, "Inspector", "A", MetricsSnapshot::default()),
        employee(
            "E-4001",
            EmployeeCategory::Contractor,
            "Inspector",
            "A",
            MetricsSnapshot {
                inspection_pass_rate: None,
                inspection_volume: None,
                ..passing.clone()
            },
        ),
        employee(
            "E-5001",
            EmployeeCategory::Standard,
            "Quality Supervisor",
            "A",
            passing,
        ),
    ]
}

fn employee(
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

fn render_outcome(outcome: &BatchOutcome, period_start: NaiveDate, period_count: usize) {
    println!("Incentive eligibility demo");
    println!(
        "Reporting period starting {} ({} periods of history)",
        period_start, period_count
    );

    println!("\nPer-employee decisions");
    for report in &outcome.reports {
        render_report(report);
    }

    let summary = &outcome.summary;
    println!("\nBatch summary");
    println!(
        "- {} evaluated | {} eligible | {} ineligible | {} policy-excluded",
        summary.total, summary.eligible, summary.ineligible, summary.policy_excluded
    );
    for entry in &summary.by_category {
        println!(
            "- {}: {} eligible, {} ineligible",
            entry.category.label(),
            entry.eligible,
            entry.ineligible
        );
    }
    for entry in &summary.by_title {
        println!(
            "- {}: {} eligible, {} ineligible",
            entry.title, entry.eligible, entry.ineligible
        );
    }

    if outcome.warnings.is_empty() {
        println!("\nData quality warnings: none");
    } else {
        println!("\nData quality warnings");
        for warning in &outcome.warnings {
            println!(
                "- {} [{}]: {}",
                warning.employee_id.0,
                warning.field.label(),
                warning.detail
            );
        }
    }
}

fn render_report(report: &EligibilityReport) {
    let verdict = if let Some(reason) = report.exclusion_reason {
        format!("excluded ({})", reason.label())
    } else if report.overall_eligible {
        "eligible".to_string()
    } else {
        "ineligible".to_string()
    };
    println!(
        "- {} | {} {} | {}",
        report.employee_id.0,
        report.category.label(),
        report.title,
        verdict
    );

    for condition in &report.conditions {
        if condition.applicable && !condition.passed {
            println!(
                "    failed condition {}: {} (actual {}, threshold {})",
                condition.id,
                condition_label(condition.id),
                format_value(condition.actual),
                format_value(condition.threshold)
            );
        }
    }
}

fn condition_label(id: u8) -> &'static str {
    match id {
        1 => "attendance rate floor",
        2 => "unapproved absence cap",
        3 => "worked at all",
        4 => "working days floor",
        5 => "zero monthly quality failures",
        6 => "no continuous personal failure",
        7 => "no continuous area failure",
        8 => "area reject rate cap",
        9 => "inspection pass rate floor",
        10 => "inspection volume floor",
        _ => "unknown condition",
    }
}

fn format_value(value: Option<MetricValue>) -> String {
    match value {
        Some(MetricValue::Decimal(number)) => format!("{number:.3}"),
        Some(MetricValue::Count(count)) => count.to_string(),
        Some(MetricValue::Flag(flag)) => flag.to_string(),
        None => "n/a".to_string(),
    }
}
