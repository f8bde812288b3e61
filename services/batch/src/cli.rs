use std::env;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use incentive_engine::EligibilityEngine;

use crate::demo::{run_demo, DemoArgs};
use crate::error::AppError;
use crate::{loader, telemetry};

#[derive(Parser, Debug)]
#[command(
    name = "Incentive Eligibility Batch",
    about = "Evaluate quality-inspection incentive eligibility for one reporting period",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a full batch from policy, metrics, and period files
    Evaluate(EvaluateArgs),
    /// Run a self-contained demo batch (default command)
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Declarative policy rule table (JSON)
    #[arg(long)]
    policy: PathBuf,
    /// Employee metrics export (CSV, one row per employee)
    #[arg(long)]
    metrics: PathBuf,
    /// Rolling period quality datasets (JSON array, oldest first)
    #[arg(long)]
    periods: PathBuf,
    /// Print only the batch summary
    #[arg(long)]
    summary_only: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    telemetry::init(&log_level)?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Demo(DemoArgs::default()));

    match command {
        Command::Evaluate(args) => run_evaluate(args),
        Command::Demo(args) => run_demo(args),
    }
}

fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let policy = loader::load_policy(&args.policy)?;
    let periods = loader::load_periods(&args.periods)?;
    let employees = loader::load_metrics(&args.metrics)?;

    let engine = EligibilityEngine::new(policy, &periods)?;
    let outcome = engine.evaluate_batch(&employees)?;

    info!(
        employees = outcome.reports.len(),
        eligible = outcome.summary.eligible,
        warnings = outcome.warnings.len(),
        "batch evaluated"
    );

    if args.summary_only {
        println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }
    Ok(())
}
