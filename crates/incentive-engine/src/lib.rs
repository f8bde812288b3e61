//! Eligibility-evaluation core for the factory quality-inspection incentive.
//!
//! Once per reporting period the engine decides, for every employee, whether
//! they qualify for the performance incentive: a declarative position-rule
//! matrix selects which of the ten standardized conditions apply to each
//! (category, job title) pair, rolling failure windows track continuous
//! quality failure at employee and area granularity, and per-area reject
//! rates are pooled across each employee's responsible areas. This crate is a
//! pure computational library; ingestion and rendering live with the batch
//! driver.

pub mod area;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod matrix;
pub mod report;
pub mod rolling;

pub use area::{AreaAggregator, AreaResolver, AreaTally, ResponsibleArea};
pub use catalog::{
    Comparator, ConditionCatalog, ConditionCategory, ConditionDefinition, CONDITION_COUNT,
};
pub use config::{
    AreaAssignmentRule, AreaScope, CategoryRules, MatchStrategy, PolicyConfig, PositionRule,
    RuleOutcome,
};
pub use domain::{
    AreaId, ConditionResult, DataQualityWarning, EligibilityReport, EmployeeCategory, EmployeeId,
    EmployeeRecord, ExclusionReason, MetricField, MetricValue, MetricsSnapshot,
    PeriodQualityDataset, QualitySample,
};
pub use error::ConfigError;
pub use evaluation::{BatchOutcome, EligibilityEngine, EmployeeEvaluation, PeriodContext};
pub use matrix::{ConditionSets, PositionMatrix};
pub use report::{BatchSummary, CategoryBreakdown, TitleBreakdown};
pub use rolling::{FailureWindow, RollingFailureTracker, ROLLING_WINDOW_PERIODS};
