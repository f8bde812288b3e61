use std::collections::{BTreeMap, BTreeSet};

use crate::domain::PeriodQualityDataset;

/// Number of trailing periods a subject must fail to count as continuously
/// failing.
pub const ROLLING_WINDOW_PERIODS: usize = 3;

/// Per-period failure marks for one granularity. Keys are employee ids or
/// area ids depending on which tracker instance the marks feed.
pub type PeriodMarks = BTreeMap<String, bool>;

/// Computes which subjects failed in every period of a trailing window.
/// Separate instances track employee and area granularity.
#[derive(Debug)]
pub struct RollingFailureTracker {
    window: usize,
    periods: Vec<PeriodMarks>,
}

impl RollingFailureTracker {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            periods: Vec::new(),
        }
    }

    /// Periods must be pushed oldest first.
    pub fn push_period(&mut self, marks: PeriodMarks) {
        self.periods.push(marks);
    }

    /// A continuous-failure claim requires a failed mark in every one of the
    /// window's periods. Fewer than the full window of periods yields an
    /// empty, incomplete window: partial history never produces a claim, and
    /// a subject absent from any single period is never continuously failed.
    pub fn build(&self) -> FailureWindow {
        if self.periods.len() < self.window {
            return FailureWindow::default();
        }
        let recent = &self.periods[self.periods.len() - self.window..];
        let mut continuous: BTreeSet<String> = recent[0]
            .iter()
            .filter(|(_, failed)| **failed)
            .map(|(id, _)| id.clone())
            .collect();
        let mut observed_in_all: BTreeSet<String> = recent[0].keys().cloned().collect();
        for marks in &recent[1..] {
            continuous.retain(|id| marks.get(id).copied().unwrap_or(false));
            observed_in_all.retain(|id| marks.contains_key(id));
        }
        FailureWindow {
            continuous,
            observed_in_all,
            complete: true,
        }
    }
}

/// Frozen result of a tracker build, shared read-only across a batch.
#[derive(Debug, Clone, Default)]
pub struct FailureWindow {
    continuous: BTreeSet<String>,
    observed_in_all: BTreeSet<String>,
    complete: bool,
}

impl FailureWindow {
    pub fn is_continuous_failure(&self, subject_id: &str) -> bool {
        self.continuous.contains(subject_id)
    }

    /// False when the subject is missing from one or more window periods, or
    /// when fewer than the full window of periods was supplied at all.
    pub fn has_full_history(&self, subject_id: &str) -> bool {
        self.complete && self.observed_in_all.contains(subject_id)
    }

    pub fn is_empty(&self) -> bool {
        self.continuous.is_empty()
    }

    pub fn continuous_subjects(&self) -> impl Iterator<Item = &str> {
        self.continuous.iter().map(String::as_str)
    }
}

/// Employee-granularity marks for one period: a subject failed the period
/// when any of its samples failed.
pub fn employee_marks(dataset: &PeriodQualityDataset) -> PeriodMarks {
    let mut marks = PeriodMarks::new();
    for sample in &dataset.samples {
        let entry = marks.entry(sample.subject_id.0.clone()).or_insert(false);
        *entry = *entry || sample.failed;
    }
    marks
}

/// Area-granularity marks for one period: an area failed the period when it
/// produced at least one rejected sample.
pub fn area_marks(dataset: &PeriodQualityDataset) -> PeriodMarks {
    let mut marks = PeriodMarks::new();
    for sample in &dataset.samples {
        let entry = marks.entry(sample.area_id.0.clone()).or_insert(false);
        *entry = *entry || sample.failed;
    }
    marks
}
