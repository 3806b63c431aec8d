// Status counters across a finished run

use crate::model::{ReportFeature, Status};
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of items per status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    total: usize,
    by_status: BTreeMap<Status, usize>,
}

impl StatusCounts {
    pub fn add(&mut self, status: Status) {
        self.total += 1;
        *self.by_status.entry(status).or_insert(0) += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, status: Status) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Share of `status` with one decimal, e.g. `66.7%`
    pub fn percentage(&self, status: Status) -> String {
        if self.total == 0 {
            return "0.0%".to_string();
        }
        format!(
            "{:.1}%",
            self.count(status) as f64 / self.total as f64 * 100.0
        )
    }
}

/// Scenario and step counts for the overview of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteSummary {
    pub features: usize,
    pub scenarios: StatusCounts,
    pub steps: StatusCounts,
}

impl SuiteSummary {
    pub fn from_features(features: &[ReportFeature]) -> Self {
        let mut summary = Self {
            features: features.len(),
            ..Self::default()
        };

        for feature in features {
            for scenario in feature.scenarios() {
                summary.scenarios.add(scenario.status());
            }
            for step in feature.steps() {
                summary.steps.add(step.status());
            }
        }

        summary
    }

    pub fn has_failures(&self) -> bool {
        self.scenarios.count(Status::Failed) > 0 || self.steps.count(Status::Failed) > 0
    }
}
