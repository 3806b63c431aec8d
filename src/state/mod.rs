// State module - report aggregation and the finished suite report

pub mod metrics;
pub mod report;

pub use metrics::SuiteMetrics;
pub use report::Report;

use crate::model::{ReportFeature, Status, SuiteSummary, rollup};
use serde::Serialize;
use std::time::Duration;

/// Finished report of one suite run, handed to consumers read-only
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    features: Vec<ReportFeature>,
    summary: SuiteSummary,
    pub metrics: SuiteMetrics,
}

impl SuiteReport {
    pub fn new(features: Vec<ReportFeature>, metrics: SuiteMetrics) -> Self {
        let summary = SuiteSummary::from_features(&features);
        Self {
            features,
            summary,
            metrics,
        }
    }

    /// Features in execution order
    pub fn features(&self) -> &[ReportFeature] {
        &self.features
    }

    pub fn summary(&self) -> &SuiteSummary {
        &self.summary
    }

    pub fn metrics(&self) -> &SuiteMetrics {
        &self.metrics
    }

    /// Total elapsed time of the run
    pub fn duration(&self) -> Duration {
        self.metrics.total_duration
    }

    /// Rolled-up status of every feature
    pub fn status(&self) -> Status {
        rollup(self.features.iter().map(ReportFeature::status))
    }

    pub fn all_passed(&self) -> bool {
        self.status() == Status::Passed
    }
}
