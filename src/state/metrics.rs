// Suite metrics

use crate::time::serialize_secs;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Wall-clock bounds and elapsed time of one suite run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteMetrics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_secs")]
    pub total_duration: Duration,
}

impl Default for SuiteMetrics {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            total_duration: Duration::ZERO,
        }
    }
}

impl SuiteMetrics {
    /// Mark the run as started now
    pub fn start(&mut self) {
        self.started_at = Utc::now();
        self.finished_at = None;
        self.total_duration = Duration::ZERO;
    }

    /// Record the elapsed time of the run
    pub fn finish(&mut self, elapsed: Duration) {
        self.finished_at = Some(Utc::now());
        self.total_duration = elapsed;
    }
}
