// Report module - consumers of the finished report tree

pub mod console;
pub mod json;
pub mod junit;

use crate::model::ReportFeature;
use crate::state::SuiteReport;
use anyhow::Result;
pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use junit::JunitReporter;

/// Reporter trait
pub trait Reporter: Send + Sync {
    /// Called when a feature has been closed
    fn on_feature_end(&self, _feature: &ReportFeature) {}

    /// Called when the entire suite finishes
    fn on_suite_end(&self, report: &SuiteReport) -> Result<()>;
}
