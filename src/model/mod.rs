// Model module - the report tree: features, scenarios, steps

pub mod feature;
pub mod scenario;
pub mod status;
pub mod step;
pub mod summary;

pub use feature::ReportFeature;
pub use scenario::{EmbeddedImage, ReportScenario, ScenarioSource, substitute_placeholders};
pub use status::{Status, rollup};
pub use step::ReportStep;
pub use summary::{StatusCounts, SuiteSummary};
