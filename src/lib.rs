pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod model;
pub mod report;
pub mod state;
pub mod time;

pub use error::ReportError;
pub use events::Event;
pub use model::{ReportFeature, ReportScenario, ReportStep, Status, rollup};
pub use state::{Report, SuiteReport};
