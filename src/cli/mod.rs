pub mod args;

pub use args::{BuildArgs, CheckArgs, Cli, Commands, ReportFormat};
