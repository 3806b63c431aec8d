// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Console,
    Json,
    JUnit,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "json" => Ok(Self::Json),
            "junit" => Ok(Self::JUnit),
            other => Err(format!(
                "Unsupported report format: {}. Supported: console, json, junit",
                other
            )),
        }
    }
}

/// Build feature reports from behavioral test suite event logs
#[derive(Parser, Debug)]
#[command(name = "gherkin-report")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Aggregate test suite lifecycle events into a feature report", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // Flatten BuildArgs to support implicit build command at top-level.
    // This allows `gherkin-report events.ndjson` to work as expected.
    #[command(flatten)]
    pub build_args: BuildArgs,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(short = 'c', long, global = true, default_value_t = false)]
    pub no_color: bool,

    /// Show current configuration and exit
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Install shell completion (bash, zsh, fish, powershell)
    #[arg(long, value_name = "SHELL_TYPE", value_parser = ["bash", "zsh", "fish", "powershell"])]
    pub completion: Option<String>,
}

impl Cli {
    /// Arguments of the build command, explicit or implicit
    pub fn get_build_args(&self) -> &BuildArgs {
        match &self.command {
            Some(Commands::Build(args)) => args,
            _ => &self.build_args,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a report from an event log (default)
    Build(BuildArgs),

    /// Replay an event log and report the first ordering violation
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// NDJSON event log; reads stdin when omitted or `-`
    #[arg(value_name = "EVENTS")]
    pub events: Option<PathBuf>,

    /// Report format (console, json, junit)
    #[arg(short = 'f', long)]
    pub format: Option<String>,

    /// Output file for json and junit reports
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// List every step in the console summary
    #[arg(long, default_value_t = false)]
    pub show_steps: bool,

    /// Print the rendered document name of each feature
    #[arg(long, default_value_t = false)]
    pub list_documents: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// NDJSON event log; reads stdin when omitted or `-`
    #[arg(value_name = "EVENTS")]
    pub events: Option<PathBuf>,
}
