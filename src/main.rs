// Main entry point for gherkin-report

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use gherkin_report::cli::{Cli, Commands};
use gherkin_report::commands::{handle_build, handle_check, handle_completion};
use gherkin_report::config::Config;
use gherkin_report::logging;

fn main() -> Result<()> {
    // Load configuration from file (if exists)
    let config = Config::load();

    let cli = Cli::parse();

    logging::init(cli.verbose);

    if cli.verbose {
        info!("Starting gherkin-report v{}", env!("CARGO_PKG_VERSION"));
    }

    // Handle config flag
    if cli.config {
        println!("Current configuration:");
        println!("\n  Command-line arguments:");
        let args = cli.get_build_args();
        if let Some(ref events) = args.events {
            println!("    Events: {}", events.display());
        }
        if let Some(ref format) = args.format {
            println!("    Format: {}", format);
        }
        if let Some(ref output) = args.output {
            println!("    Output: {}", output.display());
        }
        println!("    Show steps: {}", args.show_steps);

        match &config {
            Some(cfg) => {
                println!("\n  Configuration file:");
                print!("{}", cfg.to_toml());
            }
            None => println!("\n  No configuration file found (using defaults)"),
        }
        return Ok(());
    }

    // Handle init-config flag
    if let Some(ref path) = cli.init_config {
        let content = Config::default().to_toml();
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        println!("Created configuration file: {}", path.display());
        return Ok(());
    }

    // Handle completion flag
    if let Some(ref shell) = cli.completion {
        return handle_completion(shell);
    }

    let config = config.unwrap_or_default();
    let color = !cli.no_color;

    match &cli.command {
        Some(Commands::Check(args)) => handle_check(args),
        Some(Commands::Build(args)) => handle_build(args, &config, cli.verbose, color),
        None => handle_build(&cli.build_args, &config, cli.verbose, color),
    }
}
