// Commands module - handles CLI command execution

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::events::{Record, read_events};

pub mod build;
pub mod check;

pub use build::{handle_build, replay_records};
pub use check::handle_check;

/// Handle shell completion
pub fn handle_completion(shell_type: &str) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{Shell, generate};

    let shell = match shell_type.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        "powershell" => Shell::PowerShell,
        _ => {
            anyhow::bail!(
                "Unsupported shell: {}. Supported: bash, zsh, fish, powershell",
                shell_type
            );
        }
    };

    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();
    let mut stdout = std::io::stdout();

    generate(shell, &mut cmd, name, &mut stdout);

    Ok(())
}

/// Read an event log from a file, or stdin for `None` / `-`
pub fn load_records(path: Option<&Path>) -> Result<Vec<Record>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event log: {}", path.display()))?;
            read_events(BufReader::new(file))
                .with_context(|| format!("Failed to read event log: {}", path.display()))
        }
        _ => read_events(io::stdin().lock()).context("Failed to read event log from stdin"),
    }
}
