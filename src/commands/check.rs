// Check command - validate event ordering without producing a report

use anyhow::Result;
use tracing::error;

use crate::cli::CheckArgs;
use crate::commands::{load_records, replay_records};

pub fn handle_check(args: &CheckArgs) -> Result<()> {
    let records = load_records(args.events.as_deref())?;
    let count = records.len();

    match replay_records(records, &[]) {
        Ok(suite) => {
            println!(
                "✅ {} events, {} features, {} scenarios",
                count,
                suite.features().len(),
                suite.summary().scenarios.total()
            );
            Ok(())
        }
        Err(err) => {
            error!("{:#}", err);
            println!("❌ {:#}", err);
            std::process::exit(1);
        }
    }
}
