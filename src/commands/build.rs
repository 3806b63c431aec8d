// Build command - replay an event log into a report and hand it to reporters

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::cli::{BuildArgs, ReportFormat};
use crate::config::Config;
use crate::events::{Event, Record};
use crate::report::{ConsoleReporter, JsonReporter, JunitReporter, Reporter};
use crate::state::{Report, SuiteReport};
use crate::time::ManualClock;

/// Replay recorded events through a fresh aggregator.
///
/// Timestamps on records drive the clock; closed features are passed to
/// every reporter as soon as they close.
pub fn replay_records(
    records: Vec<Record>,
    reporters: &[Box<dyn Reporter>],
) -> Result<SuiteReport> {
    let clock = ManualClock::new();
    let mut report = Report::with_clock(clock.clone());

    for (index, record) in records.into_iter().enumerate() {
        if let Some(at) = record.at() {
            clock.set(at);
        }

        let closes_feature = matches!(record.event, Event::FeatureFinished { .. });
        let name = record.event.name();
        report
            .apply(record.event)
            .with_context(|| format!("Event {} ({}) out of order", index + 1, name))?;

        if closes_feature && let Some(feature) = report.features().last() {
            for reporter in reporters {
                reporter.on_feature_end(feature);
            }
        }
    }

    report.finish().context("Event log ended before the suite finished")
}

pub fn handle_build(args: &BuildArgs, config: &Config, verbose: bool, color: bool) -> Result<()> {
    let format: ReportFormat = args
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(anyhow::Error::msg)?;

    let output = args
        .output
        .clone()
        .or_else(|| config.output.path.as_ref().map(PathBuf::from));

    let reporter: Box<dyn Reporter> = match format {
        ReportFormat::Console => Box::new(ConsoleReporter::new(
            color && config.display.color,
            args.show_steps || config.display.show_steps,
            verbose,
        )),
        ReportFormat::Json => Box::new(JsonReporter::new(
            output.unwrap_or_else(|| PathBuf::from("report.json")),
        )),
        ReportFormat::JUnit => Box::new(JunitReporter::new(
            output.unwrap_or_else(|| PathBuf::from("junit.xml")),
        )),
    };
    let reporters = vec![reporter];

    let records = crate::commands::load_records(args.events.as_deref())?;
    debug!("Loaded {} events", records.len());

    let suite = replay_records(records, &reporters)?;
    info!(
        "Aggregated {} features in {:?}",
        suite.features().len(),
        suite.duration()
    );

    if args.list_documents {
        for feature in suite.features() {
            println!(
                "{}\t{}",
                feature.file(),
                feature.document_name(&config.output.document_extension)
            );
        }
    }

    for reporter in &reporters {
        reporter.on_suite_end(&suite)?;
    }

    if !suite.all_passed() {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::read_events;
    use crate::model::Status;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct Recorder {
        closed: Arc<Mutex<Vec<String>>>,
    }

    impl Reporter for Recorder {
        fn on_feature_end(&self, feature: &crate::model::ReportFeature) {
            self.closed.lock().unwrap().push(feature.title().to_string());
        }

        fn on_suite_end(&self, _report: &SuiteReport) -> Result<()> {
            Ok(())
        }
    }

    const LOG: &str = r#"
{"at":0.0,"event":"suite_started"}
{"at":0.0,"event":"feature_started","feature":{"title":"Login","file":"features/login.feature"}}
{"at":0.0,"event":"scenario_started","element":{"kind":"scenario","title":"Valid user"}}
{"at":0.0,"event":"step_started","step":{"name":"I log in","location":{"file":"features/login.feature","line":4}}}
{"at":1.5,"event":"step_finished","step":{"name":"I log in","location":{"file":"features/login.feature","line":4}},"status":"passed"}
{"at":1.5,"event":"scenario_finished","element":{"kind":"scenario","title":"Valid user"}}
{"at":1.5,"event":"feature_finished","feature":{"title":"Login","file":"features/login.feature"}}
{"at":2.0,"event":"suite_finished"}
"#;

    #[test]
    fn test_replay_records_uses_timestamps() {
        let records = read_events(Cursor::new(LOG)).unwrap();
        let suite = replay_records(records, &[]).unwrap();

        assert_eq!(suite.features().len(), 1);
        let feature = &suite.features()[0];
        assert_eq!(feature.status(), Status::Passed);
        assert_eq!(feature.duration(), Duration::from_millis(1500));
        assert_eq!(suite.duration(), Duration::from_secs(2));
    }

    #[test]
    fn test_replay_records_notifies_feature_end() {
        let records = read_events(Cursor::new(LOG)).unwrap();
        let closed = Arc::new(Mutex::new(Vec::new()));
        let reporters: Vec<Box<dyn Reporter>> = vec![Box::new(Recorder {
            closed: Arc::clone(&closed),
        })];

        replay_records(records, &reporters).unwrap();

        assert_eq!(*closed.lock().unwrap(), vec!["Login".to_string()]);
    }

    #[test]
    fn test_replay_records_rejects_truncated_log() {
        let truncated: String = LOG.lines().take(5).collect::<Vec<_>>().join("\n");
        let records = read_events(Cursor::new(truncated)).unwrap();
        let err = replay_records(records, &[]).unwrap_err();
        assert!(err.to_string().contains("before the suite finished"));
    }

    #[test]
    fn test_replay_records_reports_event_index() {
        let log = r#"{"event":"suite_started"}
{"event":"scenario_finished","element":{"kind":"scenario","title":"Nope"}}"#;
        let records = read_events(Cursor::new(log)).unwrap();
        let err = replay_records(records, &[]).unwrap_err();
        assert!(err.to_string().contains("Event 2 (scenario_finished)"));
    }
}
