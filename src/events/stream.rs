// Newline-delimited JSON event logs

use super::Event;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::time::Duration;

/// One line of a recorded event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Seconds since the recording started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<f64>,

    #[serde(flatten)]
    pub event: Event,
}

impl Record {
    pub fn at(&self) -> Option<Duration> {
        self.at
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

/// Read every record from an NDJSON event log. Blank lines are skipped.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read event log line {}", index + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: Record = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid event on line {}", index + 1))?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_events_with_timestamps() {
        let log = r#"{"at":0.0,"event":"suite_started"}

{"at":1.5,"event":"suite_finished"}
"#;
        let records = read_events(Cursor::new(log)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event, Event::SuiteStarted);
        assert_eq!(records[1].at(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_read_events_without_timestamp() {
        let records = read_events(Cursor::new(r#"{"event":"background_started"}"#)).unwrap();
        assert_eq!(records[0].at(), None);
        assert_eq!(records[0].event, Event::BackgroundStarted);
    }

    #[test]
    fn test_read_events_reports_line_number() {
        let log = "{\"event\":\"suite_started\"}\n{\"event\":\"nonsense\"}\n";
        let err = read_events(Cursor::new(log)).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_negative_timestamp_is_ignored() {
        let record = Record {
            at: Some(-1.0),
            event: Event::SuiteFinished,
        };
        assert_eq!(record.at(), None);
    }

    #[test]
    fn test_out_of_range_timestamp_is_ignored() {
        let records = read_events(Cursor::new(r#"{"at":1e300,"event":"suite_started"}"#)).unwrap();
        assert_eq!(records[0].at(), None);
        assert_eq!(records[0].event, Event::SuiteStarted);
    }
}
