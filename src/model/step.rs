// Report step - one executed step occurrence

use crate::events::{ErrorInfo, Location, StepInfo};
use crate::model::Status;
use crate::time::serialize_secs;
use serde::Serialize;
use std::time::Duration;
use tracing::trace;

/// Executed step as it appears in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportStep {
    keyword: String,
    name: String,
    location: Location,
    #[serde(serialize_with = "serialize_secs")]
    duration: Duration,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    table: Vec<Vec<String>>,
}

impl ReportStep {
    /// Create a step from its descriptor. Duration starts at zero.
    pub fn new(step: &StepInfo) -> Self {
        Self {
            keyword: step.keyword.clone(),
            name: step.name.clone(),
            location: step.location.clone(),
            duration: Duration::ZERO,
            status: Status::Passed,
            error: None,
            table: Vec::new(),
        }
    }

    /// Record elapsed time and final status
    pub fn finish(&mut self, duration: Duration, status: Status) {
        self.duration = duration;
        self.status = status;
    }

    /// Attach `error` if it was raised from this step's location.
    ///
    /// Errors originating elsewhere are dropped; returns whether the error
    /// was kept.
    pub fn attach_error(&mut self, error: &ErrorInfo) -> bool {
        if error.raised_at(&self.location) {
            self.error = Some(error.clone());
            true
        } else {
            trace!(
                "Dropping error from {} for step at {}",
                error.origin().unwrap_or("<unknown>"),
                self.location
            );
            false
        }
    }

    /// Append data-table rows in the order they were observed
    pub fn attach_table<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        self.table.extend(rows);
    }

    /// Replace the display name, e.g. with outline values substituted
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn table(&self) -> Option<&[Vec<String>]> {
        if self.table.is_empty() {
            None
        } else {
            Some(&self.table)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_at(file: &str, line: u32) -> ReportStep {
        ReportStep::new(&StepInfo::new("I do something", Location::new(file, line)))
    }

    #[test]
    fn test_new_step_starts_at_zero() {
        let step = step_at("a.feature", 3);
        assert_eq!(step.name(), "I do something");
        assert_eq!(step.duration(), Duration::ZERO);
        assert!(step.error().is_none());
        assert!(step.table().is_none());
    }

    #[test]
    fn test_finish_records_duration_and_status() {
        let mut step = step_at("a.feature", 3);
        step.finish(Duration::from_millis(250), Status::Pending);
        assert_eq!(step.duration(), Duration::from_millis(250));
        assert_eq!(step.status(), Status::Pending);
    }

    #[test]
    fn test_attach_error_from_own_location() {
        let mut step = step_at("stepA.feature", 12);
        let error = ErrorInfo::new("expected 1", vec!["stepA.feature:12:in `step'".into()]);
        assert!(step.attach_error(&error));
        assert_eq!(step.error().map(|e| e.message.as_str()), Some("expected 1"));
    }

    #[test]
    fn test_attach_error_from_other_location_is_dropped() {
        let mut step = step_at("stepB.feature", 20);
        let error = ErrorInfo::new("boom", vec!["stepA.feature:12".into()]);
        assert!(!step.attach_error(&error));
        assert!(step.error().is_none());
    }

    #[test]
    fn test_attach_table_appends_rows_in_order() {
        let mut step = step_at("a.feature", 3);
        step.attach_table(vec![vec!["name".to_string(), "age".to_string()]]);
        step.attach_table(vec![vec!["ann".to_string(), "31".to_string()]]);
        let table = step.table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0], vec!["name", "age"]);
        assert_eq!(table[1], vec!["ann", "31"]);
    }

    #[test]
    fn test_serialized_duration_is_seconds() {
        let mut step = step_at("a.feature", 3);
        step.finish(Duration::from_millis(1500), Status::Passed);
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["duration"], serde_json::json!(1.5));
        assert_eq!(value["status"], "passed");
        assert!(value.get("table").is_none());
    }
}
