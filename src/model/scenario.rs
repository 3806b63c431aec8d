// Report scenario - a scenario or outline example row occurrence

use crate::error::{ReportError, Result};
use crate::events::{ExampleRow, Location, ScenarioInfo};
use crate::model::{ReportStep, Status, rollup};
use crate::time::serialize_secs;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([^<>]+)>").expect("invalid placeholder regex"));

/// What opened a scenario occurrence
#[derive(Debug, Clone, Copy)]
pub enum ScenarioSource<'a> {
    Scenario(&'a ScenarioInfo),
    ExampleRow(&'a ExampleRow),
}

/// Image embedded while the scenario ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddedImage {
    pub id: String,
    pub src: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportScenario {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
    steps: Vec<ReportStep>,
    status: Status,
    #[serde(serialize_with = "serialize_secs")]
    duration: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    example: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<EmbeddedImage>,
    #[serde(skip)]
    background_status: Status,
    #[serde(skip)]
    closed: bool,
}

impl ReportScenario {
    pub fn new(source: ScenarioSource<'_>) -> Self {
        let (title, location, example) = match source {
            ScenarioSource::Scenario(info) => (info.title.clone(), info.location.clone(), None),
            ScenarioSource::ExampleRow(row) => {
                (row.outline.title.clone(), None, Some(row.values.clone()))
            }
        };

        Self {
            title,
            location,
            steps: Vec::new(),
            status: Status::Passed,
            duration: Duration::ZERO,
            example,
            images: Vec::new(),
            background_status: Status::Passed,
            closed: false,
        }
    }

    /// Append a step in execution order
    pub fn add_step(&mut self, step: ReportStep) {
        self.steps.push(step);
    }

    /// Count a background step run for this scenario toward its status.
    /// The step itself is not listed among the scenario's steps.
    pub fn fold_background(&mut self, status: Status) {
        self.background_status = self.background_status.max(status);
    }

    /// Finalize aggregate duration and status from the steps added so far
    pub fn populate(&mut self) -> Result<()> {
        if self.closed {
            return Err(ReportError::ScenarioAlreadyClosed(self.title.clone()));
        }

        self.duration = self.steps.iter().map(ReportStep::duration).sum();
        let statuses = self.steps.iter().map(ReportStep::status);
        self.status = rollup(statuses.chain([self.background_status]));
        self.closed = true;

        debug!(
            "Scenario '{}' closed: {} ({} steps)",
            self.title,
            self.status,
            self.steps.len()
        );
        Ok(())
    }

    /// Replay the outline's template steps for one example row.
    ///
    /// Each template step is cloned, its placeholders are substituted with the
    /// row's values, and it receives the row's status and, when the error was
    /// raised from that step, the row's error. The row's elapsed time is split
    /// evenly across the replayed steps.
    pub fn replay_outline(&mut self, row: &ExampleRow, elapsed: Duration) {
        let templates = &row.outline.steps;
        if templates.is_empty() {
            return;
        }

        let share = elapsed / u32::try_from(templates.len()).unwrap_or(u32::MAX);
        for template in templates {
            let mut step = ReportStep::new(template);
            step.rename(substitute_placeholders(&template.name, &row.values));
            step.finish(share, row.status);
            if let Some(error) = &row.error {
                step.attach_error(error);
            }
            self.steps.push(step);
        }

        debug!(
            "Replayed {} outline steps for '{}'",
            templates.len(),
            self.title
        );
    }

    pub fn attach_image(&mut self, image: EmbeddedImage) {
        self.images.push(image);
    }

    pub fn last_step_mut(&mut self) -> Option<&mut ReportStep> {
        self.steps.last_mut()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn steps(&self) -> &[ReportStep] {
        &self.steps
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Example-row values when the scenario came from an outline
    pub fn example(&self) -> Option<&BTreeMap<String, String>> {
        self.example.as_ref()
    }

    pub fn images(&self) -> &[EmbeddedImage] {
        &self.images
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Replace each `<name>` with `'value'` when `values` has `name`.
/// Unknown placeholders are left verbatim.
pub fn substitute_placeholders(template: &str, values: &BTreeMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(value) => format!("'{}'", value),
            None => caps[0].to_string(),
        })
        .into_owned()
}
