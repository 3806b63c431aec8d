// Report feature - one feature file occurrence

use crate::error::{ReportError, Result};
use crate::events::FeatureInfo;
use crate::model::{ReportScenario, ReportStep, Status, rollup};
use crate::time::serialize_secs;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportFeature {
    title: String,
    file: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    background: Vec<ReportStep>,
    scenarios: Vec<ReportScenario>,
    status: Status,
    #[serde(serialize_with = "serialize_secs")]
    duration: Duration,
    #[serde(skip)]
    background_status: Status,
    #[serde(skip)]
    closed: bool,
}

impl ReportFeature {
    pub fn new(feature: &FeatureInfo) -> Self {
        Self {
            title: feature.title.clone(),
            file: feature.file.clone(),
            description: feature.description.clone(),
            background: Vec::new(),
            scenarios: Vec::new(),
            status: Status::Passed,
            duration: Duration::ZERO,
            background_status: Status::Passed,
            closed: false,
        }
    }

    pub fn add_scenario(&mut self, scenario: ReportScenario) {
        self.scenarios.push(scenario);
    }

    /// Record a background step once for the whole feature
    pub fn add_background_step(&mut self, step: ReportStep) {
        self.background.push(step);
    }

    /// Count every background run toward the feature, recorded or not
    pub fn fold_background(&mut self, status: Status) {
        self.background_status = self.background_status.max(status);
    }

    /// Finalize aggregate duration and status over scenarios and background.
    ///
    /// Every scenario must already be closed.
    pub fn close(&mut self, feature: &FeatureInfo) -> Result<()> {
        if feature.file != self.file {
            return Err(ReportError::FeatureMismatch {
                open: self.file.clone(),
                finished: feature.file.clone(),
            });
        }
        if let Some(open) = self.scenarios.iter().find(|s| !s.is_closed()) {
            return Err(ReportError::ScenarioStillOpen(open.title().to_string()));
        }

        let background = self.background.iter().map(|s| (s.status(), s.duration()));
        let scenarios = self.scenarios.iter().map(|s| (s.status(), s.duration()));
        let (statuses, durations): (Vec<Status>, Vec<Duration>) =
            background.chain(scenarios).unzip();

        self.status = rollup(statuses.into_iter().chain([self.background_status]));
        self.duration = durations.into_iter().sum();
        self.closed = true;

        debug!(
            "Feature '{}' closed: {} ({} scenarios)",
            self.title,
            self.status,
            self.scenarios.len()
        );
        Ok(())
    }

    /// Name of the rendered document for this feature: the feature path with
    /// its top-level directory dropped and the extension replaced.
    ///
    /// `features/billing/refunds.feature` becomes `billing/refunds.html`.
    pub fn document_name(&self, extension: &str) -> String {
        let parts: Vec<_> = Path::new(&self.file)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();
        let skip = usize::from(parts.len() > 1);
        let mut relative: PathBuf = parts[skip..].iter().collect();
        relative.set_extension(extension);
        relative.to_string_lossy().replace('\\', "/")
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn background(&self) -> &[ReportStep] {
        &self.background
    }

    pub fn scenarios(&self) -> &[ReportScenario] {
        &self.scenarios
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn background_mut(&mut self) -> &mut Vec<ReportStep> {
        &mut self.background
    }

    pub(crate) fn scenario_mut(&mut self, index: usize) -> Option<&mut ReportScenario> {
        self.scenarios.get_mut(index)
    }

    /// Every step in this feature, background first
    pub fn steps(&self) -> impl Iterator<Item = &ReportStep> {
        self.background
            .iter()
            .chain(self.scenarios.iter().flat_map(|s| s.steps().iter()))
    }
}
