// Report aggregator - builds the report tree from lifecycle events
//
// Driven by one ordered, synchronous event stream. The aggregator is the only
// writer of the tree; closed features and scenarios are never written again.

use crate::error::{ReportError, Result};
use crate::events::{Embed, ErrorInfo, Event, FeatureInfo, ScenarioElement, StepInfo, TableRow};
use crate::model::{
    EmbeddedImage, ReportFeature, ReportScenario, ReportStep, ScenarioSource, Status,
};
use crate::state::{SuiteMetrics, SuiteReport};
use crate::time::{Clock, SystemClock};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, trace};

static IMAGE_MIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^image/(png|gif|jpg|jpeg)").expect("invalid image mime regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Finished,
}

/// Where the most recently completed step was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepSlot {
    Scenario,
    Background,
    /// A repeated background step; its outcome is counted but not recorded
    Discarded,
}

/// Aggregator for one suite run
pub struct Report<C: Clock = SystemClock> {
    clock: C,
    phase: Phase,
    features: Vec<ReportFeature>,
    current_feature: Option<usize>,
    current_scenario: Option<usize>,
    in_background: bool,
    background_recorded: bool,
    /// Background outcome waiting for the scenario it runs for
    pending_background: Status,
    suite_started: Duration,
    step_started: Option<(String, Duration)>,
    row_started: Option<Duration>,
    pending_cells: Vec<Vec<String>>,
    last_step: Option<StepSlot>,
    image_count: usize,
    metrics: SuiteMetrics,
}

impl Default for Report<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl Report<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl<C: Clock> Report<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            phase: Phase::Idle,
            features: Vec::new(),
            current_feature: None,
            current_scenario: None,
            in_background: false,
            background_recorded: false,
            pending_background: Status::Passed,
            suite_started: Duration::ZERO,
            step_started: None,
            row_started: None,
            pending_cells: Vec::new(),
            last_step: None,
            image_count: 0,
            metrics: SuiteMetrics::default(),
        }
    }

    /// Dispatch one event to its handler
    pub fn apply(&mut self, event: Event) -> Result<()> {
        trace!("Event: {}", event.name());
        match event {
            Event::SuiteStarted => self.on_suite_start(),
            Event::FeatureStarted { feature } => self.on_feature_start(&feature),
            Event::FeatureFinished { feature } => self.on_feature_end(&feature),
            Event::BackgroundStarted => self.on_background_start(),
            Event::BackgroundFinished => self.on_background_end(),
            Event::ScenarioStarted { element } => self.on_scenario_start(&element),
            Event::ScenarioFinished { element } => self.on_scenario_end(&element),
            Event::TableRowStarted { row } => self.on_table_row_start(&row),
            Event::TableRowFinished { row } => self.on_table_row_end(row),
            Event::StepStarted { step } => self.on_step_start(&step),
            Event::StepFinished {
                step,
                status,
                error,
                outline,
            } => self.on_step_end(&step, status, error.as_ref(), outline),
            Event::Embedded { embed } => self.on_embed(&embed),
            Event::SuiteFinished => self.on_suite_end(),
        }
    }

    pub fn on_suite_start(&mut self) -> Result<()> {
        match self.phase {
            Phase::Idle => {}
            Phase::Running => return Err(ReportError::SuiteAlreadyStarted),
            Phase::Finished => return Err(ReportError::SuiteFinished),
        }

        self.phase = Phase::Running;
        self.suite_started = self.clock.now();
        self.metrics.start();
        debug!("Suite started");
        Ok(())
    }

    pub fn on_feature_start(&mut self, feature: &FeatureInfo) -> Result<()> {
        self.ensure_running()?;
        if let Some(open) = self.current_feature() {
            return Err(ReportError::FeatureStillOpen(open.file().to_string()));
        }

        self.features.push(ReportFeature::new(feature));
        self.current_feature = Some(self.features.len() - 1);
        self.current_scenario = None;
        self.in_background = false;
        self.background_recorded = false;
        self.pending_background = Status::Passed;
        self.pending_cells.clear();
        self.last_step = None;
        debug!("Feature '{}' opened ({})", feature.title, feature.file);
        Ok(())
    }

    pub fn on_feature_end(&mut self, feature: &FeatureInfo) -> Result<()> {
        self.ensure_running()?;
        self.ensure_no_open_step()?;
        if self.in_background {
            return Err(ReportError::BackgroundStillActive);
        }
        self.current_feature_mut()?.close(feature)?;
        self.current_feature = None;
        self.current_scenario = None;
        self.last_step = None;
        Ok(())
    }

    pub fn on_background_start(&mut self) -> Result<()> {
        self.ensure_running()?;
        self.current_feature_mut()?;
        if self.in_background {
            return Err(ReportError::BackgroundAlreadyActive);
        }
        self.in_background = true;
        Ok(())
    }

    pub fn on_background_end(&mut self) -> Result<()> {
        self.ensure_running()?;
        if !self.in_background {
            return Err(ReportError::BackgroundNotActive);
        }
        self.ensure_no_open_step()?;
        self.in_background = false;
        self.background_recorded = true;
        Ok(())
    }

    pub fn on_scenario_start(&mut self, element: &ScenarioElement) -> Result<()> {
        self.ensure_running()?;
        match element {
            ScenarioElement::Scenario(info) => self.open_scenario(ScenarioSource::Scenario(info)),
            ScenarioElement::Outline(outline) => {
                trace!("Outline '{}' opened; rows create scenarios", outline.title);
                Ok(())
            }
        }
    }

    pub fn on_scenario_end(&mut self, element: &ScenarioElement) -> Result<()> {
        self.ensure_running()?;
        self.ensure_no_open_step()?;
        match element {
            ScenarioElement::Scenario(_) => self.current_scenario_mut()?.populate(),
            ScenarioElement::Outline(_) => Ok(()),
        }
    }

    pub fn on_table_row_start(&mut self, row: &TableRow) -> Result<()> {
        self.ensure_running()?;
        match row {
            TableRow::Example(example) => {
                self.open_scenario(ScenarioSource::ExampleRow(example))?;
                self.row_started = Some(self.clock.now());
                Ok(())
            }
            TableRow::Header { .. } | TableRow::Cells { .. } => Ok(()),
        }
    }

    pub fn on_table_row_end(&mut self, row: TableRow) -> Result<()> {
        self.ensure_running()?;
        match row {
            TableRow::Example(example) => {
                let now = self.clock.now();
                let elapsed = now.saturating_sub(self.row_started.take().unwrap_or(now));
                let scenario = self.current_scenario_mut()?;
                scenario.replay_outline(&example, elapsed);
                scenario.populate()?;
                self.last_step = Some(StepSlot::Scenario);
                Ok(())
            }
            TableRow::Cells { cells } => {
                self.add_cells(cells);
                Ok(())
            }
            TableRow::Header { .. } => Ok(()),
        }
    }

    pub fn on_step_start(&mut self, step: &StepInfo) -> Result<()> {
        self.ensure_running()?;
        self.ensure_no_open_step()?;
        self.step_started = Some((step.name.clone(), self.clock.now()));
        Ok(())
    }

    pub fn on_step_end(
        &mut self,
        step: &StepInfo,
        status: Status,
        error: Option<&ErrorInfo>,
        outline: bool,
    ) -> Result<()> {
        self.ensure_running()?;
        let (_, started) = self
            .step_started
            .take()
            .ok_or_else(|| ReportError::StepNotStarted(step.name.clone()))?;

        if outline {
            trace!("Outline template step '{}' visited", step.name);
            self.pending_cells.clear();
            return Ok(());
        }

        let mut report_step = ReportStep::new(step);
        report_step.finish(self.clock.now().saturating_sub(started), status);
        if let Some(error) = error {
            report_step.attach_error(error);
        }
        if !self.pending_cells.is_empty() {
            report_step.attach_table(std::mem::take(&mut self.pending_cells));
        }

        self.add_step(report_step)
    }

    pub fn on_embed(&mut self, embed: &Embed) -> Result<()> {
        self.ensure_running()?;
        if !IMAGE_MIME.is_match(&embed.mime_type) {
            trace!("Ignoring embedded {}", embed.mime_type);
            return Ok(());
        }

        let image = EmbeddedImage {
            id: format!("img_{}", self.image_count),
            src: embed.src.clone(),
            label: embed.label.clone(),
        };
        self.image_count += 1;
        self.current_scenario_mut()?.attach_image(image);
        Ok(())
    }

    pub fn on_suite_end(&mut self) -> Result<()> {
        self.ensure_running()?;
        if let Some(open) = self.current_feature() {
            return Err(ReportError::FeatureStillOpen(open.file().to_string()));
        }

        let elapsed = self.clock.now().saturating_sub(self.suite_started);
        self.metrics.finish(elapsed);
        self.phase = Phase::Finished;
        debug!("Suite finished: {} features", self.features.len());
        Ok(())
    }

    /// Hand the finished tree to consumers
    pub fn finish(self) -> Result<SuiteReport> {
        if self.phase != Phase::Finished {
            return Err(ReportError::SuiteNotFinished);
        }
        Ok(SuiteReport::new(self.features, self.metrics))
    }

    pub fn features(&self) -> &[ReportFeature] {
        &self.features
    }

    pub fn current_feature(&self) -> Option<&ReportFeature> {
        self.current_feature.and_then(|i| self.features.get(i))
    }

    pub fn current_scenario(&self) -> Option<&ReportScenario> {
        let scenario = self.current_scenario?;
        self.current_feature()?.scenarios().get(scenario)
    }

    /// True while background steps are being executed
    pub fn in_background(&self) -> bool {
        self.in_background
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    fn ensure_running(&self) -> Result<()> {
        match self.phase {
            Phase::Running => Ok(()),
            Phase::Idle => Err(ReportError::SuiteNotStarted),
            Phase::Finished => Err(ReportError::SuiteFinished),
        }
    }

    fn ensure_no_open_step(&self) -> Result<()> {
        match &self.step_started {
            Some((name, _)) => Err(ReportError::StepStillOpen(name.clone())),
            None => Ok(()),
        }
    }

    fn current_feature_mut(&mut self) -> Result<&mut ReportFeature> {
        self.current_feature
            .and_then(|i| self.features.get_mut(i))
            .ok_or(ReportError::NoCurrentFeature)
    }

    fn current_scenario_mut(&mut self) -> Result<&mut ReportScenario> {
        let index = self.current_scenario.ok_or(ReportError::NoCurrentScenario)?;
        self.current_feature_mut()?
            .scenario_mut(index)
            .ok_or(ReportError::NoCurrentScenario)
    }

    /// Open scenario that steps are appended to
    fn open_scenario_mut(&mut self) -> Result<&mut ReportScenario> {
        let scenario = self.current_scenario_mut()?;
        if scenario.is_closed() {
            return Err(ReportError::ScenarioAlreadyClosed(scenario.title().to_string()));
        }
        Ok(scenario)
    }

    fn open_scenario(&mut self, source: ScenarioSource<'_>) -> Result<()> {
        if let Some(open) = self.current_scenario()
            && !open.is_closed()
        {
            return Err(ReportError::ScenarioStillOpen(open.title().to_string()));
        }

        let mut scenario = ReportScenario::new(source);
        scenario.fold_background(std::mem::take(&mut self.pending_background));
        debug!("Scenario '{}' opened", scenario.title());
        let feature = self.current_feature_mut()?;
        feature.add_scenario(scenario);
        let index = feature.scenarios().len() - 1;
        self.current_scenario = Some(index);
        self.last_step = None;
        Ok(())
    }

    /// Route a completed step. Background steps are recorded on the feature
    /// the first time the background runs and never reach a scenario's step
    /// list, but every run counts toward the outcome.
    fn add_step(&mut self, step: ReportStep) -> Result<()> {
        if self.in_background {
            self.fold_background(step.status())?;
            if self.background_recorded {
                trace!("Background step '{}' already recorded", step.name());
                self.last_step = Some(StepSlot::Discarded);
                return Ok(());
            }
            self.current_feature_mut()?.add_background_step(step);
            self.last_step = Some(StepSlot::Background);
            return Ok(());
        }

        trace!("Step '{}' recorded: {}", step.name(), step.status());
        self.open_scenario_mut()?.add_step(step);
        self.last_step = Some(StepSlot::Scenario);
        Ok(())
    }

    /// The background may run before or after its scenario opens
    fn fold_background(&mut self, status: Status) -> Result<()> {
        self.current_feature_mut()?.fold_background(status);
        if self.current_scenario().is_some_and(|s| !s.is_closed()) {
            self.current_scenario_mut()?.fold_background(status);
        } else {
            self.pending_background = self.pending_background.max(status);
        }
        Ok(())
    }

    /// Data-table cells belong to the step in progress, or else to the most
    /// recently completed step.
    fn add_cells(&mut self, cells: Vec<String>) {
        if self.step_started.is_none() {
            if self.last_step == Some(StepSlot::Discarded) {
                trace!("Dropping table row of a repeated background step");
                return;
            }
            if let Some(step) = self.last_step_mut() {
                step.attach_table([cells]);
                return;
            }
        }
        self.pending_cells.push(cells);
    }

    fn last_step_mut(&mut self) -> Option<&mut ReportStep> {
        match self.last_step? {
            StepSlot::Background => self.current_feature_mut().ok()?.background_mut().last_mut(),
            StepSlot::Scenario => self.current_scenario_mut().ok()?.last_step_mut(),
            StepSlot::Discarded => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ExampleRow, Location, OutlineInfo, ScenarioInfo};
    use crate::time::ManualClock;
    use std::collections::BTreeMap;

    fn feature(file: &str) -> FeatureInfo {
        FeatureInfo {
            title: "Shop".into(),
            file: file.into(),
            description: String::new(),
        }
    }

    fn scenario(title: &str) -> ScenarioElement {
        ScenarioElement::Scenario(ScenarioInfo {
            title: title.into(),
            location: None,
        })
    }

    fn step(name: &str, line: u32) -> StepInfo {
        StepInfo::new(name, Location::new("shop.feature", line))
    }

    fn started() -> (Report<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let mut report = Report::with_clock(clock.clone());
        report.on_suite_start().unwrap();
        report.on_feature_start(&feature("features/shop.feature")).unwrap();
        (report, clock)
    }

    fn run_step(
        report: &mut Report<ManualClock>,
        clock: &ManualClock,
        info: &StepInfo,
        secs: u64,
        status: Status,
    ) {
        report.on_step_start(info).unwrap();
        clock.advance(Duration::from_secs(secs));
        report.on_step_end(info, status, None, false).unwrap();
    }

    #[test]
    fn test_events_before_suite_start_fail() {
        let mut report = Report::with_clock(ManualClock::new());
        assert_eq!(
            report.on_feature_start(&feature("a.feature")),
            Err(ReportError::SuiteNotStarted)
        );
    }

    #[test]
    fn test_step_end_without_start_fails() {
        let (mut report, _clock) = started();
        report.on_scenario_start(&scenario("S")).unwrap();
        let err = report
            .on_step_end(&step("orphan", 3), Status::Passed, None, false)
            .unwrap_err();
        assert_eq!(err, ReportError::StepNotStarted("orphan".into()));
    }

    #[test]
    fn test_scenario_end_without_scenario_fails() {
        let (mut report, _clock) = started();
        assert_eq!(
            report.on_scenario_end(&scenario("S")),
            Err(ReportError::NoCurrentScenario)
        );
    }

    #[test]
    fn test_step_is_timed_against_its_start() {
        let (mut report, clock) = started();
        report.on_scenario_start(&scenario("S")).unwrap();
        clock.advance(Duration::from_secs(10));
        run_step(&mut report, &clock, &step("a", 3), 2, Status::Passed);

        let scenario = report.current_scenario().unwrap();
        assert_eq!(scenario.steps()[0].duration(), Duration::from_secs(2));
    }

    #[test]
    fn test_background_steps_stay_out_of_scenario() {
        let (mut report, clock) = started();

        report.on_background_start().unwrap();
        assert!(report.in_background());
        run_step(&mut report, &clock, &step("setup", 3), 1, Status::Passed);
        report.on_background_end().unwrap();

        report.on_scenario_start(&scenario("S")).unwrap();
        run_step(&mut report, &clock, &step("act", 6), 1, Status::Passed);

        let feature = report.current_feature().unwrap();
        assert_eq!(feature.background().len(), 1);
        assert_eq!(feature.background()[0].name(), "setup");
        let steps = report.current_scenario().unwrap().steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name(), "act");
    }

    #[test]
    fn test_background_recorded_once_per_feature() {
        let (mut report, clock) = started();

        for title in ["S1", "S2"] {
            report.on_background_start().unwrap();
            run_step(&mut report, &clock, &step("setup", 3), 1, Status::Passed);
            report.on_background_end().unwrap();
            report.on_scenario_start(&scenario(title)).unwrap();
            run_step(&mut report, &clock, &step("act", 6), 1, Status::Passed);
            report.on_scenario_end(&scenario(title)).unwrap();
        }

        let feature = report.current_feature().unwrap();
        assert_eq!(feature.background().len(), 1);
        assert!(feature.scenarios().iter().all(|s| s.steps().len() == 1));
    }

    #[test]
    fn test_background_end_without_start_fails() {
        let (mut report, _clock) = started();
        assert_eq!(
            report.on_background_end(),
            Err(ReportError::BackgroundNotActive)
        );
    }

    #[test]
    fn test_feature_end_during_background_fails() {
        let (mut report, clock) = started();
        report.on_background_start().unwrap();
        run_step(&mut report, &clock, &step("setup", 3), 1, Status::Passed);
        assert_eq!(
            report.on_feature_end(&feature("features/shop.feature")),
            Err(ReportError::BackgroundStillActive)
        );
    }

    #[test]
    fn test_repeated_background_failure_fails_its_scenario() {
        let (mut report, clock) = started();

        for (title, background) in [("S0", Status::Passed), ("S1", Status::Failed)] {
            report.on_background_start().unwrap();
            run_step(&mut report, &clock, &step("setup", 3), 1, background);
            report.on_background_end().unwrap();
            report.on_scenario_start(&scenario(title)).unwrap();
            run_step(&mut report, &clock, &step("act", 6), 1, Status::Passed);
            report.on_scenario_end(&scenario(title)).unwrap();
        }
        report.on_feature_end(&feature("features/shop.feature")).unwrap();

        let feature = &report.features()[0];
        let statuses: Vec<Status> = feature.scenarios().iter().map(|s| s.status()).collect();
        assert_eq!(statuses, vec![Status::Passed, Status::Failed]);
        assert_eq!(feature.scenarios()[1].steps().len(), 1);
        assert_eq!(feature.background().len(), 1);
        assert_eq!(feature.status(), Status::Failed);
    }

    #[test]
    fn test_background_inside_open_scenario_counts_for_it() {
        let (mut report, clock) = started();
        report.on_scenario_start(&scenario("S")).unwrap();
        report.on_background_start().unwrap();
        run_step(&mut report, &clock, &step("setup", 3), 1, Status::Undefined);
        report.on_background_end().unwrap();
        run_step(&mut report, &clock, &step("act", 6), 1, Status::Passed);
        report.on_scenario_end(&scenario("S")).unwrap();

        let scenario = report.current_scenario().unwrap();
        assert_eq!(scenario.status(), Status::Undefined);
        assert_eq!(scenario.duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_cells_after_repeated_background_step_are_dropped() {
        let (mut report, clock) = started();

        for title in ["S0", "S1"] {
            report.on_background_start().unwrap();
            run_step(&mut report, &clock, &step("these users", 3), 1, Status::Passed);
            report
                .on_table_row_end(TableRow::Cells {
                    cells: vec!["ann".into()],
                })
                .unwrap();
            report.on_background_end().unwrap();
            report.on_scenario_start(&scenario(title)).unwrap();
            run_step(&mut report, &clock, &step("act", 6), 1, Status::Passed);
            report.on_scenario_end(&scenario(title)).unwrap();
        }

        let feature = report.current_feature().unwrap();
        assert_eq!(feature.background()[0].table().unwrap(), &[vec!["ann".to_string()]]);
        assert!(
            feature
                .scenarios()
                .iter()
                .all(|s| s.steps()[0].table().is_none())
        );
    }

    #[test]
    fn test_step_start_while_step_running_fails() {
        let (mut report, _clock) = started();
        report.on_scenario_start(&scenario("S")).unwrap();
        report.on_step_start(&step("first", 3)).unwrap();
        assert_eq!(
            report.on_step_start(&step("second", 4)),
            Err(ReportError::StepStillOpen("first".into()))
        );
    }

    #[test]
    fn test_scope_end_with_running_step_fails() {
        let (mut report, _clock) = started();
        report.on_scenario_start(&scenario("S")).unwrap();
        report.on_step_start(&step("hanging", 3)).unwrap();

        assert_eq!(
            report.on_scenario_end(&scenario("S")),
            Err(ReportError::StepStillOpen("hanging".into()))
        );
        assert_eq!(
            report.on_feature_end(&feature("features/shop.feature")),
            Err(ReportError::StepStillOpen("hanging".into()))
        );
    }

    #[test]
    fn test_cells_during_step_attach_to_that_step() {
        let (mut report, clock) = started();
        report.on_scenario_start(&scenario("S")).unwrap();
        let info = step("these users", 4);
        report.on_step_start(&info).unwrap();
        report
            .on_table_row_end(TableRow::Cells {
                cells: vec!["name".into()],
            })
            .unwrap();
        report
            .on_table_row_end(TableRow::Cells {
                cells: vec!["ann".into()],
            })
            .unwrap();
        clock.advance(Duration::from_secs(1));
        report
            .on_step_end(&info, Status::Passed, None, false)
            .unwrap();

        let step = &report.current_scenario().unwrap().steps()[0];
        assert_eq!(
            step.table().unwrap(),
            &[vec!["name".to_string()], vec!["ann".to_string()]]
        );
    }

    #[test]
    fn test_cells_after_step_attach_to_last_step() {
        let (mut report, clock) = started();
        report.on_scenario_start(&scenario("S")).unwrap();
        run_step(&mut report, &clock, &step("first", 3), 1, Status::Passed);
        run_step(&mut report, &clock, &step("second", 4), 1, Status::Passed);

        for cells in [vec!["a", "b"], vec!["c", "d"]] {
            let cells: Vec<String> = cells.into_iter().map(String::from).collect();
            report.on_table_row_end(TableRow::Cells { cells }).unwrap();
        }

        let feature = report.current_feature().unwrap();
        assert_eq!(feature.scenarios().len(), 1);
        let steps = report.current_scenario().unwrap().steps();
        assert!(steps[0].table().is_none());
        let table = steps[1].table().unwrap();
        assert_eq!(table[0], vec!["a", "b"]);
        assert_eq!(table[1], vec!["c", "d"]);
    }

    #[test]
    fn test_outline_controller_creates_no_scenario() {
        let (mut report, clock) = started();
        let outline = ScenarioElement::Outline(OutlineInfo {
            title: "Buying".into(),
            steps: vec![step("I have <n> items", 4)],
        });
        report.on_scenario_start(&outline).unwrap();
        report.on_step_start(&step("I have <n> items", 4)).unwrap();
        clock.advance(Duration::from_secs(1));
        report
            .on_step_end(&step("I have <n> items", 4), Status::Skipped, None, true)
            .unwrap();
        report.on_scenario_end(&outline).unwrap();

        assert!(report.current_feature().unwrap().scenarios().is_empty());
    }

    #[test]
    fn test_example_row_replays_outline() {
        let (mut report, clock) = started();
        let row = TableRow::Example(ExampleRow {
            outline: OutlineInfo {
                title: "Buying".into(),
                steps: vec![step("I have <n> items", 4)],
            },
            values: BTreeMap::from([("n".to_string(), "5".to_string())]),
            status: Status::Passed,
            error: None,
        });

        report.on_table_row_start(&row).unwrap();
        clock.advance(Duration::from_secs(3));
        report.on_table_row_end(row).unwrap();

        let scenario = report.current_scenario().unwrap();
        assert!(scenario.is_closed());
        assert_eq!(scenario.steps()[0].name(), "I have '5' items");
        assert_eq!(scenario.duration(), Duration::from_secs(3));
    }

    #[test]
    fn test_header_row_is_ignored() {
        let (mut report, _clock) = started();
        let header = TableRow::Header {
            cells: vec!["n".into()],
        };
        report.on_table_row_start(&header).unwrap();
        report.on_table_row_end(header).unwrap();
        assert!(report.current_feature().unwrap().scenarios().is_empty());
    }

    #[test]
    fn test_embedded_images_get_sequential_ids() {
        let (mut report, _clock) = started();
        report.on_scenario_start(&scenario("S")).unwrap();
        for mime in ["image/png", "text/plain", "image/jpeg"] {
            report
                .on_embed(&Embed {
                    src: "shot".into(),
                    mime_type: mime.into(),
                    label: "screenshot".into(),
                })
                .unwrap();
        }

        let images = report.current_scenario().unwrap().images();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].id, "img_0");
        assert_eq!(images[1].id, "img_1");
    }

    #[test]
    fn test_step_after_scenario_closed_fails() {
        let (mut report, clock) = started();
        report.on_scenario_start(&scenario("S")).unwrap();
        report.on_scenario_end(&scenario("S")).unwrap();
        let info = step("late", 9);
        report.on_step_start(&info).unwrap();
        clock.advance(Duration::from_secs(1));
        assert_eq!(
            report.on_step_end(&info, Status::Passed, None, false),
            Err(ReportError::ScenarioAlreadyClosed("S".into()))
        );
    }

    #[test]
    fn test_finish_before_suite_end_fails() {
        let (report, _clock) = started();
        assert!(matches!(report.finish(), Err(ReportError::SuiteNotFinished)));
    }

    #[test]
    fn test_suite_end_with_open_feature_fails() {
        let (mut report, _clock) = started();
        assert_eq!(
            report.on_suite_end(),
            Err(ReportError::FeatureStillOpen("features/shop.feature".into()))
        );
    }

    #[test]
    fn test_suite_duration_recorded() {
        let clock = ManualClock::new();
        let mut report = Report::with_clock(clock.clone());
        report.on_suite_start().unwrap();
        clock.advance(Duration::from_secs(7));
        report.on_suite_end().unwrap();
        assert!(report.is_finished());

        let suite = report.finish().unwrap();
        assert_eq!(suite.duration(), Duration::from_secs(7));
        assert!(suite.metrics().finished_at.is_some());
    }
}
