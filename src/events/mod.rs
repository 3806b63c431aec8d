// Events - lifecycle notifications emitted by the test-execution engine
//
// Payload shape (plain scenario, outline controller, example row, data-table
// cells) is decided once here, when the event is ingested.

pub mod stream;

pub use stream::{Record, read_events};

use crate::model::Status;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Source position of a step or scenario
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// True when a backtrace frame such as `a.feature:12:in 'step'` was
    /// raised from this location.
    ///
    /// The frame must start with `file:line`; the line number must not
    /// continue with further digits, so `a.feature:1` does not match
    /// `a.feature:12`.
    pub fn matches_frame(&self, frame: &str) -> bool {
        let prefix = self.to_string();
        match frame.strip_prefix(prefix.as_str()) {
            Some(rest) => !rest.starts_with(|c: char| c.is_ascii_digit()),
            None => false,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Error captured while a step or example row ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,

    /// Exception class or error kind, when the engine reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Stack frames, innermost first; the last frame is the origin
    #[serde(default)]
    pub backtrace: Vec<String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>, backtrace: Vec<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
            backtrace,
        }
    }

    /// Last recorded stack frame
    pub fn origin(&self) -> Option<&str> {
        self.backtrace.last().map(String::as_str)
    }

    /// True when the origin frame belongs to `location`
    pub fn raised_at(&self, location: &Location) -> bool {
        self.origin()
            .is_some_and(|frame| location.matches_frame(frame))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureInfo {
    pub title: String,
    pub file: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    #[serde(default)]
    pub keyword: String,
    pub name: String,
    pub location: Location,
}

impl StepInfo {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            keyword: String::new(),
            name: name.into(),
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Scenario outline: a title plus its raw, unparameterized steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineInfo {
    pub title: String,
    #[serde(default)]
    pub steps: Vec<StepInfo>,
}

/// One example row of an outline, already resolved by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleRow {
    pub outline: OutlineInfo,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Feature element opening or closing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioElement {
    Scenario(ScenarioInfo),
    /// Outline controller; its rows arrive as `TableRow::Example`
    Outline(OutlineInfo),
}

/// Table row opening or closing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableRow {
    /// Example row driving one outline occurrence
    Example(ExampleRow),
    /// Example table header; carries no scenario
    Header { cells: Vec<String> },
    /// Row of a data table passed as a step argument
    Cells { cells: Vec<String> },
}

/// Attachment embedded by a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub src: String,
    pub mime_type: String,
    #[serde(default)]
    pub label: String,
}

/// Lifecycle notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SuiteStarted,
    FeatureStarted {
        feature: FeatureInfo,
    },
    FeatureFinished {
        feature: FeatureInfo,
    },
    BackgroundStarted,
    BackgroundFinished,
    ScenarioStarted {
        element: ScenarioElement,
    },
    ScenarioFinished {
        element: ScenarioElement,
    },
    TableRowStarted {
        row: TableRow,
    },
    TableRowFinished {
        row: TableRow,
    },
    StepStarted {
        step: StepInfo,
    },
    StepFinished {
        step: StepInfo,
        status: Status,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<ErrorInfo>,
        /// The outline's own template step; its results arrive per row
        #[serde(default)]
        outline: bool,
    },
    Embedded {
        embed: Embed,
    },
    SuiteFinished,
}

impl Event {
    /// Short event name, used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Event::SuiteStarted => "suite_started",
            Event::FeatureStarted { .. } => "feature_started",
            Event::FeatureFinished { .. } => "feature_finished",
            Event::BackgroundStarted => "background_started",
            Event::BackgroundFinished => "background_finished",
            Event::ScenarioStarted { .. } => "scenario_started",
            Event::ScenarioFinished { .. } => "scenario_finished",
            Event::TableRowStarted { .. } => "table_row_started",
            Event::TableRowFinished { .. } => "table_row_finished",
            Event::StepStarted { .. } => "step_started",
            Event::StepFinished { .. } => "step_finished",
            Event::Embedded { .. } => "embedded",
            Event::SuiteFinished => "suite_finished",
        }
    }
}
