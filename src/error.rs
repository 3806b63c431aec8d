// Fatal aggregation errors
//
// These are contract violations by the upstream event source. Attribution
// mismatches and unmatched outline placeholders are not errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("event received before the suite started")]
    SuiteNotStarted,

    #[error("suite started twice")]
    SuiteAlreadyStarted,

    #[error("event received after the suite finished")]
    SuiteFinished,

    #[error("report requested before the suite finished")]
    SuiteNotFinished,

    #[error("feature '{0}' is still open")]
    FeatureStillOpen(String),

    #[error("no open feature")]
    NoCurrentFeature,

    #[error("no open scenario")]
    NoCurrentScenario,

    #[error("scenario '{0}' was already closed")]
    ScenarioAlreadyClosed(String),

    #[error("scenario '{0}' is still open")]
    ScenarioStillOpen(String),

    #[error("step '{0}' finished without a matching start")]
    StepNotStarted(String),

    #[error("step '{0}' is still running")]
    StepStillOpen(String),

    #[error("background ended without a matching start")]
    BackgroundNotActive,

    #[error("background started while another background is active")]
    BackgroundAlreadyActive,

    #[error("background is still active")]
    BackgroundStillActive,

    #[error("feature '{finished}' finished while '{open}' is open")]
    FeatureMismatch { open: String, finished: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;
