// Step and scenario outcomes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a step, scenario or feature.
///
/// Variants are declared in ascending rollup precedence, so `Ord` is the
/// precedence order: `Failed > Undefined > Pending > Skipped > Passed`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Passed,
    Skipped,
    Pending,
    Undefined,
    Failed,
}

impl Status {
    /// All statuses, lowest precedence first
    pub const ALL: [Status; 5] = [
        Status::Passed,
        Status::Skipped,
        Status::Pending,
        Status::Undefined,
        Status::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Skipped => "skipped",
            Status::Pending => "pending",
            Status::Undefined => "undefined",
            Status::Failed => "failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passed" => Ok(Self::Passed),
            "skipped" => Ok(Self::Skipped),
            "pending" => Ok(Self::Pending),
            "undefined" => Ok(Self::Undefined),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// Highest-precedence status among `children`, `Passed` when empty
pub fn rollup<I>(children: I) -> Status
where
    I: IntoIterator<Item = Status>,
{
    children.into_iter().max().unwrap_or_default()
}
