use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Condition under which a task runs once its dependencies are resolved.
///
/// - `Success`: every dependency must have succeeded (default).
/// - `Failure`: every dependency must have failed.
/// - `Always`: dependency outcomes are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOn {
    #[default]
    Success,
    Failure,
    Always,
}

impl RunOn {
    /// Whether a dependency that resolved to `status` satisfies this condition.
    pub fn accepts(self, status: Status) -> bool {
        match self {
            RunOn::Always => true,
            RunOn::Success => status == Status::Success,
            RunOn::Failure => status == Status::Failure,
        }
    }
}

impl FromStr for RunOn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" => Ok(RunOn::Success),
            "failure" => Ok(RunOn::Failure),
            "always" => Ok(RunOn::Always),
            other => Err(format!(
                "invalid run_on: {other} (expected \"success\", \"failure\" or \"always\")"
            )),
        }
    }
}

impl fmt::Display for RunOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunOn::Success => "success",
            RunOn::Failure => "failure",
            RunOn::Always => "always",
        };
        f.write_str(s)
    }
}

/// Terminal status of a task in a finished (or finishing) run.
///
/// A task without a ledger entry is unresolved; there is no variant for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
    Skipped,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Result of a single runner attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for Status {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Status::Success,
            Outcome::Failure => Status::Failure,
        }
    }
}
