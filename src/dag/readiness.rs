// src/dag/readiness.rs

//! Decides whether a task can run, must be skipped, or is still waiting.

use crate::config::model::TaskSpec;
use crate::dag::ledger::StatusLedger;

/// Verdict of [`evaluate`] for a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// At least one dependency is unresolved.
    Blocked,
    /// All dependencies resolved but the `run_on` condition is not met.
    Skip,
    /// All dependencies resolved and the condition holds.
    Run,
}

/// Evaluate `task` against the current ledger.
///
/// The condition must hold for *every* dependency: a `success` task needs
/// all deps to have succeeded, a `failure` task needs all deps to have
/// failed, and `always` ignores outcomes. A `skipped` dependency satisfies
/// neither `success` nor `failure`. Roots are always `Run`.
pub fn evaluate(task: &TaskSpec, ledger: &StatusLedger) -> Readiness {
    let mut conditions_met = true;

    for dep in task.depends_on.iter() {
        match ledger.get(dep) {
            None => return Readiness::Blocked,
            Some(status) => {
                if !task.run_on.accepts(status) {
                    conditions_met = false;
                }
            }
        }
    }

    if conditions_met {
        Readiness::Run
    } else {
        Readiness::Skip
    }
}
