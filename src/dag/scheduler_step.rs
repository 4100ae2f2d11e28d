// src/dag/scheduler_step.rs

//! Step-by-step result type for the scheduler.

use crate::engine::TaskName;

/// Structured result of recording one task's status.
///
/// Useful for tests that drive the scheduler by hand and make assertions
/// about what changed.
#[derive(Debug, Clone, Default)]
pub struct SchedulerStep {
    /// Tasks whose last unresolved dependency was the recorded task.
    pub newly_ready: Vec<TaskName>,
    /// Whether this step resolved the final task of the run.
    pub run_just_finished: bool,
}
