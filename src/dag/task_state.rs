// src/dag/task_state.rs

use crate::types::Status;

/// Public, read-only view of a task's state within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Some dependency has not resolved yet.
    Waiting,
    /// All dependencies resolved; queued or about to be evaluated.
    Ready,
    /// Terminal status recorded in the ledger.
    Resolved(Status),
}
