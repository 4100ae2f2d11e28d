// src/dag/mod.rs

//! DAG representation and scheduling.
//!
//! - [`graph`] holds the adjacency view of a validated task graph.
//! - [`ledger`] records terminal task statuses for a run.
//! - [`readiness`] decides whether a task runs, is skipped, or waits.
//! - [`scheduler`] is the readiness queue that releases tasks as their
//!   dependencies resolve.
//! - [`scheduler_step`] defines the result type for scheduler steps.
//! - [`task_state`] exposes a read-only per-task state view.

pub mod graph;
pub mod ledger;
pub mod readiness;
pub mod scheduler;
pub mod scheduler_step;
pub mod task_state;

pub use graph::DagGraph;
pub use ledger::StatusLedger;
pub use readiness::{evaluate, Readiness};
pub use scheduler::Scheduler;
pub use scheduler_step::SchedulerStep;
pub use task_state::TaskState;
