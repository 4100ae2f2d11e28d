// src/exec/runner.rs

//! Pluggable task runner abstraction.
//!
//! The executor talks to a `Runner` instead of doing any work itself. What a
//! task actually does (spawn a process, call a model, nothing at all) is
//! entirely up to the implementation:
//!
//! - [`AlwaysSucceed`](super::AlwaysSucceed) reports success for everything.
//! - [`FailListed`](super::FailListed) forces selected tasks to fail.
//! - [`CommandRunner`](super::CommandRunner) runs per-task shell commands.
//!
//! Tests provide their own implementation that scripts outcomes and records
//! every request.

use std::future::Future;
use std::pin::Pin;

use crate::config::model::TaskSpec;
use crate::engine::context::ContextSnapshot;
use crate::types::Outcome;

/// Future returned by [`Runner::run`].
///
/// An `Err` is a runner fault: the executor treats it as a failed attempt
/// whose detail is the error's description.
pub type RunnerFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<TaskReport>> + Send + 'a>>;

/// Everything a runner gets to know about one attempt.
#[derive(Debug, Clone, Copy)]
pub struct TaskRequest<'a> {
    pub task: &'a TaskSpec,
    /// 1-based attempt number.
    pub attempt: u32,
    pub max_attempts: u32,
    /// Error detail of the previous failed attempt; `None` on the first one.
    pub previous_error: Option<&'a str>,
    /// Outputs of tasks that have succeeded so far in this run.
    pub context: &'a ContextSnapshot,
}

impl TaskRequest<'_> {
    pub fn task_id(&self) -> &str {
        &self.task.id
    }
}

/// Typed result of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub outcome: Outcome,
    /// Failure detail forwarded to the next attempt.
    pub detail: Option<String>,
    /// Short textual result made available to later tasks.
    pub output: Option<String>,
}

impl TaskReport {
    pub fn success() -> Self {
        Self {
            outcome: Outcome::Success,
            detail: None,
            output: None,
        }
    }

    /// A failed attempt with no detail; the next attempt sees no error.
    pub fn failure() -> Self {
        Self {
            outcome: Outcome::Failure,
            detail: None,
            output: None,
        }
    }

    pub fn failure_with(detail: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure,
            detail: Some(detail.into()),
            output: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// Trait abstracting how a single task attempt is performed.
///
/// Implementations must tolerate being called several times for the same
/// task (retries). The executor awaits each call before starting another.
/// Returning `Err` or panicking, either in `run` or while the future is
/// polled, counts as a failed attempt.
pub trait Runner: Send {
    fn run<'a>(&'a mut self, request: TaskRequest<'a>) -> RunnerFuture<'a>;
}

impl<R: Runner + ?Sized> Runner for Box<R> {
    fn run<'a>(&'a mut self, request: TaskRequest<'a>) -> RunnerFuture<'a> {
        (**self).run(request)
    }
}
