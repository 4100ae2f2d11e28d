// src/exec/builtin.rs

use std::collections::HashSet;

use tracing::{debug, info};

use crate::engine::TaskName;
use crate::exec::runner::{Runner, RunnerFuture, TaskReport, TaskRequest};

/// Runner that reports success for every task without doing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysSucceed;

impl Runner for AlwaysSucceed {
    fn run<'a>(&'a mut self, request: TaskRequest<'a>) -> RunnerFuture<'a> {
        debug!(task = %request.task_id(), attempt = request.attempt, "no-op runner");
        Box::pin(async move { Ok::<_, anyhow::Error>(TaskReport::success()) })
    }
}

/// Wraps another runner and forces the listed tasks to fail.
///
/// Listed tasks never reach the inner runner.
#[derive(Debug, Clone)]
pub struct FailListed<R> {
    inner: R,
    failing: HashSet<TaskName>,
}

impl<R: Runner> FailListed<R> {
    pub fn new<I, S>(inner: R, failing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskName>,
    {
        Self {
            inner,
            failing: failing.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_forced(&self, task: &str) -> bool {
        self.failing.contains(task)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Runner> Runner for FailListed<R> {
    fn run<'a>(&'a mut self, request: TaskRequest<'a>) -> RunnerFuture<'a> {
        if self.is_forced(request.task_id()) {
            info!(task = %request.task_id(), attempt = request.attempt, "forced failure");
            return Box::pin(async move {
                Ok::<_, anyhow::Error>(TaskReport::failure_with("forced failure"))
            });
        }
        self.inner.run(request)
    }
}
