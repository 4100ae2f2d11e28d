// src/engine/retry.rs

//! Bounded retry around a single task.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, warn};

use crate::config::model::TaskSpec;
use crate::engine::context::ContextSnapshot;
use crate::exec::runner::{Runner, TaskReport, TaskRequest};
use crate::types::Status;

/// How many attempts a task gets before it is reported as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// `max_attempts` is clamped to at least 1; a task always gets one try.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

/// Final result of [`run_with_retry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryVerdict {
    /// `Success` or `Failure`; never `Skipped`.
    pub status: Status,
    /// Number of runner invocations made.
    pub attempts: u32,
    /// Output of the successful attempt, if any.
    pub output: Option<String>,
    /// Detail of the last failed attempt, if the task failed.
    pub last_error: Option<String>,
}

/// Run `task` until it succeeds or `policy` runs out of attempts.
///
/// Each attempt after the first receives the previous attempt's error
/// detail. A runner fault counts as a failed attempt: an `Err` forwards its
/// full description, a panic forwards `runner panicked: <message>`.
/// Exhaustion reports plain `Failure`.
pub async fn run_with_retry<R: Runner + ?Sized>(
    task: &TaskSpec,
    runner: &mut R,
    policy: RetryPolicy,
    context: &ContextSnapshot,
) -> RetryVerdict {
    let max = policy.max_attempts();
    let mut error: Option<String> = None;
    let mut attempt = 0;

    loop {
        attempt += 1;

        let request = TaskRequest {
            task,
            attempt,
            max_attempts: max,
            previous_error: error.as_deref(),
            context,
        };

        debug!(task = %task.id, attempt, max, "invoking runner");

        let outcome = AssertUnwindSafe(async { runner.run(request).await })
            .catch_unwind()
            .await;

        let report = match outcome {
            Ok(Ok(report)) => report,
            Ok(Err(fault)) => {
                warn!(task = %task.id, attempt, error = %fault, "runner fault");
                TaskReport::failure_with(format!("{fault:#}"))
            }
            Err(payload) => {
                let message = panic_message(&*payload);
                warn!(task = %task.id, attempt, panic = %message, "runner panicked");
                TaskReport::failure_with(format!("runner panicked: {message}"))
            }
        };

        if report.is_success() {
            return RetryVerdict {
                status: Status::Success,
                attempts: attempt,
                output: report.output,
                last_error: None,
            };
        }

        error = report.detail;

        if attempt >= max {
            warn!(
                task = %task.id,
                attempts = attempt,
                error = error.as_deref().unwrap_or(""),
                "task failed; no attempts left"
            );
            return RetryVerdict {
                status: Status::Failure,
                attempts: attempt,
                output: None,
                last_error: error,
            };
        }

        warn!(
            task = %task.id,
            attempt,
            max,
            error = error.as_deref().unwrap_or(""),
            "retry {}/{}",
            attempt,
            max
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
