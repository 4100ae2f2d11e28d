// src/engine/executor.rs

use tracing::{error, info, warn};

use crate::config::model::TaskGraph;
use crate::dag::readiness::{self, Readiness};
use crate::dag::{Scheduler, StatusLedger};
use crate::engine::context::ContextSnapshot;
use crate::engine::retry::{run_with_retry, RetryPolicy};
use crate::engine::ExecuteOptions;
use crate::errors::{Result, TaskgraphError};
use crate::exec::Runner;
use crate::types::Status;

/// Execute every task of `graph` exactly once, in dependency order.
///
/// - Ready tasks whose `run_on` condition holds are run through
///   [`run_with_retry`]; their final status is recorded.
/// - Ready tasks whose condition does not hold are recorded as `skipped`
///   without invoking the runner.
/// - Outputs of successful tasks are added to the context snapshot passed
///   to later tasks.
///
/// Task failures never surface as errors. The only error is
/// `UnsatisfiableGraph`, returned when the ready queue drains while tasks
/// are still unresolved, which a validated graph cannot produce.
pub async fn execute<R: Runner + ?Sized>(
    graph: &TaskGraph,
    runner: &mut R,
    options: &ExecuteOptions,
) -> Result<StatusLedger> {
    let policy = RetryPolicy::new(options.max_retries);
    let mut scheduler = Scheduler::new(graph);
    let mut context = ContextSnapshot::new();

    info!(
        tasks = graph.len(),
        max_retries = policy.max_attempts(),
        "executing task graph"
    );

    while let Some(task_id) = scheduler.next_ready() {
        let Some(task) = graph.get(&task_id) else {
            warn!(task = %task_id, "ready task missing from graph; ignoring");
            continue;
        };

        match readiness::evaluate(task, scheduler.ledger()) {
            Readiness::Run => {
                let verdict = run_with_retry(task, runner, policy, &context).await;
                if let Some(output) = verdict.output.as_deref() {
                    context = context.with_result(&task.id, output, options.context_limit);
                }
                scheduler.record(&task.id, verdict.status);
            }
            Readiness::Skip => {
                info!(
                    task = %task.id,
                    run_on = %task.run_on,
                    "run_on condition not met; skipping"
                );
                scheduler.record(&task.id, Status::Skipped);
            }
            Readiness::Blocked => {
                warn!(
                    task = %task.id,
                    "task released before its dependencies resolved; leaving unresolved"
                );
            }
        }
    }

    if !scheduler.is_complete() {
        let unresolved = scheduler.unresolved();
        error!(?unresolved, "ready queue drained with unresolved tasks");
        return Err(TaskgraphError::UnsatisfiableGraph(unresolved));
    }

    let ledger = scheduler.into_ledger();
    info!(
        success = ledger.count(Status::Success),
        failure = ledger.count(Status::Failure),
        skipped = ledger.count(Status::Skipped),
        "task graph finished"
    );

    Ok(ledger)
}
