use std::collections::{HashMap, VecDeque};

use tracing::{debug, info, warn};

use crate::config::model::TaskGraph;
use crate::dag::graph::DagGraph;
use crate::dag::ledger::StatusLedger;
use crate::dag::readiness::{self, Readiness};
use crate::dag::scheduler_step::SchedulerStep;
use crate::dag::task_state::TaskState;
use crate::engine::TaskName;
use crate::types::Status;

/// Scheduler holds the immutable graph plus the mutable per-run state.
///
/// It is responsible for:
/// - counting unresolved dependency edges per task
/// - queueing tasks whose dependencies have all resolved
/// - recording terminal statuses in the [`StatusLedger`]
/// - releasing dependents when a task resolves
///
/// It never runs anything itself; the executor pops ready tasks, evaluates
/// them and reports back through [`Scheduler::record`].
#[derive(Debug)]
pub struct Scheduler<'g> {
    graph: &'g TaskGraph,
    dag: DagGraph,
    /// Unresolved dependency edges per task.
    remaining: HashMap<TaskName, usize>,
    /// Tasks whose dependencies are all resolved, in release order.
    ready: VecDeque<TaskName>,
    ledger: StatusLedger,
    total: usize,
}

impl<'g> Scheduler<'g> {
    /// Build a scheduler for one run over `graph`.
    ///
    /// Roots are queued immediately, in declaration order.
    pub fn new(graph: &'g TaskGraph) -> Self {
        let dag = DagGraph::from_graph(graph);

        let mut remaining = HashMap::with_capacity(graph.len());
        let mut ready = VecDeque::new();

        for id in dag.tasks() {
            let count = dag.dependencies_of(id).len();
            if count == 0 {
                ready.push_back(id.to_string());
            }
            remaining.insert(id.to_string(), count);
        }

        let total = remaining.len();
        let ledger = StatusLedger::with_declared_order(dag.tasks());
        debug!(tasks = total, roots = ready.len(), "scheduler: new run");

        Self {
            graph,
            dag,
            remaining,
            ready,
            ledger,
            total,
        }
    }

    /// Pop the next task whose dependencies have all resolved.
    pub fn next_ready(&mut self) -> Option<TaskName> {
        self.ready.pop_front()
    }

    /// Evaluate a task against the current ledger. `None` for unknown ids.
    pub fn evaluate(&self, task: &str) -> Option<Readiness> {
        let spec = self.graph.get(task)?;
        Some(readiness::evaluate(spec, &self.ledger))
    }

    /// Record the terminal status of `task` and release its dependents.
    ///
    /// Recording a task twice leaves the ledger untouched and releases
    /// nothing.
    pub fn record(&mut self, task: &str, status: Status) -> SchedulerStep {
        if !self.remaining.contains_key(task) {
            warn!(task = %task, "status for unknown task; ignoring");
            return SchedulerStep::default();
        }

        if !self.ledger.record(task, status) {
            return SchedulerStep::default();
        }

        info!(task = %task, status = %status, "task resolved");

        let mut newly_ready = Vec::new();
        for dependent in self.dag.dependents_of(task) {
            if let Some(count) = self.remaining.get_mut(dependent) {
                *count = count.saturating_sub(1);
                if *count == 0 && !self.ledger.is_resolved(dependent) {
                    debug!(task = %dependent, after = %task, "dependencies resolved; queueing");
                    self.ready.push_back(dependent.clone());
                    newly_ready.push(dependent.clone());
                }
            }
        }

        SchedulerStep {
            newly_ready,
            run_just_finished: self.is_complete(),
        }
    }

    /// Whether every task in the graph has a terminal status.
    pub fn is_complete(&self) -> bool {
        self.ledger.len() == self.total
    }

    /// Ids without a ledger entry, in declaration order.
    pub fn unresolved(&self) -> Vec<TaskName> {
        self.dag
            .tasks()
            .filter(|id| !self.ledger.is_resolved(id))
            .map(|id| id.to_string())
            .collect()
    }

    /// Read-only view of the given task's state in this run.
    pub fn state_of(&self, task: &str) -> Option<TaskState> {
        let count = self.remaining.get(task)?;
        let state = match self.ledger.get(task) {
            Some(status) => TaskState::Resolved(status),
            None if *count == 0 => TaskState::Ready,
            None => TaskState::Waiting,
        };
        Some(state)
    }

    pub fn ledger(&self) -> &StatusLedger {
        &self.ledger
    }

    pub fn into_ledger(self) -> StatusLedger {
        self.ledger
    }
}
