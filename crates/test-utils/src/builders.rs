#![allow(dead_code)]

use taskgraph::config::{RawGraphFile, TaskGraph, TaskSpec};
use taskgraph::RunOn;

/// Builder for `TaskGraph` to simplify test setup.
pub struct GraphBuilder {
    graph: RawGraphFile,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: RawGraphFile { tasks: Vec::new() },
        }
    }

    pub fn with_task(mut self, task: TaskSpec) -> Self {
        self.graph.tasks.push(task);
        self
    }

    /// Shorthand for a task with no dependencies.
    pub fn with_root(self, id: &str) -> Self {
        self.with_task(TaskBuilder::new(id).build())
    }

    pub fn raw(self) -> RawGraphFile {
        self.graph
    }

    pub fn build(self) -> TaskGraph {
        TaskGraph::try_from(self.graph).expect("Failed to build valid graph from builder")
    }

    /// Build without validation, for exercising the executor's own checks.
    pub fn build_unchecked(self) -> TaskGraph {
        TaskGraph::new_unchecked(self.graph.tasks)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskSpec`.
pub struct TaskBuilder {
    task: TaskSpec,
}

impl TaskBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            task: TaskSpec {
                id: id.to_string(),
                depends_on: vec![],
                run_on: RunOn::Success,
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.depends_on.push(dep.to_string());
        self
    }

    pub fn run_on(mut self, run_on: RunOn) -> Self {
        self.task.run_on = run_on;
        self
    }

    pub fn on_failure(self) -> Self {
        self.run_on(RunOn::Failure)
    }

    pub fn always(self) -> Self {
        self.run_on(RunOn::Always)
    }

    pub fn build(self) -> TaskSpec {
        self.task
    }
}

/// `A -> {B, C} -> D`, all conditioned on success.
pub fn diamond() -> TaskGraph {
    GraphBuilder::new()
        .with_root("A")
        .with_task(TaskBuilder::new("B").after("A").build())
        .with_task(TaskBuilder::new("C").after("A").build())
        .with_task(TaskBuilder::new("D").after("B").after("C").build())
        .build()
}

/// `A -> B -> C`, all conditioned on success.
pub fn chain() -> TaskGraph {
    GraphBuilder::new()
        .with_root("A")
        .with_task(TaskBuilder::new("B").after("A").build())
        .with_task(TaskBuilder::new("C").after("B").build())
        .build()
}
