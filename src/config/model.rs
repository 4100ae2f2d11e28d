// src/config/model.rs

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::engine::TaskName;
use crate::types::RunOn;

/// Graph description as read from JSON, before validation.
///
/// ```json
/// {
///   "tasks": [
///     { "id": "fetch", "depends_on": [] },
///     { "id": "build", "depends_on": ["fetch"] },
///     { "id": "report", "depends_on": ["build"], "run_on": "failure" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RawGraphFile {
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
}

/// One entry of the `tasks` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskSpec {
    /// Unique identifier within the graph.
    pub id: TaskName,

    /// Tasks that must reach a terminal status before this one is considered.
    #[serde(default)]
    pub depends_on: Vec<TaskName>,

    /// Condition on the dependencies' statuses; `success` when omitted.
    #[serde(default)]
    pub run_on: RunOn,
}

impl TaskSpec {
    pub fn is_root(&self) -> bool {
        self.depends_on.is_empty()
    }
}

/// Validated, immutable task graph.
///
/// Construct through [`TaskGraph::new`] or `TaskGraph::try_from(RawGraphFile)`,
/// which reject duplicate ids, unknown or self dependencies and cycles.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<TaskSpec>,
    index: HashMap<TaskName, usize>,
}

impl TaskGraph {
    /// Validate `tasks` and build a graph, preserving declaration order.
    pub fn new(tasks: Vec<TaskSpec>) -> crate::errors::Result<Self> {
        Self::try_from(RawGraphFile { tasks })
    }

    /// Build a graph without structural validation.
    ///
    /// Dangling or cyclic dependencies are only caught when the graph is
    /// executed, where they surface as `UnsatisfiableGraph`. Later duplicates
    /// of an id are unreachable through [`TaskGraph::get`].
    pub fn new_unchecked(tasks: Vec<TaskSpec>) -> Self {
        let mut index = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            index.entry(task.id.clone()).or_insert(i);
        }
        Self { tasks, index }
    }

    /// Tasks in declaration order.
    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&TaskSpec> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of `id` in declaration order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.id.as_str())
    }
}

/// Settings file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// max_retries = 3
/// context_limit = 200
///
/// [task.build]
/// cmd = "cargo build"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSettingsFile {
    #[serde(default)]
    pub config: SettingsSection,

    /// Per-task commands for the command runner, keyed by task id.
    #[serde(default)]
    pub task: BTreeMap<TaskName, TaskCommand>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsSection {
    /// Maximum number of attempts per task (not additional retries).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Maximum characters of a task's output kept in the context snapshot.
    #[serde(default = "default_context_limit")]
    pub context_limit: usize,
}

pub(crate) fn default_max_retries() -> u32 {
    3
}

pub(crate) fn default_context_limit() -> usize {
    200
}

impl Default for SettingsSection {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            context_limit: default_context_limit(),
        }
    }
}

/// `[task.<id>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskCommand {
    /// Shell command executed by the command runner.
    pub cmd: String,
}

/// Validated settings.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub config: SettingsSection,
    pub task: BTreeMap<TaskName, TaskCommand>,
}

impl Settings {
    pub(crate) fn new_unchecked(
        config: SettingsSection,
        task: BTreeMap<TaskName, TaskCommand>,
    ) -> Self {
        Self { config, task }
    }

    /// Command configured for `id`, if any.
    pub fn command_for(&self, id: &str) -> Option<&str> {
        self.task.get(id).map(|t| t.cmd.as_str())
    }
}
