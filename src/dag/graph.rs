use std::collections::{HashMap, VecDeque};

use crate::config::model::TaskGraph;
use crate::engine::TaskName;

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone)]
struct DagNode {
    /// Direct dependencies: tasks that must resolve before this one is evaluated.
    deps: Vec<TaskName>,
    /// Direct dependents: tasks that list this one in `depends_on`.
    dependents: Vec<TaskName>,
}

/// Adjacency view over a [`TaskGraph`], keyed by task id.
///
/// Acyclicity is validated when the `TaskGraph` is built; here we only keep
/// the edges in both directions for scheduling and dry-run output.
#[derive(Debug, Clone)]
pub struct DagGraph {
    nodes: HashMap<TaskName, DagNode>,
    /// Task ids in declaration order.
    order: Vec<TaskName>,
}

impl DagGraph {
    pub fn from_graph(graph: &TaskGraph) -> Self {
        let mut nodes: HashMap<TaskName, DagNode> = HashMap::with_capacity(graph.len());
        let mut order = Vec::with_capacity(graph.len());

        for task in graph.tasks() {
            if nodes.contains_key(&task.id) {
                continue;
            }
            order.push(task.id.clone());
            nodes.insert(
                task.id.clone(),
                DagNode {
                    deps: task.depends_on.clone(),
                    dependents: Vec::new(),
                },
            );
        }

        // One dependents entry per edge, so duplicated `depends_on` entries
        // stay consistent with per-edge dependency counting.
        for task_id in order.iter() {
            let deps = nodes
                .get(task_id)
                .map(|n| n.deps.clone())
                .unwrap_or_default();

            for dep in deps {
                if let Some(dep_node) = nodes.get_mut(&dep) {
                    dep_node.dependents.push(task_id.clone());
                }
            }
        }

        Self { nodes, order }
    }

    /// All task ids in declaration order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Tasks with no dependencies, in declaration order.
    pub fn roots(&self) -> Vec<TaskName> {
        self.order
            .iter()
            .filter(|id| self.dependencies_of(id).is_empty())
            .cloned()
            .collect()
    }

    /// A dependency-respecting order (Kahn's algorithm, ties broken by
    /// declaration order). Tasks stuck behind a cycle or a dangling
    /// dependency are left out.
    pub fn topological_order(&self) -> Vec<TaskName> {
        let mut remaining: HashMap<&str, usize> = self
            .order
            .iter()
            .map(|id| (id.as_str(), self.dependencies_of(id).len()))
            .collect();

        let mut queue: VecDeque<&str> = self
            .order
            .iter()
            .map(|s| s.as_str())
            .filter(|id| remaining.get(id).copied() == Some(0))
            .collect();

        let mut sorted = Vec::with_capacity(self.order.len());
        while let Some(id) = queue.pop_front() {
            sorted.push(id.to_string());
            for dependent in self.dependents_of(id) {
                if let Some(count) = remaining.get_mut(dependent.as_str()) {
                    *count -= 1;
                    if *count == 0 {
                        queue.push_back(dependent.as_str());
                    }
                }
            }
        }

        sorted
    }
}
