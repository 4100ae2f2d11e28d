// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{RawGraphFile, RawSettingsFile, Settings, TaskGraph};
use crate::errors::{Result, TaskgraphError};

impl TryFrom<RawGraphFile> for TaskGraph {
    type Error = crate::errors::TaskgraphError;

    fn try_from(raw: RawGraphFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_graph(&raw)?;
        Ok(TaskGraph::new_unchecked(raw.tasks))
    }
}

impl TryFrom<RawSettingsFile> for Settings {
    type Error = crate::errors::TaskgraphError;

    fn try_from(raw: RawSettingsFile) -> std::result::Result<Self, Self::Error> {
        validate_settings(&raw)?;
        Ok(Settings::new_unchecked(raw.config, raw.task))
    }
}

fn validate_raw_graph(graph: &RawGraphFile) -> Result<()> {
    ensure_has_tasks(graph)?;
    validate_task_ids(graph)?;
    validate_task_dependencies(graph)?;
    validate_dag(graph)?;
    Ok(())
}

fn ensure_has_tasks(graph: &RawGraphFile) -> Result<()> {
    if graph.tasks.is_empty() {
        return Err(TaskgraphError::ConfigError(
            "graph must contain at least one entry in `tasks`".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_ids(graph: &RawGraphFile) -> Result<()> {
    let mut seen = HashSet::new();
    for task in graph.tasks.iter() {
        if task.id.trim().is_empty() {
            return Err(TaskgraphError::ConfigError(
                "task ids must not be empty".to_string(),
            ));
        }
        if !seen.insert(task.id.as_str()) {
            return Err(TaskgraphError::ConfigError(format!(
                "duplicate task id '{}'",
                task.id
            )));
        }
    }
    Ok(())
}

fn validate_task_dependencies(graph: &RawGraphFile) -> Result<()> {
    let ids: HashSet<&str> = graph.tasks.iter().map(|t| t.id.as_str()).collect();

    for task in graph.tasks.iter() {
        for dep in task.depends_on.iter() {
            if dep == &task.id {
                return Err(TaskgraphError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `depends_on`",
                    task.id
                )));
            }
            if !ids.contains(dep.as_str()) {
                return Err(TaskgraphError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `depends_on`",
                    task.id, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(graph: &RawGraphFile) -> Result<()> {
    // Edge direction: dep -> task, so
    //   { "id": "B", "depends_on": ["A"] }
    // adds edge A -> B.
    let mut dag: DiGraphMap<&str, ()> = DiGraphMap::new();

    for task in graph.tasks.iter() {
        dag.add_node(task.id.as_str());
    }

    for task in graph.tasks.iter() {
        for dep in task.depends_on.iter() {
            dag.add_edge(dep.as_str(), task.id.as_str(), ());
        }
    }

    match toposort(&dag, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(TaskgraphError::DagCycle(format!(
                "cycle detected in task DAG involving task '{}'",
                node
            )))
        }
    }
}

fn validate_settings(settings: &RawSettingsFile) -> Result<()> {
    if settings.config.max_retries == 0 {
        return Err(TaskgraphError::ConfigError(
            "[config].max_retries must be >= 1 (got 0)".to_string(),
        ));
    }

    if settings.config.context_limit == 0 {
        return Err(TaskgraphError::ConfigError(
            "[config].context_limit must be >= 1 (got 0)".to_string(),
        ));
    }

    for (id, task) in settings.task.iter() {
        if task.cmd.trim().is_empty() {
            return Err(TaskgraphError::ConfigError(format!(
                "[task.{}].cmd must not be empty",
                id
            )));
        }
    }

    Ok(())
}
