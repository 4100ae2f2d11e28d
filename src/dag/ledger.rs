// src/dag/ledger.rs

//! Per-run record of terminal task statuses.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

use crate::engine::TaskName;
use crate::types::Status;

/// Mapping from task id to terminal [`Status`].
///
/// Grows monotonically: an entry, once recorded, is never overwritten or
/// removed. A task without an entry is unresolved.
///
/// A ledger built with [`StatusLedger::with_declared_order`] iterates and
/// serializes in that order and only accepts the declared ids. A ledger
/// from [`StatusLedger::new`] accepts any id and iterates in resolution
/// order.
#[derive(Debug, Clone, Default)]
pub struct StatusLedger {
    statuses: HashMap<TaskName, Status>,
    resolved: Vec<TaskName>,
    declared: Vec<TaskName>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty ledger for the tasks `ids`, iterated in the given order.
    pub fn with_declared_order<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskName>,
    {
        Self {
            declared: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Record the terminal status of `task`.
    ///
    /// Returns `false` (and keeps the existing entry) if `task` already has
    /// a status.
    pub fn record(&mut self, task: &str, status: Status) -> bool {
        if !self.declared.is_empty() && !self.declared.iter().any(|id| id == task) {
            warn!(task = %task, "status for undeclared task; ignoring");
            return false;
        }
        if let Some(existing) = self.statuses.get(task) {
            warn!(
                task = %task,
                existing = %existing,
                rejected = %status,
                "task already resolved; keeping first status"
            );
            return false;
        }
        self.statuses.insert(task.to_string(), status);
        self.resolved.push(task.to_string());
        true
    }

    pub fn get(&self, task: &str) -> Option<Status> {
        self.statuses.get(task).copied()
    }

    pub fn is_resolved(&self, task: &str) -> bool {
        self.statuses.contains_key(task)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Task ids in the order they were resolved.
    pub fn resolution_order(&self) -> &[TaskName] {
        &self.resolved
    }

    /// Resolved `(id, status)` pairs, in declaration order when the ledger
    /// has one and in resolution order otherwise.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Status)> {
        let ids = if self.declared.is_empty() {
            &self.resolved
        } else {
            &self.declared
        };
        ids.iter()
            .filter_map(|id| self.statuses.get(id).map(|s| (id.as_str(), *s)))
    }

    /// Number of tasks that resolved to `status`.
    pub fn count(&self, status: Status) -> usize {
        self.statuses.values().filter(|s| **s == status).count()
    }

    pub fn has_failures(&self) -> bool {
        self.count(Status::Failure) > 0
    }
}

impl Serialize for StatusLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (id, status) in self.iter() {
            map.serialize_entry(id, &status)?;
        }
        map.end()
    }
}
