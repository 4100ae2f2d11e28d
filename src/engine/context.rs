// src/engine/context.rs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::engine::TaskName;

/// Immutable view of the results produced so far in a run.
///
/// The executor hands each runner invocation a snapshot by reference and
/// builds a fresh one (via [`ContextSnapshot::with_result`]) after each
/// successful task, so no runner can observe or cause mutation mid-call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContextSnapshot {
    results: BTreeMap<TaskName, String>,
}

impl ContextSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of this snapshot with `task`'s output added, truncated to
    /// `limit` characters.
    pub fn with_result(&self, task: &str, output: &str, limit: usize) -> Self {
        let mut results = self.results.clone();
        results.insert(task.to_string(), truncate_chars(output, limit));
        Self { results }
    }

    pub fn get(&self, task: &str) -> Option<&str> {
        self.results.get(task).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// One `task: output` line per entry, or `None` when empty. Handy for
    /// runners that build prompts.
    pub fn render(&self) -> String {
        if self.results.is_empty() {
            return "None".to_string();
        }
        self.iter()
            .map(|(task, output)| format!("{task}: {output}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// First `limit` characters of `s` (not bytes).
pub fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
