// src/engine/mod.rs

//! Execution engine for taskgraph.
//!
//! This module ties together:
//! - the readiness-queue scheduler from [`crate::dag`]
//! - the retry controller ([`retry`])
//! - the per-run context snapshot ([`context`])
//! - the `execute` loop ([`executor`]) that drives a run to completion
//!   against an injected [`Runner`](crate::exec::Runner).

use crate::config::model::{default_context_limit, default_max_retries, Settings};

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// Options for a single [`execute`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Maximum attempts per task; values below 1 are treated as 1.
    pub max_retries: u32,
    /// Maximum characters of a task's output kept in the context snapshot.
    pub context_limit: usize,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            context_limit: default_context_limit(),
        }
    }
}

impl ExecuteOptions {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl From<&Settings> for ExecuteOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            max_retries: settings.config.max_retries,
            context_limit: settings.config.context_limit,
        }
    }
}

pub mod context;
pub mod executor;
pub mod retry;

pub use context::ContextSnapshot;
pub use executor::execute;
pub use retry::{run_with_retry, RetryPolicy, RetryVerdict};
