// src/exec/mod.rs

//! Task execution layer.
//!
//! - [`runner`] defines the `Runner` trait the executor is generic over,
//!   plus the typed request/report exchanged with it.
//! - [`builtin`] provides the trivial runners (`AlwaysSucceed`,
//!   `FailListed`).
//! - [`command`] runs per-task shell commands via `tokio::process`.

pub mod builtin;
pub mod command;
pub mod runner;

pub use builtin::{AlwaysSucceed, FailListed};
pub use command::CommandRunner;
pub use runner::{Runner, RunnerFuture, TaskReport, TaskRequest};
