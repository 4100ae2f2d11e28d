// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::{default_settings_path, load_and_validate, load_settings, load_settings_if_exists};
use crate::config::model::{Settings, TaskGraph};
use crate::dag::{DagGraph, StatusLedger};
use crate::engine::ExecuteOptions;
use crate::exec::{AlwaysSucceed, CommandRunner, FailListed, Runner};

pub use crate::engine::execute;
pub use crate::types::{Outcome, RunOn, Status};

/// Exit code when the run completed but at least one task failed.
pub const EXIT_TASK_FAILURE: i32 = 2;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - graph loading and validation
/// - settings loading (explicit `--config`, or `Taskgraph.toml` if present)
/// - runner selection (`--fail` wrapping the command or no-op runner)
/// - execution and printing of the final statuses
///
/// Returns the ledger, or `None` for `--dry-run`.
pub async fn run(args: CliArgs) -> Result<Option<StatusLedger>> {
    let graph_path = PathBuf::from(&args.graph);
    let graph = load_and_validate(&graph_path)
        .with_context(|| format!("loading graph from {}", graph_path.display()))?;

    let settings = match args.config.as_deref() {
        Some(path) => {
            load_settings(path).with_context(|| format!("loading settings from {path}"))?
        }
        None => load_settings_if_exists(default_settings_path())?,
    };

    warn_about_unknown_ids(&graph, &settings, &args.fail);

    let mut options = ExecuteOptions::from(&settings);
    if let Some(max_retries) = args.max_retries {
        options = options.with_max_retries(max_retries);
    }

    if args.dry_run {
        print_dry_run(&graph, &settings, &options);
        return Ok(None);
    }

    let inner: Box<dyn Runner> = if settings.task.is_empty() {
        debug!("no task commands configured; using no-op runner");
        Box::new(AlwaysSucceed)
    } else {
        Box::new(CommandRunner::from_settings(&settings))
    };
    let mut runner = FailListed::new(inner, args.fail.iter().cloned());

    let ledger = execute(&graph, &mut runner, &options).await?;

    print_ledger(&graph, &ledger, args.json)?;

    Ok(Some(ledger))
}

/// Exit code for a finished invocation: 0, or [`EXIT_TASK_FAILURE`] when any
/// task failed.
pub fn exit_code(ledger: Option<&StatusLedger>) -> i32 {
    match ledger {
        Some(ledger) if ledger.has_failures() => EXIT_TASK_FAILURE,
        _ => 0,
    }
}

fn warn_about_unknown_ids(graph: &TaskGraph, settings: &Settings, forced: &[String]) {
    for id in settings.task.keys() {
        if !graph.contains(id) {
            warn!(task = %id, "settings define a command for a task not in the graph; ignoring");
        }
    }
    for id in forced {
        if !graph.contains(id) {
            warn!(task = %id, "--fail names a task not in the graph; ignoring");
        }
    }
}

fn print_ledger(graph: &TaskGraph, ledger: &StatusLedger, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(ledger)?);
        return Ok(());
    }

    for id in graph.ids() {
        match ledger.get(id) {
            Some(status) => println!("{id}: {status}"),
            None => println!("{id}: unresolved"),
        }
    }
    Ok(())
}

/// Simple dry-run output: tasks in execution order with conditions and commands.
fn print_dry_run(graph: &TaskGraph, settings: &Settings, options: &ExecuteOptions) {
    println!("taskgraph dry-run");
    println!("  max_retries = {}", options.max_retries);
    println!("  context_limit = {}", options.context_limit);
    println!();

    let dag = DagGraph::from_graph(graph);
    let order = dag.topological_order();

    println!("tasks ({}):", order.len());
    for id in order.iter() {
        let Some(task) = graph.get(id) else {
            continue;
        };
        println!("  - {id}");
        if !task.depends_on.is_empty() {
            println!("      depends_on: {:?}", task.depends_on);
            println!("      run_on: {}", task.run_on);
        }
        if let Some(cmd) = settings.command_for(id) {
            println!("      cmd: {cmd}");
        }
    }

    info!(tasks = order.len(), "dry-run complete (no execution)");
}
