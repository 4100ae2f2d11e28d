// src/exec/command.rs

//! Runner that executes a shell command per task.

use std::collections::BTreeMap;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::model::Settings;
use crate::engine::TaskName;
use crate::exec::runner::{Runner, RunnerFuture, TaskReport, TaskRequest};

pub const ENV_TASK: &str = "TASKGRAPH_TASK";
pub const ENV_ATTEMPT: &str = "TASKGRAPH_ATTEMPT";
pub const ENV_PREVIOUS_ERROR: &str = "TASKGRAPH_PREVIOUS_ERROR";
pub const ENV_CONTEXT: &str = "TASKGRAPH_CONTEXT";

/// Runs the command configured for each task under `sh -c` (`cmd /C` on
/// Windows).
///
/// - exit status 0: success, trimmed stdout becomes the task's output
/// - any other exit: failure, detail names the exit code and the last
///   stderr line
/// - no command configured: success without spawning anything
///
/// Failing to spawn or wait for the process is a runner fault.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    commands: BTreeMap<TaskName, String>,
}

impl CommandRunner {
    pub fn new(commands: BTreeMap<TaskName, String>) -> Self {
        Self { commands }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let commands = settings
            .task
            .iter()
            .map(|(id, task)| (id.clone(), task.cmd.clone()))
            .collect();
        Self { commands }
    }

    pub fn command_for(&self, task: &str) -> Option<&str> {
        self.commands.get(task).map(|s| s.as_str())
    }
}

impl Runner for CommandRunner {
    fn run<'a>(&'a mut self, request: TaskRequest<'a>) -> RunnerFuture<'a> {
        let cmd = self.commands.get(request.task_id()).cloned();
        Box::pin(async move {
            match cmd {
                Some(cmd) => run_command(&cmd, request).await,
                None => {
                    debug!(task = %request.task_id(), "no command configured; treating as success");
                    Ok(TaskReport::success())
                }
            }
        })
    }
}

async fn run_command(cmd: &str, request: TaskRequest<'_>) -> anyhow::Result<TaskReport> {
    let task = request.task_id();

    info!(
        task = %task,
        attempt = request.attempt,
        cmd = %cmd,
        "starting task process"
    );

    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    let context_json = serde_json::to_string(request.context)
        .with_context(|| format!("serializing context for task '{task}'"))?;

    command
        .env(ENV_TASK, task)
        .env(ENV_ATTEMPT, request.attempt.to_string())
        .env(ENV_CONTEXT, context_json)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match request.previous_error {
        Some(err) => {
            command.env(ENV_PREVIOUS_ERROR, err);
        }
        None => {
            command.env_remove(ENV_PREVIOUS_ERROR);
        }
    }

    let output = command
        .output()
        .await
        .with_context(|| format!("running process for task '{task}'"))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    for line in stderr.lines() {
        debug!(task = %task, "stderr: {}", line);
    }

    let code = output.status.code().unwrap_or(-1);
    info!(
        task = %task,
        attempt = request.attempt,
        exit_code = code,
        success = output.status.success(),
        "task process exited"
    );

    if output.status.success() {
        let trimmed = stdout.trim();
        let report = if trimmed.is_empty() {
            TaskReport::success()
        } else {
            TaskReport::success().with_output(trimmed)
        };
        return Ok(report);
    }

    let detail = match stderr.lines().rev().find(|l| !l.trim().is_empty()) {
        Some(last) => format!("exit code {code}: {}", last.trim()),
        None => format!("exit code {code}"),
    };
    warn!(task = %task, attempt = request.attempt, detail = %detail, "task process failed");

    Ok(TaskReport::failure_with(detail))
}
