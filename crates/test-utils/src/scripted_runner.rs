use std::collections::{HashMap, VecDeque};

use anyhow::anyhow;
use taskgraph::engine::TaskName;
use taskgraph::exec::{Runner, RunnerFuture, TaskReport, TaskRequest};

/// What the scripted runner does for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Succeed,
    SucceedWith(String),
    /// Failure without detail.
    Fail,
    FailWith(String),
    /// Runner fault: `run` returns `Err`.
    Fault(String),
    /// The returned future panics with this message.
    Panic(String),
}

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub task: TaskName,
    pub attempt: u32,
    pub max_attempts: u32,
    pub previous_error: Option<String>,
    /// `(task, output)` pairs visible in the context snapshot.
    pub context: Vec<(TaskName, String)>,
}

/// A fake runner that:
/// - plays back a per-task script of steps (then falls back to a default)
/// - records every request it receives.
#[derive(Debug, Clone)]
pub struct ScriptedRunner {
    scripts: HashMap<TaskName, VecDeque<Step>>,
    default: Step,
    calls: Vec<RecordedCall>,
}

impl ScriptedRunner {
    /// Every unscripted attempt succeeds.
    pub fn new() -> Self {
        Self::with_default(Step::Succeed)
    }

    pub fn with_default(default: Step) -> Self {
        Self {
            scripts: HashMap::new(),
            default,
            calls: Vec::new(),
        }
    }

    /// Every unscripted attempt fails with `detail`.
    pub fn always_failing(detail: &str) -> Self {
        Self::with_default(Step::FailWith(detail.to_string()))
    }

    /// Queue `steps` for `task`; once they run out the default applies.
    pub fn script<I>(mut self, task: &str, steps: I) -> Self
    where
        I: IntoIterator<Item = Step>,
    {
        self.scripts
            .entry(task.to_string())
            .or_default()
            .extend(steps);
        self
    }

    /// Shorthand: `task` fails on every attempt.
    pub fn failing(self, task: &str) -> Self {
        self.script(task, std::iter::repeat_n(Step::FailWith(format!("{task} failed")), 64))
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    pub fn calls_for(&self, task: &str) -> Vec<&RecordedCall> {
        self.calls.iter().filter(|c| c.task == task).collect()
    }

    /// Task ids in invocation order, with repeats for retries.
    pub fn invoked(&self) -> Vec<TaskName> {
        self.calls.iter().map(|c| c.task.clone()).collect()
    }

    /// Distinct task ids in first-invocation order.
    pub fn invoked_once(&self) -> Vec<TaskName> {
        let mut seen = Vec::new();
        for call in self.calls.iter() {
            if !seen.contains(&call.task) {
                seen.push(call.task.clone());
            }
        }
        seen
    }

    pub fn was_invoked(&self, task: &str) -> bool {
        self.calls.iter().any(|c| c.task == task)
    }

    fn next_step(&mut self, task: &str) -> Step {
        self.scripts
            .get_mut(task)
            .and_then(|steps| steps.pop_front())
            .unwrap_or_else(|| self.default.clone())
    }
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner for ScriptedRunner {
    fn run<'a>(&'a mut self, request: TaskRequest<'a>) -> RunnerFuture<'a> {
        self.calls.push(RecordedCall {
            task: request.task_id().to_string(),
            attempt: request.attempt,
            max_attempts: request.max_attempts,
            previous_error: request.previous_error.map(str::to_string),
            context: request
                .context
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let step = self.next_step(request.task_id());

        Box::pin(async move {
            match step {
                Step::Succeed => Ok(TaskReport::success()),
                Step::SucceedWith(output) => Ok(TaskReport::success().with_output(output)),
                Step::Fail => Ok(TaskReport::failure()),
                Step::FailWith(detail) => Ok(TaskReport::failure_with(detail)),
                Step::Fault(msg) => Err(anyhow!(msg)),
                Step::Panic(msg) => panic!("{msg}"),
            }
        })
    }
}
