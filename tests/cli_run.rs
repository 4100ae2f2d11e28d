// tests/cli_run.rs

use std::error::Error;
use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;
use taskgraph::cli::CliArgs;
use taskgraph::{exit_code, run, Status, EXIT_TASK_FAILURE};
use taskgraph_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

const GRAPH: &str = r#"
```json
{"tasks": [
  {"id": "fetch", "depends_on": []},
  {"id": "build", "depends_on": ["fetch"]},
  {"id": "notify", "depends_on": ["build"], "run_on": "failure"},
  {"id": "cleanup", "depends_on": ["build"], "run_on": "always"}
]}
```
"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn args(graph: &NamedTempFile, settings: &NamedTempFile, extra: &[&str]) -> CliArgs {
    let graph = graph.path().display().to_string();
    let settings = settings.path().display().to_string();
    let mut argv = vec!["taskgraph", "--graph", &graph, "--config", &settings];
    argv.extend_from_slice(extra);
    CliArgs::parse_from(argv)
}

#[tokio::test]
async fn run_without_commands_succeeds_everything_but_failure_branch() -> TestResult {
    init_tracing();

    let graph = write_temp(GRAPH);
    let settings = write_temp("[config]\nmax_retries = 2\n");

    let ledger = with_timeout(run(args(&graph, &settings, &[]))).await?;
    let ledger = ledger.expect("not a dry run");

    assert_eq!(ledger.get("fetch"), Some(Status::Success));
    assert_eq!(ledger.get("build"), Some(Status::Success));
    assert_eq!(ledger.get("notify"), Some(Status::Skipped));
    assert_eq!(ledger.get("cleanup"), Some(Status::Success));
    assert_eq!(exit_code(Some(&ledger)), 0);
    Ok(())
}

#[tokio::test]
async fn forced_failure_flips_conditional_branches() -> TestResult {
    init_tracing();

    let graph = write_temp(GRAPH);
    let settings = write_temp("");

    let ledger = with_timeout(run(args(&graph, &settings, &["--fail", "build", "--json"])))
        .await?
        .expect("not a dry run");

    assert_eq!(ledger.get("build"), Some(Status::Failure));
    assert_eq!(ledger.get("notify"), Some(Status::Success));
    assert_eq!(ledger.get("cleanup"), Some(Status::Success));
    assert_eq!(exit_code(Some(&ledger)), EXIT_TASK_FAILURE);
    Ok(())
}

#[tokio::test]
async fn dry_run_executes_nothing() -> TestResult {
    init_tracing();

    let graph = write_temp(GRAPH);
    let settings = write_temp("[task.build]\ncmd = \"exit 1\"\n");

    let ledger = with_timeout(run(args(&graph, &settings, &["--dry-run"]))).await?;

    assert!(ledger.is_none());
    assert_eq!(exit_code(ledger.as_ref()), 0);
    Ok(())
}

#[tokio::test]
async fn invalid_graph_is_reported_as_error() -> TestResult {
    init_tracing();

    let graph = write_temp(r#"{"tasks": [{"id": "a", "depends_on": ["missing"]}]}"#);
    let settings = write_temp("");

    let result = with_timeout(run(args(&graph, &settings, &[]))).await;
    let err = result.expect_err("dangling dependency must be rejected");
    assert!(format!("{err:#}").contains("unknown dependency"));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn configured_commands_drive_statuses() -> TestResult {
    init_tracing();

    let graph = write_temp(GRAPH);
    let settings = write_temp(
        "[config]\nmax_retries = 1\n\n[task.fetch]\ncmd = \"echo fetched\"\n\n[task.build]\ncmd = \"exit 7\"\n",
    );

    let ledger = with_timeout(run(args(&graph, &settings, &[])))
        .await?
        .expect("not a dry run");

    assert_eq!(ledger.get("fetch"), Some(Status::Success));
    assert_eq!(ledger.get("build"), Some(Status::Failure));
    assert_eq!(ledger.get("notify"), Some(Status::Success));
    Ok(())
}

#[test]
fn max_retries_flag_rejects_zero() {
    let parsed = CliArgs::try_parse_from(["taskgraph", "--graph", "g.json", "--max-retries", "0"]);
    assert!(parsed.is_err());
}
