// tests/error_handling.rs

use std::io::Write;

use tempfile::NamedTempFile;
use taskgraph::config::loader::extract_json;
use taskgraph::config::{graph_from_str, load_and_validate, load_settings};
use taskgraph::engine::ExecuteOptions;
use taskgraph::errors::TaskgraphError;
use taskgraph::execute;
use taskgraph::RunOn;
use taskgraph_test_utils::builders::{GraphBuilder, TaskBuilder};
use taskgraph_test_utils::scripted_runner::ScriptedRunner;

fn graph_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_dag_cycle_returns_structured_error() {
    let file = graph_file(
        r#"{"tasks": [
            {"id": "A", "depends_on": ["B"]},
            {"id": "B", "depends_on": ["A"]}
        ]}"#,
    );

    match load_and_validate(file.path()) {
        Err(TaskgraphError::DagCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains("A") || msg.contains("B"));
        }
        Err(e) => panic!("Expected DagCycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_unknown_dependency_returns_config_error() {
    let file = graph_file(r#"{"tasks": [{"id": "A", "depends_on": ["NonExistent"]}]}"#);

    match load_and_validate(file.path()) {
        Err(TaskgraphError::ConfigError(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("NonExistent"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_self_dependency_is_rejected() {
    let result = graph_from_str(r#"{"tasks": [{"id": "A", "depends_on": ["A"]}]}"#);
    match result {
        Err(TaskgraphError::ConfigError(msg)) => assert!(msg.contains("itself")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let result = graph_from_str(r#"{"tasks": [{"id": "A"}, {"id": "A"}]}"#);
    match result {
        Err(TaskgraphError::ConfigError(msg)) => assert!(msg.contains("duplicate")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_empty_graph_is_rejected() {
    assert!(matches!(
        graph_from_str(r#"{"tasks": []}"#),
        Err(TaskgraphError::ConfigError(_))
    ));
}

#[test]
fn test_invalid_run_on_is_a_parse_error() {
    let result = graph_from_str(r#"{"tasks": [{"id": "A", "run_on": "sometimes"}]}"#);
    assert!(matches!(result, Err(TaskgraphError::JsonError(_))));
}

#[test]
fn test_defaults_for_omitted_fields() {
    let graph = graph_from_str(r#"{"tasks": [{"id": "A"}, {"id": "B", "depends_on": ["A"], "run_on": "always"}]}"#)
        .unwrap();

    let a = graph.get("A").unwrap();
    assert!(a.depends_on.is_empty());
    assert_eq!(a.run_on, RunOn::Success);
    assert_eq!(graph.get("B").unwrap().run_on, RunOn::Always);
}

#[test]
fn test_fenced_json_is_accepted() {
    let text = "Here is the graph:\n```json\n{\"tasks\": [{\"id\": \"a\", \"depends_on\": []}]}\n```\nDone.";
    assert_eq!(
        extract_json(text),
        "{\"tasks\": [{\"id\": \"a\", \"depends_on\": []}]}"
    );

    let graph = graph_from_str(text).unwrap();
    assert_eq!(graph.ids().collect::<Vec<_>>(), vec!["a"]);

    let plain = r#"{"tasks": []}"#;
    assert_eq!(extract_json(plain), plain);
}

#[test]
fn test_missing_file_is_io_error() {
    let result = load_and_validate("/definitely/not/here/graph.json");
    assert!(matches!(result, Err(TaskgraphError::IoError(_))));
}

#[test]
fn test_settings_reject_zero_max_retries() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[config]\nmax_retries = 0\n").unwrap();

    match load_settings(file.path()) {
        Err(TaskgraphError::ConfigError(msg)) => assert!(msg.contains("max_retries")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_settings_defaults_and_commands() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[task.build]\ncmd = \"echo building\"\n").unwrap();

    let settings = load_settings(file.path()).unwrap();
    assert_eq!(settings.config.max_retries, 3);
    assert_eq!(settings.config.context_limit, 200);
    assert_eq!(settings.command_for("build"), Some("echo building"));
    assert_eq!(settings.command_for("test"), None);

    let options = ExecuteOptions::from(&settings);
    assert_eq!(options, ExecuteOptions::default());
}

#[test]
fn test_invalid_toml_is_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[config\nmax_retries = ").unwrap();
    assert!(matches!(load_settings(file.path()), Err(TaskgraphError::TomlError(_))));
}

#[tokio::test]
async fn test_unvalidated_dangling_dependency_is_unsatisfiable() {
    let graph = GraphBuilder::new()
        .with_root("a")
        .with_task(TaskBuilder::new("b").after("ghost").build())
        .with_task(TaskBuilder::new("c").after("b").build())
        .build_unchecked();
    let mut runner = ScriptedRunner::new();

    match execute(&graph, &mut runner, &ExecuteOptions::default()).await {
        Err(TaskgraphError::UnsatisfiableGraph(tasks)) => {
            assert_eq!(tasks, vec!["b".to_string(), "c".to_string()]);
        }
        other => panic!("Expected UnsatisfiableGraph, got: {:?}", other),
    }
    assert_eq!(runner.invoked(), vec!["a".to_string()]);
}

#[tokio::test]
async fn test_unvalidated_cycle_is_unsatisfiable() {
    let graph = GraphBuilder::new()
        .with_task(TaskBuilder::new("x").after("y").build())
        .with_task(TaskBuilder::new("y").after("x").build())
        .build_unchecked();
    let mut runner = ScriptedRunner::new();

    let result = execute(&graph, &mut runner, &ExecuteOptions::default()).await;
    assert!(matches!(result, Err(TaskgraphError::UnsatisfiableGraph(_))));
    assert!(runner.calls().is_empty());
}
