// tests/scheduler_steps.rs

use taskgraph::dag::{Readiness, Scheduler, TaskState};
use taskgraph::Status;
use taskgraph_test_utils::builders::{chain, diamond, GraphBuilder, TaskBuilder};
use taskgraph_test_utils::init_tracing;

#[test]
fn roots_are_ready_on_the_first_pass() {
    init_tracing();

    let graph = GraphBuilder::new()
        .with_root("x")
        .with_root("y")
        .with_task(TaskBuilder::new("z").after("x").build())
        .build();
    let mut scheduler = Scheduler::new(&graph);

    assert_eq!(scheduler.next_ready().as_deref(), Some("x"));
    assert_eq!(scheduler.next_ready().as_deref(), Some("y"));
    assert_eq!(scheduler.next_ready(), None);
    assert_eq!(scheduler.state_of("z"), Some(TaskState::Waiting));
}

#[test]
fn chain_releases_one_task_per_step() {
    init_tracing();

    let graph = chain();
    let mut scheduler = Scheduler::new(&graph);

    assert_eq!(scheduler.next_ready().as_deref(), Some("A"));

    let step = scheduler.record("A", Status::Success);
    assert_eq!(step.newly_ready, vec!["B".to_string()]);
    assert!(!step.run_just_finished);

    assert_eq!(scheduler.next_ready().as_deref(), Some("B"));
    let step = scheduler.record("B", Status::Success);
    assert_eq!(step.newly_ready, vec!["C".to_string()]);

    assert_eq!(scheduler.next_ready().as_deref(), Some("C"));
    let step = scheduler.record("C", Status::Success);
    assert!(step.newly_ready.is_empty());
    assert!(step.run_just_finished);
    assert!(scheduler.is_complete());
}

#[test]
fn diamond_join_waits_for_both_branches() {
    init_tracing();

    let graph = diamond();
    let mut scheduler = Scheduler::new(&graph);

    assert_eq!(scheduler.next_ready().as_deref(), Some("A"));
    let step = scheduler.record("A", Status::Success);
    assert_eq!(step.newly_ready, vec!["B".to_string(), "C".to_string()]);

    let step = scheduler.record("B", Status::Success);
    assert!(step.newly_ready.is_empty());
    assert_eq!(scheduler.state_of("D"), Some(TaskState::Waiting));
    assert_eq!(scheduler.evaluate("D"), Some(Readiness::Blocked));

    let step = scheduler.record("C", Status::Failure);
    assert_eq!(step.newly_ready, vec!["D".to_string()]);
    assert_eq!(scheduler.state_of("D"), Some(TaskState::Ready));
    assert_eq!(scheduler.evaluate("D"), Some(Readiness::Skip));
}

#[test]
fn recording_twice_keeps_first_status_and_releases_nothing() {
    init_tracing();

    let graph = chain();
    let mut scheduler = Scheduler::new(&graph);

    scheduler.record("A", Status::Failure);
    let step = scheduler.record("A", Status::Success);

    assert!(step.newly_ready.is_empty());
    assert_eq!(scheduler.ledger().get("A"), Some(Status::Failure));
    assert_eq!(scheduler.state_of("A"), Some(TaskState::Resolved(Status::Failure)));
}

#[test]
fn unknown_task_is_ignored() {
    init_tracing();

    let graph = chain();
    let mut scheduler = Scheduler::new(&graph);

    let step = scheduler.record("nope", Status::Success);
    assert!(step.newly_ready.is_empty());
    assert!(scheduler.ledger().is_empty());
    assert_eq!(scheduler.state_of("nope"), None);
    assert_eq!(scheduler.evaluate("nope"), None);
}

#[test]
fn unresolved_lists_tasks_in_declaration_order() {
    init_tracing();

    let graph = diamond();
    let mut scheduler = Scheduler::new(&graph);
    scheduler.record("A", Status::Success);
    scheduler.record("C", Status::Success);

    assert_eq!(scheduler.unresolved(), vec!["B".to_string(), "D".to_string()]);
}
