// End-to-end tests for the prioritization loops with a scripted collaborator

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::io::Write;

use tasklark::cli::ScriptedConsole;
use tasklark::errors::TaskError;
use tasklark::prioritize::{
    prioritize_file, FlatLoop, LoopState, Mode, TreeLoop, TreeResponse, GREETING, PROGRESS_PROMPT,
};
use tasklark::providers::Collaborator;
use tasklark::tasks::{Task, TaskList};

/// Replays canned replies and records every message it was sent
#[derive(Default)]
struct ScriptedCollaborator {
    replies: VecDeque<String>,
    sent: Vec<String>,
}

impl ScriptedCollaborator {
    fn new<I: IntoIterator<Item = String>>(replies: I) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            sent: Vec::new(),
        }
    }
}

#[async_trait]
impl Collaborator for ScriptedCollaborator {
    async fn say(&mut self, message: &str) -> Result<String> {
        self.sent.push(message.to_string());
        self.replies
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("collaborator has no reply scripted"))
    }
}

fn tree_reply(feedback: &str, tasks: serde_json::Value) -> String {
    json!({ "last_feedback_or_response": feedback, "tasks": tasks }).to_string()
}

fn flat_reply(feedback: &str, prioritized: &[&str], completed: &[&str]) -> String {
    json!({
        "feedback_or_response": feedback,
        "prioritized_tasks": prioritized,
        "completed_tasks": completed,
    })
    .to_string()
}

fn thesis() -> Vec<Task> {
    vec![Task::new("write thesis").with_subtasks(vec![
        Task::new("gather results"),
        Task::new("draft intro"),
    ])]
}

// ─── tree mode ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tree_loop_runs_until_cascade_finishes() {
    let collaborator = ScriptedCollaborator::new([
        tree_reply(
            "Start with the results.",
            json!([{"task": "write thesis", "subtasks": [
                {"task": "gather results"},
                {"task": "draft intro"}
            ]}]),
        ),
        tree_reply(
            "Nice, onto the intro.",
            json!([{"task": "write thesis", "subtasks": [
                {"task": "gather results", "finished": true, "actual_time": "4h"},
                {"task": "draft intro"}
            ]}]),
        ),
        tree_reply(
            "All done, well earned!",
            json!([{"task": "write thesis", "subtasks": [
                {"task": "gather results", "finished": true},
                {"task": "draft intro", "finished": true}
            ]}]),
        ),
    ]);
    let console = ScriptedConsole::new(["results are in, took 4h", "intro drafted"]);

    let mut tree_loop = TreeLoop::new(collaborator, console, thesis());
    let outcome = tree_loop.run().await.unwrap();

    assert!(outcome.finished);
    assert_eq!(outcome.turns, 3);
    assert_eq!(tree_loop.state(), LoopState::Done);
    // Container was auto-completed locally
    assert!(tree_loop.tasks()[0].finished);

    let (collaborator, console, _) = tree_loop.into_parts();

    // Opening message is the serialized empty-feedback response
    let opening: TreeResponse = serde_json::from_str(&collaborator.sent[0]).unwrap();
    assert_eq!(opening, TreeResponse::opening(thesis()));
    // Progress is forwarded verbatim
    assert_eq!(&collaborator.sent[1..], ["results are in, took 4h", "intro drafted"]);

    assert_eq!(console.greetings, vec![GREETING]);
    assert_eq!(
        console.feedback,
        vec!["Start with the results.", "Nice, onto the intro.", "All done, well earned!"]
    );
    assert_eq!(console.next_tasks.len(), 2);
    assert!(console.next_tasks[0].starts_with("gather results"));
    assert!(console.next_tasks[0].contains("part of: write thesis"));
    assert!(console.next_tasks[1].starts_with("draft intro"));
    assert_eq!(console.prompts, vec![PROGRESS_PROMPT, PROGRESS_PROMPT]);
}

#[tokio::test]
async fn test_tree_loop_parent_of_finished_child_finishes_immediately() {
    let collaborator = ScriptedCollaborator::new([tree_reply(
        "Looks like you're already done.",
        json!([{"task": "A", "finished": false, "subtasks": [{"task": "A1", "finished": true, "subtasks": []}]}]),
    )]);
    let console = ScriptedConsole::new(Vec::<String>::new());

    let mut tree_loop = TreeLoop::new(collaborator, console, vec![Task::new("A")]);
    let outcome = tree_loop.run().await.unwrap();

    assert!(outcome.finished);
    assert_eq!(outcome.turns, 1);
    assert!(tree_loop.tasks()[0].finished);
    assert!(tree_loop.console().prompts.is_empty());
    assert!(tree_loop.console().next_tasks.is_empty());
}

#[tokio::test]
async fn test_tree_loop_accepts_fenced_reply() {
    let reply = format!(
        "```json\n{}\n```",
        tree_reply("Go!", json!([{"task": "call mom"}]))
    );
    let collaborator = ScriptedCollaborator::new([reply]);
    let console = ScriptedConsole::new(Vec::<String>::new());

    let mut tree_loop = TreeLoop::new(collaborator, console, vec![Task::new("call mom")]);
    let outcome = tree_loop.run().await.unwrap();

    // Input closed at the first prompt
    assert!(!outcome.finished);
    assert_eq!(tree_loop.console().next_tasks, vec!["call mom"]);
}

#[tokio::test]
async fn test_tree_loop_invalid_reply_is_fatal() {
    let collaborator = ScriptedCollaborator::new(["Sure, here is your plan: do the thing.".to_string()]);
    let console = ScriptedConsole::new(["unused"]);

    let mut tree_loop = TreeLoop::new(collaborator, console, thesis());
    let err = tree_loop.run().await.unwrap_err();

    match err.downcast_ref::<TaskError>() {
        Some(TaskError::InvalidResponse { raw, .. }) => assert!(raw.contains("do the thing")),
        other => panic!("expected InvalidResponse, got {other:?}"),
    }
    assert_eq!(tree_loop.console().remaining_inputs(), 1);
}

#[tokio::test]
async fn test_tree_loop_collaborator_failure_propagates() {
    let collaborator = ScriptedCollaborator::new(Vec::<String>::new());
    let console = ScriptedConsole::new(Vec::<String>::new());

    let mut tree_loop = TreeLoop::new(collaborator, console, thesis());
    let err = tree_loop.run().await.unwrap_err();
    assert!(format!("{err:#}").contains("no reply scripted"));
}

#[tokio::test]
async fn test_tree_loop_cannot_run_twice() {
    let collaborator = ScriptedCollaborator::new([tree_reply("done", json!([]))]);
    let mut tree_loop = TreeLoop::new(collaborator, ScriptedConsole::default(), vec![]);

    assert!(tree_loop.run().await.unwrap().finished);
    assert!(tree_loop.run().await.is_err());
}

// ─── flat mode ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_flat_loop_runs_until_list_empty() {
    let collaborator = ScriptedCollaborator::new([
        flat_reply("Code first.", &["write code", "write tests"], &[]),
        flat_reply("Tests next.", &["write tests"], &["write code"]),
        flat_reply("Shipped!", &[], &["write code", "write tests"]),
    ]);
    let console = ScriptedConsole::new(["code is done", "tests pass"]);
    let list = TaskList::new("Ship v1", vec!["write code".into(), "write tests".into()]);

    let mut flat_loop = FlatLoop::new(collaborator, console, list);
    let outcome = flat_loop.run().await.unwrap();

    assert!(outcome.finished);
    assert_eq!(outcome.turns, 3);
    assert!(flat_loop.list().is_empty());
    assert_eq!(flat_loop.completed(), ["write code", "write tests"]);

    let (collaborator, console, list) = flat_loop.into_parts();
    assert_eq!(list.context, "Ship v1");
    assert!(collaborator.sent[0].contains("Ship v1"));
    assert!(collaborator.sent[0].contains("1. write code"));
    assert_eq!(&collaborator.sent[1..], ["code is done", "tests pass"]);
    assert_eq!(console.next_tasks, vec!["write code", "write tests"]);
    assert_eq!(console.feedback.last().map(String::as_str), Some("Shipped!"));
}

#[tokio::test]
async fn test_flat_loop_reply_missing_list_is_fatal() {
    let collaborator = ScriptedCollaborator::new([r#"{"feedback_or_response": "hi"}"#.to_string()]);
    let list = TaskList::new("Goal", vec!["one".into()]);

    let mut flat_loop = FlatLoop::new(collaborator, ScriptedConsole::default(), list);
    let err = flat_loop.run().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TaskError>(),
        Some(TaskError::InvalidResponse { .. })
    ));
}

#[tokio::test]
async fn test_prioritize_file_flat_mode() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"Ship v1\nwrite code\nwrite tests\n").unwrap();

    let mut collaborator = ScriptedCollaborator::new([flat_reply("Nothing left.", &[], &[])]);
    let outcome = prioritize_file(
        Mode::Flat,
        file.path(),
        &mut collaborator,
        ScriptedConsole::default(),
    )
    .await
    .unwrap();

    assert!(outcome.finished);
    assert!(collaborator.sent[0].contains("2. write tests"));
}

#[tokio::test]
async fn test_prioritize_file_missing_tree_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = prioritize_file(
        Mode::Tree,
        &dir.path().join("tasks.json"),
        ScriptedCollaborator::default(),
        ScriptedConsole::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err.downcast_ref::<TaskError>(), Some(TaskError::Io { .. })));
}
