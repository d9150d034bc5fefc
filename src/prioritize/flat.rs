// Flat-mode prioritization loop
//
// The collaborator returns the remaining tasks in priority order plus the ones
// it considers done; the first remaining task is always the next one.

use anyhow::{Context, Result};

use super::prompts::flat_initial_message;
use super::response::parse_flat_response;
use super::types::{LoopOutcome, LoopState, StateTracker};
use super::{read_progress_line, GREETING};
use crate::cli::Console;
use crate::providers::Collaborator;
use crate::tasks::TaskList;

pub struct FlatLoop<C, K> {
    collaborator: C,
    console: K,
    list: TaskList,
    completed: Vec<String>,
    tracker: StateTracker,
    turns: usize,
}

impl<C: Collaborator, K: Console> FlatLoop<C, K> {
    pub fn new(collaborator: C, console: K, list: TaskList) -> Self {
        Self {
            collaborator,
            console,
            list,
            completed: Vec::new(),
            tracker: StateTracker::new(),
            turns: 0,
        }
    }

    /// Remaining tasks, in the collaborator's latest priority order
    pub fn list(&self) -> &TaskList {
        &self.list
    }

    /// Every task reported completed so far, in first-seen order
    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    pub fn state(&self) -> LoopState {
        self.tracker.state()
    }

    pub fn console(&self) -> &K {
        &self.console
    }

    pub fn into_parts(self) -> (C, K, TaskList) {
        (self.collaborator, self.console, self.list)
    }

    pub async fn run(&mut self) -> Result<LoopOutcome> {
        if self.tracker.state() != LoopState::Init {
            anyhow::bail!("Prioritization loop has already run");
        }

        self.console.show_greeting(GREETING);
        let mut outgoing = flat_initial_message(&self.list);
        self.tracker.go(LoopState::AwaitingResponse);

        loop {
            let raw = self
                .collaborator
                .say(&outgoing)
                .await
                .context("Collaborator request failed")?;
            self.turns += 1;

            let response = parse_flat_response(&raw)?;
            for task in response.completed_tasks {
                if !self.completed.contains(&task) {
                    self.completed.push(task);
                }
            }
            self.list.tasks = response.prioritized_tasks;

            let Some(next) = self.list.tasks.first().cloned() else {
                tracing::info!(
                    "All {} tasks finished after {} turns",
                    self.completed.len(),
                    self.turns
                );
                self.console.show_feedback(&response.feedback_or_response);
                self.tracker.go(LoopState::Done);
                return Ok(self.outcome(true));
            };

            self.tracker.go(LoopState::PresentingTask);
            self.console.show_feedback(&response.feedback_or_response);
            self.console.show_next_task(&next);

            self.tracker.go(LoopState::AwaitingUserInput);
            match read_progress_line(&mut self.console)? {
                Some(line) => {
                    outgoing = line;
                    self.tracker.go(LoopState::AwaitingResponse);
                }
                None => {
                    tracing::info!("Input closed after {} turns", self.turns);
                    self.tracker.go(LoopState::Done);
                    return Ok(self.outcome(false));
                }
            }
        }
    }

    fn outcome(&self, finished: bool) -> LoopOutcome {
        LoopOutcome {
            turns: self.turns,
            finished,
        }
    }
}
