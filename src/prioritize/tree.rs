// Tree-mode prioritization loop
//
// The whole task tree travels to the collaborator and back every turn; the
// reply replaces the local tree wholesale. Resolution then picks the next
// leaf, auto-completing containers whose subtasks are all done.

use anyhow::{Context, Result};

use super::response::{parse_tree_response, TreeResponse};
use super::types::{LoopOutcome, LoopState, StateTracker};
use super::{read_progress_line, GREETING};
use crate::cli::{render_task, Console};
use crate::providers::Collaborator;
use crate::tasks::{resolve, Task};

pub struct TreeLoop<C, K> {
    collaborator: C,
    console: K,
    tasks: Vec<Task>,
    tracker: StateTracker,
    turns: usize,
}

impl<C: Collaborator, K: Console> TreeLoop<C, K> {
    pub fn new(collaborator: C, console: K, tasks: Vec<Task>) -> Self {
        Self {
            collaborator,
            console,
            tasks,
            tracker: StateTracker::new(),
            turns: 0,
        }
    }

    /// Current task tree (the latest collaborator version once running)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn state(&self) -> LoopState {
        self.tracker.state()
    }

    pub fn console(&self) -> &K {
        &self.console
    }

    pub fn into_parts(self) -> (C, K, Vec<Task>) {
        (self.collaborator, self.console, self.tasks)
    }

    /// Drive the conversation until every task is finished or input closes
    pub async fn run(&mut self) -> Result<LoopOutcome> {
        if self.tracker.state() != LoopState::Init {
            anyhow::bail!("Prioritization loop has already run");
        }

        self.console.show_greeting(GREETING);
        let mut outgoing = serde_json::to_string_pretty(&TreeResponse::opening(self.tasks.clone()))
            .context("Failed to serialize task list")?;
        self.tracker.go(LoopState::AwaitingResponse);

        loop {
            let raw = self
                .collaborator
                .say(&outgoing)
                .await
                .context("Collaborator request failed")?;
            self.turns += 1;

            let mut response = parse_tree_response(&raw)?;
            let resolution = resolve(&mut response.tasks);
            self.tasks = response.tasks;

            let next = resolution.next.as_ref().and_then(|path| {
                let lineage = path.lineage(&self.tasks);
                let (task, parents) = lineage.split_last()?;
                Some(render_task(task, parents))
            });

            let Some(rendered) = next else {
                tracing::info!("All tasks finished after {} turns", self.turns);
                self.console.show_feedback(&response.last_feedback_or_response);
                self.tracker.go(LoopState::Done);
                return Ok(self.outcome(true));
            };

            self.tracker.go(LoopState::PresentingTask);
            self.console.show_feedback(&response.last_feedback_or_response);
            self.console.show_next_task(&rendered);

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
