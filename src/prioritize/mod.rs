// Prioritization loop
//
// Two protocols share one turn cycle: tree mode round-trips the full nested
// task tree as JSON, flat mode sends a goal plus plain task strings. Both send
// the user's progress updates verbatim and stop once nothing is pending.

pub mod flat;
pub mod prompts;
pub mod response;
pub mod tree;
pub mod types;

pub use flat::FlatLoop;
pub use prompts::{flat_initial_message, FLAT_SYSTEM_PROMPT, TREE_SYSTEM_PROMPT};
pub use response::{extract_json, parse_flat_response, parse_tree_response, FlatResponse, TreeResponse};
pub use tree::TreeLoop;
pub use types::{LoopOutcome, LoopState};

use anyhow::Result;
use std::path::Path;

use crate::cli::Console;
use crate::errors::TaskError;
use crate::providers::Collaborator;
use crate::tasks::{self, Task, TaskList};

pub const GREETING: &str = "Hi there. Let's prioritize your tasks.";
pub const PROGRESS_PROMPT: &str = "Update your progress on this task: ";

/// Task file format and the matching conversation protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Tree,
    Flat,
}

impl Mode {
    /// `.json` (any case) selects tree mode; everything else is flat
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Mode::Tree,
            _ => Mode::Flat,
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Mode::Tree => TREE_SYSTEM_PROMPT,
            Mode::Flat => FLAT_SYSTEM_PROMPT,
        }
    }
}

/// A task file loaded in one mode, ready to drive its loop
#[derive(Debug, Clone, PartialEq)]
pub enum TaskSource {
    Tree(Vec<Task>),
    Flat(TaskList),
}

impl TaskSource {
    pub fn load(mode: Mode, path: &Path) -> Result<Self, TaskError> {
        match mode {
            Mode::Tree => tasks::load_tree(path).map(TaskSource::Tree),
            Mode::Flat => tasks::load_flat(path).map(TaskSource::Flat),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            TaskSource::Tree(_) => Mode::Tree,
            TaskSource::Flat(_) => Mode::Flat,
        }
    }

    /// Run the matching loop to completion
    pub async fn run<C, K>(self, collaborator: C, console: K) -> Result<LoopOutcome>
    where
        C: Collaborator,
        K: Console,
    {
        match self {
            TaskSource::Tree(tasks) => TreeLoop::new(collaborator, console, tasks).run().await,
            TaskSource::Flat(list) => FlatLoop::new(collaborator, console, list).run().await,
        }
    }
}

/// Load `path` in the given mode and run the matching loop to completion
pub async fn prioritize_file<C, K>(mode: Mode, path: &Path, collaborator: C, console: K) -> Result<LoopOutcome>
where
    C: Collaborator,
    K: Console,
{
    TaskSource::load(mode, path)?.run(collaborator, console).await
}

/// Read one non-blank progress line; `None` once input is closed
pub(crate) fn read_progress_line<K: Console + ?Sized>(console: &mut K) -> Result<Option<String>> {
    loop {
        match console.read_progress(PROGRESS_PROMPT)? {
            Some(line) if line.trim().is_empty() => continue,
            other => return Ok(other),
        }
    }
}
