// Task data model: nested task tree and flat task list

use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit of work with optional nested subtasks
///
/// Field names match the JSON the collaborator is asked to produce, so the
/// same type is used for the input file and for every round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task name
    pub task: String,

    /// Free-form deadline (e.g. "end of September")
    #[serde(default)]
    pub deadline: String,

    /// Free-form duration estimate (e.g. "3h", "30d")
    #[serde(default)]
    pub estimated_time: String,

    #[serde(default)]
    pub finished: bool,

    /// Free-form time actually spent so far
    #[serde(default)]
    pub actual_time: String,

    #[serde(default)]
    pub subtasks: Vec<Task>,
}

impl Task {
    /// Create an unfinished leaf task with empty time fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            task: name.into(),
            deadline: String::new(),
            estimated_time: String::new(),
            finished: false,
            actual_time: String::new(),
            subtasks: Vec::new(),
        }
    }

    pub fn with_subtasks(mut self, subtasks: Vec<Task>) -> Self {
        self.subtasks = subtasks;
        self
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = deadline.into();
        self
    }

    pub fn with_estimate(mut self, estimated_time: impl Into<String>) -> Self {
        self.estimated_time = estimated_time.into();
        self
    }

    pub fn finished(mut self) -> Self {
        self.finished = true;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.subtasks.is_empty()
    }

    /// Number of direct subtasks not yet finished
    pub fn pending_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|t| !t.finished).count()
    }
}

/// Flat task list: one overarching goal plus task descriptions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub context: String,
    pub tasks: Vec<String>,
}

impl TaskList {
    pub fn new(context: impl Into<String>, tasks: Vec<String>) -> Self {
        Self {
            context: context.into(),
            tasks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Location of a task in a tree: child indices from the top level down
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TaskPath(Vec<usize>);

impl TaskPath {
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    /// Path of the `index`-th subtask of the task at this path
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Follow this path through `tasks`
    pub fn get<'a>(&self, tasks: &'a [Task]) -> Option<&'a Task> {
        let (first, rest) = self.0.split_first()?;
        let mut current = tasks.get(*first)?;
        for &idx in rest {
            current = current.subtasks.get(idx)?;
        }
        Some(current)
    }

    /// Every task along this path, outermost first; stops at the first bad index
    pub fn lineage<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let mut lineage = Vec::with_capacity(self.0.len());
        let mut level = tasks;
        for &idx in &self.0 {
            match level.get(idx) {
                Some(task) => {
                    lineage.push(task);
                    level = &task.subtasks;
                }
                None => break,
            }
        }
        lineage
    }

    pub fn get_mut<'a>(&self, tasks: &'a mut [Task]) -> Option<&'a mut Task> {
        let (first, rest) = self.0.split_first()?;
        let mut current = tasks.get_mut(*first)?;
        for &idx in rest {
            current = current.subtasks.get_mut(idx)?;
        }
        Some(current)
    }
}

impl From<Vec<usize>> for TaskPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for TaskPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| (i + 1).to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}
