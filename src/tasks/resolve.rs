// Next-task resolution
//
// Finds the single task the user should work on next. Walks the tree in order,
// descending into the first unfinished container; a container whose subtasks
// are all finished is auto-completed and the walk moves on to its next sibling.
//
// Runs in two phases: `plan_resolution` inspects the tree without touching it
// and records which containers to auto-complete, then `Resolution::apply`
// performs those writes.

use tracing::debug;

use super::model::{Task, TaskPath};

/// Outcome of inspecting a task tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Path of the next actionable task, if anything is pending
    pub next: Option<TaskPath>,
    /// Containers to mark finished, innermost first
    pub auto_completed: Vec<TaskPath>,
}

impl Resolution {
    pub fn is_done(&self) -> bool {
        self.next.is_none()
    }

    /// Mark every auto-completed container as finished
    pub fn apply(&self, tasks: &mut [Task]) {
        for path in &self.auto_completed {
            if let Some(task) = path.get_mut(tasks) {
                debug!("Auto-completing \"{}\" ({}): all subtasks finished", task.task, path);
                task.finished = true;
            }
        }
    }
}

/// Phase one: find the next task and the containers to auto-complete
pub fn plan_resolution(tasks: &[Task]) -> Resolution {
    let mut auto_completed = Vec::new();
    let next = search(tasks, None, &mut auto_completed);
    Resolution {
        next,
        auto_completed,
    }
}

fn search(tasks: &[Task], parent: Option<&TaskPath>, completed: &mut Vec<TaskPath>) -> Option<TaskPath> {
    for (idx, task) in tasks.iter().enumerate() {
        if task.finished {
            continue;
        }

        let path = match parent {
            Some(p) => p.child(idx),
            None => TaskPath::root(idx),
        };

        if task.is_leaf() {
            return Some(path);
        }

        if let Some(found) = search(&task.subtasks, Some(&path), completed) {
            return Some(found);
        }

        completed.push(path);
    }

    None
}

/// Run both phases, leaving auto-completions applied to `tasks`
pub fn resolve(tasks: &mut [Task]) -> Resolution {
    let resolution = plan_resolution(tasks);
    resolution.apply(tasks);
    resolution
}

/// Resolve and return the next actionable task, if any
pub fn next_task(tasks: &mut [Task]) -> Option<&Task> {
    let resolution = resolve(tasks);
    let tasks: &[Task] = tasks;
    resolution.next.as_ref().and_then(|path| path.get(tasks))
}
