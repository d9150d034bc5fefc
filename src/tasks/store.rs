// Task store: loads the task list from disk once at startup

use std::fs;
use std::path::Path;
use tracing::debug;

use super::model::{Task, TaskList};
use crate::errors::TaskError;

/// Load a nested task tree from a JSON array file
pub fn load_tree(path: &Path) -> Result<Vec<Task>, TaskError> {
    let contents = fs::read_to_string(path).map_err(|e| TaskError::io(path, e))?;
    let tasks = parse_tree(&contents).map_err(|message| TaskError::parse(path, message))?;
    debug!("Loaded {} top-level tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}

/// Load a flat task list: first non-empty line is the context, the rest are tasks
pub fn load_flat(path: &Path) -> Result<TaskList, TaskError> {
    let contents = fs::read_to_string(path).map_err(|e| TaskError::io(path, e))?;
    let list = parse_flat(&contents).map_err(|message| TaskError::parse(path, message))?;
    debug!(
        "Loaded {} tasks for \"{}\" from {}",
        list.tasks.len(),
        list.context,
        path.display()
    );
    Ok(list)
}

pub fn parse_tree(contents: &str) -> Result<Vec<Task>, String> {
    serde_json::from_str(contents).map_err(|e| e.to_string())
}

pub fn parse_flat(contents: &str) -> Result<TaskList, String> {
    let mut lines = contents.lines().map(str::trim).filter(|l| !l.is_empty());

    let context = lines
        .next()
        .ok_or_else(|| "file has no context line".to_string())?;
    let tasks = lines.map(str::to_string).collect();

    Ok(TaskList::new(context, tasks))
}
