// Collaborator reply types and validation

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::TaskError;
use crate::tasks::Task;

/// Tree-protocol message: feedback plus the complete task collection
///
/// Used both for the opening message (empty feedback) and for every reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeResponse {
    pub last_feedback_or_response: String,
    pub tasks: Vec<Task>,
}

impl TreeResponse {
    pub fn opening(tasks: Vec<Task>) -> Self {
        Self {
            last_feedback_or_response: String::new(),
            tasks,
        }
    }
}

/// Flat-protocol reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatResponse {
    pub feedback_or_response: String,
    pub prioritized_tasks: Vec<String>,
    #[serde(default)]
    pub completed_tasks: Vec<String>,
}

pub fn parse_tree_response(raw: &str) -> Result<TreeResponse, TaskError> {
    let response: TreeResponse = parse_json(raw)?;
    for (idx, task) in response.tasks.iter().enumerate() {
        check_task_names(task, &(idx + 1).to_string(), raw)?;
    }
    Ok(response)
}

pub fn parse_flat_response(raw: &str) -> Result<FlatResponse, TaskError> {
    let response: FlatResponse = parse_json(raw)?;
    for (field, list) in [
        ("prioritized_tasks", &response.prioritized_tasks),
        ("completed_tasks", &response.completed_tasks),
    ] {
        if let Some(idx) = list.iter().position(|t| t.trim().is_empty()) {
            return Err(TaskError::invalid_response(
                format!("{field}[{idx}] is blank"),
                raw,
            ));
        }
    }
    Ok(response)
}

fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, TaskError> {
    serde_json::from_str(extract_json(raw)).map_err(|e| TaskError::invalid_response(e.to_string(), raw))
}

fn check_task_names(task: &Task, label: &str, raw: &str) -> Result<(), TaskError> {
    if task.task.trim().is_empty() {
        return Err(TaskError::invalid_response(
            format!("task {label} has an empty name"),
            raw,
        ));
    }
    for (idx, sub) in task.subtasks.iter().enumerate() {
        check_task_names(sub, &format!("{label}.{}", idx + 1), raw)?;
    }
    Ok(())
}

/// Cut the JSON object out of a reply that may be wrapped in a code fence or prose
pub fn extract_json(raw: &str) -> &str {
    let body = strip_code_fence(raw.trim());

    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => body,
    }
}

/// Drop a leading ```/```json fence and everything from the closing fence on
fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    match rest.rfind("```") {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}
