// Plain-text rendering of tasks for the console

use crate::tasks::Task;

/// Render the next task, with its enclosing tasks (outermost first) as a breadcrumb
pub fn render_task(task: &Task, parents: &[&Task]) -> String {
    let mut out = task.task.clone();

    if !parents.is_empty() {
        let trail: Vec<&str> = parents.iter().map(|p| p.task.as_str()).collect();
        out.push_str(&format!("\n  part of: {}", trail.join(" › ")));
        if let Some(parent) = parents.last() {
            out.push_str(&format!(
                " ({} of {} subtasks left)",
                parent.pending_subtasks(),
                parent.subtasks.len()
            ));
        }
    }

    let details: Vec<String> = [
        ("deadline", &task.deadline),
        ("estimate", &task.estimated_time),
        ("spent so far", &task.actual_time),
    ]
    .iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(label, value)| format!("{label}: {value}"))
    .collect();

    if !details.is_empty() {
        out.push_str(&format!("\n  {}", details.join(" | ")));
    }

    out
}
