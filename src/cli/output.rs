use serde::Serialize;

use crate::model::task::{Task, TaskKind};
use crate::ops::{Numbered, Outcome};
use crate::parse::when;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub index: usize,
    pub kind: &'static str,
    pub done: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

#[derive(Serialize)]
pub struct MessageJson {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(index: usize, task: &Task) -> TaskJson {
    let (due, start, end) = match &task.kind {
        TaskKind::Todo => (None, None, None),
        TaskKind::Deadline { due } => (Some(when::to_storage_form(due)), None, None),
        TaskKind::Event { start, end } => (
            None,
            Some(when::to_storage_form(start)),
            Some(when::to_storage_form(end)),
        ),
    };
    TaskJson {
        index,
        kind: task.kind.name(),
        done: task.done,
        description: task.description.clone(),
        due,
        start,
        end,
    }
}

fn numbered_to_json(tasks: &[Numbered]) -> Vec<TaskJson> {
    tasks
        .iter()
        .map(|n| task_to_json(n.number, &n.task))
        .collect()
}

/// JSON rendering of an outcome: listings become an array of tasks,
/// everything else a `{"message": ...}` object.
pub fn outcome_to_json(outcome: &Outcome) -> serde_json::Result<String> {
    match outcome {
        Outcome::List { tasks } => serde_json::to_string_pretty(&numbered_to_json(tasks)),
        Outcome::Found { matches, .. } | Outcome::On { matches, .. } => {
            serde_json::to_string_pretty(&numbered_to_json(matches))
        }
        _ => message_json(&format_outcome(outcome).join("\n")),
    }
}

pub fn message_json(message: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&MessageJson {
        message: message.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task, e.g. `[D][X] return book (by: Sep 5 2025 18:00)`
pub fn format_task_line(task: &Task) -> String {
    let head = format!(
        "[{}][{}] {}",
        task.kind.tag(),
        task.status_char(),
        task.description
    );
    match &task.kind {
        TaskKind::Todo => head,
        TaskKind::Deadline { due } => format!("{} (by: {})", head, when::display(due)),
        TaskKind::Event { start, end } => format!(
            "{} (from: {} to: {})",
            head,
            when::display(start),
            when::display(end)
        ),
    }
}

fn format_numbered(tasks: &[Numbered]) -> impl Iterator<Item = String> + '_ {
    tasks
        .iter()
        .map(|n| format!(" {}.{}", n.number, format_task_line(&n.task)))
}

fn count_line(count: usize) -> String {
    format!("Now you have {} tasks in the list.", count)
}

/// The lines reported for an outcome
pub fn format_outcome(outcome: &Outcome) -> Vec<String> {
    let mut lines = Vec::new();
    match outcome {
        Outcome::Exit => lines.push("Bye. Hope to see you again soon!".to_string()),
        Outcome::List { tasks } if tasks.is_empty() => {
            lines.push("Your task list is empty.".to_string())
        }
        Outcome::List { tasks } => {
            lines.push("Here are the tasks in your list:".to_string());
            lines.extend(format_numbered(tasks));
        }
        Outcome::Added { task, count } => {
            lines.push("Got it. I've added this task:".to_string());
            lines.push(format!("  {}", format_task_line(task)));
            lines.push(count_line(*count));
        }
        Outcome::Marked { task, .. } => {
            lines.push("Nice! I've marked this task as done:".to_string());
            lines.push(format!("  {}", format_task_line(task)));
        }
        Outcome::Unmarked { task, .. } => {
            lines.push("OK, I've marked this task as not done yet:".to_string());
            lines.push(format!("  {}", format_task_line(task)));
        }
        Outcome::Deleted { task, count } => {
            lines.push("Noted. I've removed this task:".to_string());
            lines.push(format!("  {}", format_task_line(task)));
            lines.push(count_line(*count));
        }
        Outcome::Cleared { removed } => {
            lines.push(format!("Okay! I've cleared all {} tasks.", removed));
            lines.push(count_line(0));
        }
        Outcome::Found { matches, .. } if matches.is_empty() => {
            lines.push("No matching tasks found.".to_string())
        }
        Outcome::Found { matches, .. } => {
            lines.push("Here are the matching tasks in your list:".to_string());
            lines.extend(format_numbered(matches));
        }
        Outcome::On { date, matches } if matches.is_empty() => {
            lines.push(format!("No deadlines/events on {}", when::display_date(date)))
        }
        Outcome::On { date, matches } => {
            lines.push(format!("On {}:", when::display_date(date)));
            lines.extend(format_numbered(matches));
        }
    }
    lines
}

pub fn format_corrupted(count: usize) -> String {
    format!("Some saved lines were corrupted and were skipped: {}", count)
}
