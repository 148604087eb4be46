use crate::error::CommandError;
use crate::model::task::Task;
use crate::model::task_list::TaskList;

/// Append a task. Returns the new task count.
pub fn add_task(tasks: &mut TaskList, task: Task) -> usize {
    tasks.push(task);
    tasks.len()
}

/// Mark the task at a 1-based position as done.
pub fn mark_task(tasks: &mut TaskList, number: usize) -> Result<&Task, CommandError> {
    set_done(tasks, number, true)
}

/// Mark the task at a 1-based position as not done.
pub fn unmark_task(tasks: &mut TaskList, number: usize) -> Result<&Task, CommandError> {
    set_done(tasks, number, false)
}

/// Remove the task at a 1-based position. Later tasks move up by one.
pub fn delete_task(tasks: &mut TaskList, number: usize) -> Result<Task, CommandError> {
    let len = tasks.len();
    tasks
        .remove(number)
        .ok_or(CommandError::InvalidIndex { index: number, len })
}

/// Remove every task. Returns how many were removed.
pub fn clear_tasks(tasks: &mut TaskList) -> usize {
    let removed = tasks.len();
    tasks.clear();
    removed
}

fn set_done(tasks: &mut TaskList, number: usize, done: bool) -> Result<&Task, CommandError> {
    let len = tasks.len();
    let task = tasks
        .get_mut(number)
        .ok_or(CommandError::InvalidIndex { index: number, len })?;
    task.done = done;
    Ok(task)
}
