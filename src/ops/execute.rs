use chrono::NaiveDate;

use crate::error::CommandError;
use crate::model::task::Task;
use crate::model::task_list::TaskList;
use crate::ops::{search, task_ops};
use crate::parse::Command;

/// A task paired with its 1-based position in the full list
#[derive(Debug, Clone, PartialEq)]
pub struct Numbered {
    pub number: usize,
    pub task: Task,
}

impl Numbered {
    fn collect<'a>(hits: impl IntoIterator<Item = (usize, &'a Task)>) -> Vec<Numbered> {
        hits.into_iter()
            .map(|(number, task)| Numbered {
                number,
                task: task.clone(),
            })
            .collect()
    }
}

/// What a successfully executed command produced, before rendering
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Exit,
    List { tasks: Vec<Numbered> },
    Added { task: Task, count: usize },
    Marked { number: usize, task: Task },
    Unmarked { number: usize, task: Task },
    Deleted { task: Task, count: usize },
    Cleared { removed: usize },
    Found { keyword: String, matches: Vec<Numbered> },
    On { date: NaiveDate, matches: Vec<Numbered> },
}

/// Apply a parsed command to the list. On error the list is unchanged.
pub fn execute(command: Command, tasks: &mut TaskList) -> Result<Outcome, CommandError> {
    let outcome = match command {
        Command::Exit => Outcome::Exit,
        Command::List => Outcome::List {
            tasks: Numbered::collect(tasks.numbered()),
        },
        Command::Clear => Outcome::Cleared {
            removed: task_ops::clear_tasks(tasks),
        },
        Command::Add(task) => {
            let count = task_ops::add_task(tasks, task.clone());
            Outcome::Added { task, count }
        }
        Command::Mark(number) => Outcome::Marked {
            number,
            task: task_ops::mark_task(tasks, number)?.clone(),
        },
        Command::Unmark(number) => Outcome::Unmarked {
            number,
            task: task_ops::unmark_task(tasks, number)?.clone(),
        },
        Command::Delete(number) => {
            let task = task_ops::delete_task(tasks, number)?;
            Outcome::Deleted {
                task,
                count: tasks.len(),
            }
        }
        Command::Find(keyword) => {
            let matches = Numbered::collect(search::find_tasks(tasks, &keyword));
            Outcome::Found { keyword, matches }
        }
        Command::On(date) => Outcome::On {
            date,
            matches: Numbered::collect(search::tasks_on(tasks, date)),
        },
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_command_on;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 3).unwrap()
    }

    fn run(line: &str, tasks: &mut TaskList) -> Result<Outcome, CommandError> {
        execute(parse_command_on(line, today())?, tasks)
    }

    #[test]
    fn test_add_then_list() {
        let mut tasks = TaskList::new();
        let added = run("todo read book", &mut tasks).unwrap();
        assert_eq!(
            added,
            Outcome::Added {
                task: Task::todo("read book").unwrap(),
                count: 1
            }
        );

        let Outcome::List { tasks: listed } = run("list", &mut tasks).unwrap() else {
            panic!("expected list");
        };
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].number, 1);
        assert!(!listed[0].task.done);
    }

    #[test]
    fn test_mark_unmark_reports_number() {
        let mut tasks = TaskList::from(vec![Task::todo("a").unwrap(), Task::todo("b").unwrap()]);
        let Outcome::Marked { number, task } = run("mark 2", &mut tasks).unwrap() else {
            panic!("expected marked");
        };
        assert_eq!(number, 2);
        assert!(task.done);
        assert!(tasks.get(2).unwrap().done);

        let Outcome::Unmarked { task, .. } = run("unmark 2", &mut tasks).unwrap() else {
            panic!("expected unmarked");
        };
        assert!(!task.done);
    }

    #[test]
    fn test_failed_command_leaves_list_unchanged() {
        let mut tasks = TaskList::from(vec![Task::todo("a").unwrap()]);
        let before = tasks.clone();
        assert_eq!(
            run("delete 5", &mut tasks).unwrap_err(),
            CommandError::InvalidIndex { index: 5, len: 1 }
        );
        assert!(run("mark 0", &mut tasks).is_err());
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_delete_reports_remaining_count() {
        let mut tasks = TaskList::from(vec![
            Task::todo("a").unwrap(),
            Task::todo("b").unwrap(),
            Task::todo("c").unwrap(),
        ]);
        let outcome = run("delete 1", &mut tasks).unwrap();
        assert_eq!(
            outcome,
            Outcome::Deleted {
                task: Task::todo("a").unwrap(),
                count: 2
            }
        );
        assert_eq!(tasks.get(1).unwrap().description, "b");
    }

    #[test]
    fn test_find_and_on_keep_original_numbers() {
        let mut tasks = TaskList::new();
        run("todo Buy milk", &mut tasks).unwrap();
        run("deadline Read Book /by 2025-09-05 1800", &mut tasks).unwrap();

        let Outcome::Found { matches, .. } = run("find book", &mut tasks).unwrap() else {
            panic!("expected found");
        };
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].number, 2);

        let Outcome::On { date, matches } = run("on 2025-09-05", &mut tasks).unwrap() else {
            panic!("expected on");
        };
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 9, 5).unwrap());
        assert_eq!(matches[0].number, 2);
    }

    #[test]
    fn test_clear_and_exit() {
        let mut tasks = TaskList::from(vec![Task::todo("a").unwrap()]);
        assert_eq!(
            run("clear", &mut tasks).unwrap(),
            Outcome::Cleared { removed: 1 }
        );
        assert!(tasks.is_empty());
        assert_eq!(run("bye", &mut tasks).unwrap(), Outcome::Exit);
    }
}
