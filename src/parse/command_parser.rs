use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

use crate::error::CommandError;
use crate::model::task::{DELIMITER, Task};
use crate::parse::when::parse_when_on;

pub const TODO_USAGE: &str = "todo <description>";
pub const DEADLINE_USAGE: &str = "deadline <description> /by <due>";
pub const EVENT_USAGE: &str = "event <description> /from <start> /to <end>";
pub const MARK_USAGE: &str = "mark <task number>";
pub const UNMARK_USAGE: &str = "unmark <task number>";
pub const DELETE_USAGE: &str = "delete <task number>";
pub const FIND_USAGE: &str = "find <keyword>";
pub const ON_USAGE: &str = "on <date>";

// A separator only counts when it stands alone as a word.
static BY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:^|\s+)/by(?:\s+|$)").unwrap());
static FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s+)/from(?:\s+|$)").unwrap());
static TO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:^|\s+)/to(?:\s+|$)").unwrap());

/// A fully validated command, ready to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `bye`
    Exit,
    /// `list`
    List,
    /// `clear`
    Clear,
    /// `todo`, `deadline` and `event`, already built into a task
    Add(Task),
    /// `mark <n>` (1-based, range-checked when executed)
    Mark(usize),
    /// `unmark <n>`
    Unmark(usize),
    /// `delete <n>`
    Delete(usize),
    /// `find <keyword>`
    Find(String),
    /// `on <date>`
    On(NaiveDate),
}

impl Command {
    /// Whether executing this command changes the task list
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Clear
                | Command::Add(_)
                | Command::Mark(_)
                | Command::Unmark(_)
                | Command::Delete(_)
        )
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Command::Exit => "bye",
            Command::List => "list",
            Command::Clear => "clear",
            Command::Add(task) => task.kind.name(),
            Command::Mark(_) => "mark",
            Command::Unmark(_) => "unmark",
            Command::Delete(_) => "delete",
            Command::Find(_) => "find",
            Command::On(_) => "on",
        }
    }
}

/// Interpret one line of user input against today's local date.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    parse_command_on(line, Local::now().date_naive())
}

/// Interpret one line of user input. Relative dates resolve against `today`.
pub fn parse_command_on(line: &str, today: NaiveDate) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "bye" => bare(Command::Exit, rest, "bye"),
        "list" => bare(Command::List, rest, "list"),
        "clear" => bare(Command::Clear, rest, "clear"),
        "todo" => parse_todo(rest),
        "deadline" => parse_deadline(rest, today),
        "event" => parse_event(rest, today),
        "mark" => parse_number(rest, MARK_USAGE).map(Command::Mark),
        "unmark" => parse_number(rest, UNMARK_USAGE).map(Command::Unmark),
        "delete" => parse_number(rest, DELETE_USAGE).map(Command::Delete),
        "find" => {
            if rest.is_empty() {
                return Err(CommandError::InvalidFormat(FIND_USAGE));
            }
            Ok(Command::Find(rest.to_string()))
        }
        "on" => {
            if rest.is_empty() {
                return Err(CommandError::InvalidFormat(ON_USAGE));
            }
            let when = parse_when_on(rest, today)?;
            Ok(Command::On(when.date()))
        }
        _ => Err(CommandError::UnknownCommand(line.to_string())),
    }
}

fn bare(command: Command, rest: &str, usage: &'static str) -> Result<Command, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::InvalidFormat(usage))
    }
}

fn parse_todo(rest: &str) -> Result<Command, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::EmptyDescription("todo"));
    }
    check_description(rest, TODO_USAGE)?;
    Ok(Command::Add(Task::todo(rest)?))
}

fn parse_deadline(rest: &str, today: NaiveDate) -> Result<Command, CommandError> {
    let (description, due) =
        split_once_on(rest, &BY).ok_or(CommandError::InvalidFormat(DEADLINE_USAGE))?;
    if due.is_empty() {
        return Err(CommandError::InvalidFormat(DEADLINE_USAGE));
    }
    if description.is_empty() {
        return Err(CommandError::EmptyDescription("deadline"));
    }
    check_description(description, DEADLINE_USAGE)?;
    let due = parse_when_on(due, today)?;
    Ok(Command::Add(Task::deadline(description, due)?))
}

fn parse_event(rest: &str, today: NaiveDate) -> Result<Command, CommandError> {
    let (description, span) =
        split_once_on(rest, &FROM).ok_or(CommandError::InvalidFormat(EVENT_USAGE))?;
    let (start, end) = split_once_on(span, &TO).ok_or(CommandError::InvalidFormat(EVENT_USAGE))?;
    if start.is_empty() || end.is_empty() {
        return Err(CommandError::InvalidFormat(EVENT_USAGE));
    }
    if description.is_empty() {
        return Err(CommandError::EmptyDescription("event"));
    }
    check_description(description, EVENT_USAGE)?;
    let start = parse_when_on(start, today)?;
    let end = parse_when_on(end, today)?;
    Ok(Command::Add(Task::event(description, start, end)?))
}

/// A positive 1-based task number
fn parse_number(rest: &str, usage: &'static str) -> Result<usize, CommandError> {
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidFormat(usage)),
    }
}

/// Reported as a usage error here rather than as a task error.
fn check_description(description: &str, usage: &'static str) -> Result<(), CommandError> {
    if description.contains(DELIMITER) {
        return Err(CommandError::InvalidFormat(usage));
    }
    Ok(())
}

/// Split at the first match of `sep`, trimming both sides.
fn split_once_on<'a>(s: &'a str, sep: &Regex) -> Option<(&'a str, &'a str)> {
    let m = sep.find(s)?;
    Some((s[..m.start()].trim(), s[m.end()..].trim()))
}
