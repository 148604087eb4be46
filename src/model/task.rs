use chrono::{NaiveDate, NaiveDateTime};

use crate::parse::when;

/// Field separator of the data file; no description may contain it.
pub const DELIMITER: char = '|';

/// Error type for task construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("a task description cannot be empty")]
    EmptyDescription,
    #[error("a task description cannot contain `{}`", DELIMITER)]
    ContainsDelimiter,
    #[error("an event cannot end ({}) before it starts ({})", when::display(.end), when::display(.start))]
    InvalidInterval {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// What kind of task this is, with the fields each kind needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Todo,
    Deadline {
        due: NaiveDateTime,
    },
    Event {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl TaskKind {
    /// The tag letter used in both storage schemas and in rendering
    pub fn tag(&self) -> char {
        match self {
            TaskKind::Todo => 'T',
            TaskKind::Deadline { .. } => 'D',
            TaskKind::Event { .. } => 'E',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Todo => "todo",
            TaskKind::Deadline { .. } => "deadline",
            TaskKind::Event { .. } => "event",
        }
    }
}

/// A single task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub kind: TaskKind,
    pub done: bool,
}

impl Task {
    /// Create a not-done task, validating the description and, for events,
    /// that the interval does not end before it starts.
    pub fn new(description: impl Into<String>, kind: TaskKind) -> Result<Self, TaskError> {
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(TaskError::EmptyDescription);
        }
        if description.contains(DELIMITER) {
            return Err(TaskError::ContainsDelimiter);
        }
        if let TaskKind::Event { start, end } = kind
            && end < start
        {
            return Err(TaskError::InvalidInterval { start, end });
        }
        Ok(Task {
            description,
            kind,
            done: false,
        })
    }

    pub fn todo(description: impl Into<String>) -> Result<Self, TaskError> {
        Task::new(description, TaskKind::Todo)
    }

    pub fn deadline(description: impl Into<String>, due: NaiveDateTime) -> Result<Self, TaskError> {
        Task::new(description, TaskKind::Deadline { due })
    }

    pub fn event(
        description: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, TaskError> {
        Task::new(description, TaskKind::Event { start, end })
    }

    /// `X` when done, a space otherwise
    pub fn status_char(&self) -> char {
        if self.done { 'X' } else { ' ' }
    }

    /// Whether this task falls on `date`: a deadline due that day, or an
    /// event whose start..=end date range contains it. Time of day is ignored.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        match self.kind {
            TaskKind::Todo => false,
            TaskKind::Deadline { due } => due.date() == date,
            TaskKind::Event { start, end } => start.date() <= date && date <= end.date(),
        }
    }
}
