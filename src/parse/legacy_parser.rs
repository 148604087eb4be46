//! Reader for the older bracketed record format, which stored tasks the way
//! they were displayed:
//!
//! ```text
//! [T][ ] read book
//! [D][X] submit report (by: Sep 1 2025 18:00)
//! [E][ ] project meeting (from: Sep 2 2025 14:00 to: Sep 2 2025 16:00)
//! ```
//!
//! Only loading is supported; saving always writes the current format.

use chrono::NaiveDateTime;

use crate::model::task::{Task, TaskKind};
use crate::parse::record_parser::RecordError;
use crate::parse::when::{WhenError, from_display_form, parse_when};

pub fn decode_legacy(line: &str) -> Result<Task, RecordError> {
    let body = line.strip_prefix('[').ok_or(RecordError::MalformedLegacy)?;
    let kind = body.chars().next().ok_or(RecordError::MalformedLegacy)?;
    let status = body[kind.len_utf8()..]
        .strip_prefix("][")
        .ok_or(RecordError::MalformedLegacy)?;
    let done_char = status.chars().next().ok_or(RecordError::MalformedLegacy)?;
    let done = match done_char {
        'X' | 'x' => true,
        ' ' => false,
        _ => return Err(RecordError::MalformedLegacy),
    };
    let rest = status[done_char.len_utf8()..]
        .strip_prefix("] ")
        .ok_or(RecordError::MalformedLegacy)?;

    let mut task = match kind {
        'T' => Task::todo(rest)?,
        'D' => {
            let (description, tail) = rsplit_marker(rest, "(by:")?;
            Task::deadline(description, legacy_when(strip_paren(tail))?)?
        }
        'E' => {
            let (description, tail) = rsplit_marker(rest, "(from:")?;
            let (start, end) = rsplit_marker(tail, " to:")?;
            Task::event(
                description,
                legacy_when(start)?,
                legacy_when(strip_paren(end))?,
            )?
        }
        other => return Err(RecordError::UnknownKind(other.to_string())),
    };
    task.done = done;
    Ok(task)
}

/// Split around the last occurrence of `marker`, trimming both halves.
fn rsplit_marker<'a>(s: &'a str, marker: &str) -> Result<(&'a str, &'a str), RecordError> {
    let idx = s.rfind(marker).ok_or(RecordError::MalformedLegacy)?;
    Ok((s[..idx].trim(), s[idx + marker.len()..].trim()))
}

fn strip_paren(s: &str) -> &str {
    s.strip_suffix(')').unwrap_or(s).trim()
}

/// Legacy dates were whatever the user typed or the display form; try the
/// lenient parser first, then the display form.
fn legacy_when(raw: &str) -> Result<NaiveDateTime, WhenError> {
    parse_when(raw).or_else(|err| from_display_form(raw).ok_or(err))
}
