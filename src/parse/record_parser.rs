use crate::model::task::{Task, TaskError, TaskKind};
use crate::parse::legacy_parser::decode_legacy;
use crate::parse::when::{WhenError, from_storage_form};

/// Why a stored line could not be turned back into a task
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("unknown task kind `{0}`")]
    UnknownKind(String),
    #[error("bad done flag `{0}`")]
    BadDoneFlag(String),
    #[error("kind {kind} needs {expected} fields, found {found}")]
    FieldCount {
        kind: char,
        expected: usize,
        found: usize,
    },
    #[error("malformed legacy record")]
    MalformedLegacy,
    #[error("line is not valid UTF-8")]
    NotUtf8,
    #[error(transparent)]
    Temporal(#[from] WhenError),
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// A line that was skipped while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedLine {
    /// 1-based line number in the source text
    pub line_no: usize,
    pub text: String,
    pub reason: RecordError,
}

/// Parse the whole data file. Blank lines are skipped silently; lines that
/// decode under neither schema are collected in `dropped` and loading
/// carries on with the rest.
pub fn parse_records(text: &str) -> (Vec<Task>, Vec<DroppedLine>) {
    parse_record_bytes(text.as_bytes())
}

/// Like [`parse_records`], for raw file contents. Each line is decoded on
/// its own, so a line that is not UTF-8 is dropped without taking the rest
/// of the file with it.
pub fn parse_record_bytes(bytes: &[u8]) -> (Vec<Task>, Vec<DroppedLine>) {
    let mut tasks = Vec::new();
    let mut dropped = Vec::new();

    for (idx, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let decoded = std::str::from_utf8(raw).map_err(|_| RecordError::NotUtf8);
        let result = match decoded {
            Ok(text) if text.trim().is_empty() => continue,
            Ok(text) => decode_line(text.trim()),
            Err(e) => Err(e),
        };
        match result {
            Ok(task) => tasks.push(task),
            Err(reason) => dropped.push(DroppedLine {
                line_no: idx + 1,
                text: String::from_utf8_lossy(raw).into_owned(),
                reason,
            }),
        }
    }

    (tasks, dropped)
}

/// Legacy records are recognized by their leading `[`.
pub fn decode_line(line: &str) -> Result<Task, RecordError> {
    if line.starts_with('[') {
        decode_legacy(line)
    } else {
        decode_record(line)
    }
}

/// Decode a current-schema record: `T | 0 | desc`, `D | 1 | desc | due`,
/// `E | 0 | desc | start | end`.
pub fn decode_record(line: &str) -> Result<Task, RecordError> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();

    let kind = fields[0];
    let expected = match kind {
        "T" => 3,
        "D" => 4,
        "E" => 5,
        _ => return Err(RecordError::UnknownKind(kind.to_string())),
    };
    if fields.len() != expected {
        return Err(RecordError::FieldCount {
            kind: kind.chars().next().unwrap_or('?'),
            expected,
            found: fields.len(),
        });
    }

    let done = match fields[1] {
        "1" => true,
        "0" => false,
        other => return Err(RecordError::BadDoneFlag(other.to_string())),
    };

    let kind = match kind {
        "D" => TaskKind::Deadline {
            due: from_storage_form(fields[3])?,
        },
        "E" => TaskKind::Event {
            start: from_storage_form(fields[3])?,
            end: from_storage_form(fields[4])?,
        },
        _ => TaskKind::Todo,
    };

    let mut task = Task::new(fields[2], kind)?;
    task.done = done;
    Ok(task)
}
