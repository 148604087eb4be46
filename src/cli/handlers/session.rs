use std::io::BufRead;

use chrono::{Local, NaiveDate};

use crate::cli::output::{format_corrupted, format_outcome, message_json, outcome_to_json};
use crate::cli::reporter::Reporter;
use crate::error::SessionError;
use crate::io::storage::Storage;
use crate::model::task_list::TaskList;
use crate::ops::{Outcome, execute};
use crate::parse::parse_command_on;

/// An open task list bound to its data file. Every mutating command is
/// saved before the next line is read.
pub struct Session {
    tasks: TaskList,
    storage: Storage,
    json: bool,
    today: Option<NaiveDate>,
}

impl Session {
    /// Load the data file, reporting skipped lines and read failures.
    pub fn open(mut storage: Storage, json: bool, reporter: &mut dyn Reporter) -> Self {
        let loaded = storage.load();
        if !loaded.dropped.is_empty() {
            reporter.report_error(&format_corrupted(loaded.dropped.len()));
        }
        if let Some(err) = &loaded.error {
            reporter.report_error(&err.to_string());
        }
        Session {
            tasks: loaded.tasks,
            storage,
            json,
            today: None,
        }
    }

    /// Pin the date relative dates resolve against
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Run one command line. Returns `Ok(true)` once the exit command ran.
    /// Errors have already been reported when this returns.
    pub fn execute_line(
        &mut self,
        line: &str,
        reporter: &mut dyn Reporter,
    ) -> Result<bool, SessionError> {
        let command = match parse_command_on(line, self.today()) {
            Ok(command) => command,
            Err(e) => {
                log::debug!("rejected {:?}: {}", line, e);
                self.show_error(&e.to_string(), reporter);
                return Err(e.into());
            }
        };
        log::debug!("executing {}", command.verb());

        let mutating = command.is_mutating();
        let outcome = match execute(command, &mut self.tasks) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.show_error(&e.to_string(), reporter);
                return Err(e.into());
            }
        };
        self.show(&outcome, reporter);

        // A failed save keeps the change in memory; the next save retries it
        if mutating && let Err(e) = self.storage.save(&self.tasks) {
            self.show_error(&e.to_string(), reporter);
            return Err(e.into());
        }
        Ok(outcome == Outcome::Exit)
    }

    /// Read lines until the exit command or end of input. Blank lines are
    /// ignored; failed lines, including ones that are not UTF-8, are
    /// reported and the loop goes on.
    pub fn run<B: BufRead>(
        &mut self,
        mut input: B,
        reporter: &mut dyn Reporter,
    ) -> std::io::Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim_end_matches(['\n', '\r']),
                Err(_) => {
                    log::debug!("rejected non-UTF-8 input line");
                    self.show_error("That line is not valid text; please type it again.", reporter);
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(true) = self.execute_line(line, reporter) {
                return Ok(());
            }
        }
        log::debug!("end of input");
        Ok(())
    }

    fn show(&self, outcome: &Outcome, reporter: &mut dyn Reporter) {
        if self.json {
            match outcome_to_json(outcome) {
                Ok(json) => reporter.report(&[json]),
                Err(e) => reporter.report_error(&e.to_string()),
            }
        } else {
            reporter.report(&format_outcome(outcome));
        }
    }

    fn show_error(&self, message: &str, reporter: &mut dyn Reporter) {
        if self.json
            && let Ok(json) = message_json(message)
        {
            reporter.report_error(&json);
        } else {
            reporter.report_error(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::reporter::BufferReporter;
    use crate::error::CommandError;
    use crate::io::storage::StorageError;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 3).unwrap()
    }

    fn open(tmp: &TempDir, reporter: &mut BufferReporter) -> Session {
        Session::open(Storage::new(tmp.path().join("tasks.txt")), false, reporter).with_today(today())
    }

    #[test]
    fn test_mutations_are_saved() {
        let tmp = TempDir::new().unwrap();
        let mut out = BufferReporter::default();
        let mut session = open(&tmp, &mut out);

        session.execute_line("todo read book", &mut out).unwrap();
        session
            .execute_line("deadline report /by tomorrow 1800", &mut out)
            .unwrap();
        session.execute_line("mark 1", &mut out).unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("tasks.txt")).unwrap(),
            "T | 1 | read book\nD | 0 | report | 2025-09-04 18:00\n"
        );
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_errors_are_reported_and_session_continues() {
        let tmp = TempDir::new().unwrap();
        let mut out = BufferReporter::default();
        let mut session = open(&tmp, &mut out);

        let err = session.execute_line("blah", &mut out).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Command(CommandError::UnknownCommand(_))
        ));
        assert!(session.execute_line("todo", &mut out).is_err());
        assert_eq!(out.errors.len(), 2);
        assert_eq!(out.errors[1], "The description of a todo cannot be empty.");

        assert!(!session.execute_line("todo ok", &mut out).unwrap());
        assert_eq!(session.tasks().len(), 1);
    }

    #[test]
    fn test_run_stops_at_bye() {
        let tmp = TempDir::new().unwrap();
        let mut out = BufferReporter::default();
        let mut session = open(&tmp, &mut out);

        let input = Cursor::new("todo a\n\nbye\ntodo never\n");
        session.run(input, &mut out).unwrap();
        assert_eq!(session.tasks().len(), 1);
        assert_eq!(out.lines.last().unwrap(), "Bye. Hope to see you again soon!");
    }

    #[test]
    fn test_run_survives_invalid_utf8_line() {
        let tmp = TempDir::new().unwrap();
        let mut out = BufferReporter::default();
        let mut session = open(&tmp, &mut out);

        let input = Cursor::new(b"todo a\ntodo caf\xe9\ntodo b\nbye\n".to_vec());
        session.run(input, &mut out).unwrap();

        let descriptions: Vec<&str> = session
            .tasks()
            .tasks()
            .iter()
            .map(|t| t.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["a", "b"]);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.lines.last().unwrap(), "Bye. Hope to see you again soon!");
    }

    #[test]
    fn test_unreadable_data_file_is_not_overwritten() {
        let tmp = TempDir::new().unwrap();
        let mut out = BufferReporter::default();
        // A directory in place of the data file cannot be read
        let mut session = Session::open(Storage::new(tmp.path()), false, &mut out).with_today(today());
        assert_eq!(out.errors.len(), 1);

        let err = session.execute_line("todo new", &mut out).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Persistence(StorageError::Unread { .. })
        ));
        assert!(tmp.path().is_dir());
    }

    #[test]
    fn test_corrupted_lines_reported_on_open() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("tasks.txt"),
            "T | 0 | fine\nnonsense\nD | 0 | bad | not a date\n",
        )
        .unwrap();
        let mut out = BufferReporter::default();
        let session = open(&tmp, &mut out);

        assert_eq!(session.tasks().len(), 1);
        assert_eq!(
            out.errors,
            vec!["Some saved lines were corrupted and were skipped: 2"]
        );
    }

    #[test]
    fn test_failed_save_keeps_change_in_memory() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let mut out = BufferReporter::default();
        let mut session =
            Session::open(Storage::new(blocker.join("tasks.txt")), false, &mut out).with_today(today());

        let err = session.execute_line("todo keep me", &mut out).unwrap_err();
        assert!(matches!(err, SessionError::Persistence(_)));
        assert_eq!(session.tasks().len(), 1);
        assert_eq!(out.lines[0], "Got it. I've added this task:");
        assert_eq!(out.errors.len(), 1);
    }

    #[test]
    fn test_json_output() {
        let tmp = TempDir::new().unwrap();
        let mut out = BufferReporter::default();
        let mut session =
            Session::open(Storage::new(tmp.path().join("tasks.txt")), true, &mut out).with_today(today());

        session.execute_line("todo read", &mut out).unwrap();
        session.execute_line("list", &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.lines.last().unwrap()).unwrap();
        assert_eq!(value[0]["description"], "read");
        assert_eq!(value[0]["index"], 1);

        session.execute_line("mark 9", &mut out).unwrap_err();
        let value: serde_json::Value = serde_json::from_str(&out.errors[0]).unwrap();
        assert!(value["message"].as_str().unwrap().contains("Task number 9"));
    }
}
