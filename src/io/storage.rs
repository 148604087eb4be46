use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::{self, RecoveryEntry};
use crate::model::config::StorageConfig;
use crate::model::task_list::TaskList;
use crate::parse::{DroppedLine, parse_record_bytes, serialize_records};

/// Error type for data file I/O
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not save tasks to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("not saving over {path}: it could not be read at startup")]
    Unread { path: PathBuf },
}

/// Result of loading the data file. Loading never fails outright: an
/// unreadable file yields an empty list and the error, and bad lines are
/// skipped and listed in `dropped`.
#[derive(Debug, Default)]
pub struct Loaded {
    pub tasks: TaskList,
    pub dropped: Vec<DroppedLine>,
    pub error: Option<StorageError>,
}

/// The data file the task list lives in
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
    recovery_log: bool,
    /// Set when the file exists but could not be read; saving would
    /// replace contents nobody has seen.
    unread: bool,
    /// Lines skipped by the last load that are still in the file. They go
    /// to the recovery log when a save is about to remove them.
    pending: Vec<DroppedLine>,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Storage {
            path: path.into(),
            recovery_log: true,
            unread: false,
            pending: Vec::new(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Storage {
            path: config.path.clone(),
            recovery_log: config.recovery_log,
            unread: false,
            pending: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the task list. A missing file is an empty list.
    pub fn load(&mut self) -> Loaded {
        self.unread = false;
        self.pending.clear();
        if !self.path.exists() {
            log::debug!("no data file at {}, starting empty", self.path.display());
            return Loaded::default();
        }

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(source) => {
                log::warn!("could not read {}: {}", self.path.display(), source);
                self.unread = true;
                return Loaded {
                    error: Some(StorageError::Read {
                        path: self.path.clone(),
                        source,
                    }),
                    ..Loaded::default()
                };
            }
        };

        let (tasks, dropped) = parse_record_bytes(&bytes);
        for line in &dropped {
            log::warn!(
                "{}:{}: skipping corrupted record ({})",
                self.path.display(),
                line.line_no,
                line.reason
            );
        }
        self.pending = dropped.clone();
        log::debug!(
            "loaded {} tasks from {} ({} corrupted)",
            tasks.len(),
            self.path.display(),
            dropped.len()
        );

        Loaded {
            tasks: TaskList::from(tasks),
            dropped,
            error: None,
        }
    }

    /// Rewrite the whole data file in the current schema. The write goes
    /// through a temp file and rename, so readers never see a partial file.
    pub fn save(&mut self, tasks: &TaskList) -> Result<(), StorageError> {
        if self.unread {
            log::error!("not saving over unread {}", self.path.display());
            return Err(StorageError::Unread {
                path: self.path.clone(),
            });
        }
        // Skipped lines are about to disappear from the file
        if !self.pending.is_empty() {
            if self.recovery_log {
                recovery::log_recovery(&RecoveryEntry::dropped(&self.path, &self.pending));
            }
            self.pending.clear();
        }

        let content = serialize_records(tasks.tasks());
        let result = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => fs::create_dir_all(dir),
            None => Ok(()),
        }
        .and_then(|()| recovery::atomic_write(&self.path, content.as_bytes()));

        if let Err(source) = result {
            log::error!("could not save {}: {}", self.path.display(), source);
            if self.recovery_log {
                recovery::log_recovery(&RecoveryEntry::unsaved(&self.path, &source, content));
            }
            return Err(StorageError::Write {
                path: self.path.clone(),
                source,
            });
        }

        log::debug!("saved {} tasks to {}", tasks.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::recovery::recovery_log_path;
    use crate::model::task::Task;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let loaded = Storage::new(tmp.path().join("nope.txt")).load();
        assert!(loaded.tasks.is_empty());
        assert!(loaded.dropped.is_empty());
        assert!(loaded.error.is_none());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data/nested/tasks.txt");
        let mut storage = Storage::new(&path);

        let tasks = TaskList::from(vec![Task::todo("one").unwrap()]);
        storage.save(&tasks).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "T | 0 | one\n");
        assert_eq!(storage.load().tasks, tasks);
    }

    #[test]
    fn test_non_utf8_line_does_not_lose_the_rest() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.txt");
        fs::write(&path, b"T | 0 | one\nT | 0 | two\nT | 0 | caf\xe9\n").unwrap();

        let mut storage = Storage::new(&path);
        let mut loaded = storage.load();
        assert!(loaded.error.is_none());
        assert_eq!(loaded.tasks.len(), 2);
        assert_eq!(loaded.dropped.len(), 1);

        loaded.tasks.push(Task::todo("new").unwrap());
        storage.save(&loaded.tasks).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "T | 0 | one\nT | 0 | two\nT | 0 | new\n"
        );
        let log = fs::read_to_string(recovery_log_path(&path)).unwrap();
        assert!(log.contains("    3: T | 0 | caf\u{fffd}\n"));
    }

    #[test]
    fn test_unreadable_file_is_never_overwritten() {
        let tmp = TempDir::new().unwrap();
        // A directory cannot be read as a file
        let mut storage = Storage::new(tmp.path());
        let loaded = storage.load();
        assert!(loaded.tasks.is_empty());
        assert!(matches!(loaded.error, Some(StorageError::Read { .. })));

        let tasks = TaskList::from(vec![Task::todo("new").unwrap()]);
        let err = storage.save(&tasks).unwrap_err();
        assert!(matches!(err, StorageError::Unread { .. }));
    }

    #[test]
    fn test_save_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();
        let mut storage = Storage::new(blocker.join("tasks.txt"));

        let tasks = TaskList::from(vec![Task::todo("keep me").unwrap()]);
        let err = storage.save(&tasks).unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
        assert!(err.to_string().contains("could not save tasks"));
    }

    #[test]
    fn test_dropped_lines_logged_once_when_save_removes_them() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.txt");
        fs::write(&path, "T | 0 | fine\nthis is garbage\n").unwrap();

        // Read-only runs leave the file, and so the log, alone
        for _ in 0..3 {
            let loaded = Storage::new(&path).load();
            assert_eq!(loaded.tasks.len(), 1);
            assert_eq!(loaded.dropped.len(), 1);
        }
        assert!(!recovery_log_path(&path).exists());

        let mut storage = Storage::new(&path);
        let loaded = storage.load();
        storage.save(&loaded.tasks).unwrap();
        storage.save(&loaded.tasks).unwrap();

        let log = fs::read_to_string(recovery_log_path(&path)).unwrap();
        assert_eq!(log.matches("this is garbage").count(), 1);
        assert!(log.contains("    2: this is garbage\n"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "T | 0 | fine\n");
    }

    #[test]
    fn test_recovery_log_can_be_disabled() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.txt");
        fs::write(&path, "garbage\n").unwrap();

        let mut storage = Storage::from_config(&StorageConfig {
            path: path.clone(),
            recovery_log: false,
        });
        let loaded = storage.load();
        assert_eq!(loaded.dropped.len(), 1);
        storage.save(&loaded.tasks).unwrap();
        assert!(!recovery_log_path(&path).exists());
    }
}
