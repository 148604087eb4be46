use std::ffi::OsString;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tempfile::NamedTempFile;

use crate::parse::DroppedLine;

const FILE_HEADER: &str = "\
# jot recovery log
# Lines jot could not load, and saves that failed, are kept here.
# Copy anything you still need back into the data file. Safe to delete.
";

/// Why data ended up in the recovery log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Salvage {
    /// Lines skipped while loading, with their line numbers
    Dropped(Vec<(usize, String)>),
    /// The full text of a save that could not be written
    UnsavedText { error: String, text: String },
}

/// One block in the recovery log
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub at: DateTime<Utc>,
    pub data_file: PathBuf,
    pub salvage: Salvage,
}

impl RecoveryEntry {
    pub fn dropped(data_file: &Path, lines: &[DroppedLine]) -> Self {
        RecoveryEntry {
            at: Utc::now(),
            data_file: data_file.to_path_buf(),
            salvage: Salvage::Dropped(
                lines
                    .iter()
                    .map(|line| (line.line_no, line.text.clone()))
                    .collect(),
            ),
        }
    }

    pub fn unsaved(data_file: &Path, error: &io::Error, text: String) -> Self {
        RecoveryEntry {
            at: Utc::now(),
            data_file: data_file.to_path_buf(),
            salvage: Salvage::UnsavedText {
                error: error.to_string(),
                text,
            },
        }
    }
}

impl fmt::Display for RecoveryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = self.at.to_rfc3339_opts(SecondsFormat::Secs, true);
        match &self.salvage {
            Salvage::Dropped(lines) => {
                writeln!(
                    f,
                    "\n## {} skipped {} line(s) of {}",
                    at,
                    lines.len(),
                    self.data_file.display()
                )?;
                for (line_no, text) in lines {
                    writeln!(f, "{:>5}: {}", line_no, text)?;
                }
            }
            Salvage::UnsavedText { error, text } => {
                writeln!(
                    f,
                    "\n## {} could not save {} ({})",
                    at,
                    self.data_file.display(),
                    error
                )?;
                f.write_str(text)?;
                if !text.ends_with('\n') {
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}

/// The recovery log sits next to the data file: `tasks.txt.recovery.log`.
pub fn recovery_log_path(data_file: &Path) -> PathBuf {
    let mut name = OsString::from(data_file.as_os_str());
    name.push(".recovery.log");
    PathBuf::from(name)
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append an entry to the recovery log of its data file. Failures are
/// logged and otherwise ignored.
pub fn log_recovery(entry: &RecoveryEntry) {
    let path = recovery_log_path(&entry.data_file);
    if let Err(e) = append(&path, entry) {
        log::warn!("could not write recovery log {}: {}", path.display(), e);
    }
}

fn append(path: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let fresh = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut text = if fresh {
        FILE_HEADER.to_string()
    } else {
        String::new()
    };
    text.push_str(&entry.to_string());
    file.write_all(text.as_bytes())
}
