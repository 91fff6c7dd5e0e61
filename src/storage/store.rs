//! JSON document storage for tasks
//!
//! All tasks live in one JSON array that is rewritten in full on every save.
//! Uses file locking for concurrent access safety.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::domain::TaskRecord;

/// Where a task document is read from and written to
pub trait Persistence {
    /// Reads every record, or `None` if there is no document yet
    fn load(&self) -> Result<Option<Vec<TaskRecord>>>;

    /// Replaces the whole document with `records`
    fn save(&self, records: &[TaskRecord]) -> Result<()>;
}

/// Store for task data in a single JSON file
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Creates a new task store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "tasks.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Persistence for TaskStore {
    fn load(&self) -> Result<Option<Vec<TaskRecord>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to open task store: {}", self.path.display())
                })
            }
        };

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on task store")?;

        let records: Vec<TaskRecord> = serde_json::from_reader(BufReader::new(&file))
            .with_context(|| format!("Failed to parse task store: {}", self.path.display()))?;

        debug!(path = %self.path.display(), count = records.len(), "loaded task document");

        // Lock is released when file is dropped
        Ok(Some(records))
    }

    fn save(&self, records: &[TaskRecord]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.temp_path();

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock on task store")?;

            let mut writer = BufWriter::new(&file);
            let mut serializer = serde_json::Serializer::with_formatter(
                &mut writer,
                PrettyFormatter::with_indent(b"    "),
            );
            records
                .serialize(&mut serializer)
                .context("Failed to serialize tasks")?;
            writeln!(writer).context("Failed to write task store")?;

            writer.flush().context("Failed to flush task store")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        debug!(path = %self.path.display(), count = records.len(), "saved task document");

        Ok(())
    }
}

/// In-memory document for tests
///
/// Counts saves so tests can check when the document was rewritten.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: std::cell::RefCell<Option<Vec<TaskRecord>>>,
    saves: std::cell::RefCell<usize>,
}

#[cfg(test)]
impl MemoryStore {
    /// Creates a store with no document
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given document
    pub fn with_records(records: Vec<TaskRecord>) -> Self {
        Self {
            records: std::cell::RefCell::new(Some(records)),
            saves: std::cell::RefCell::new(0),
        }
    }

    /// Current document contents
    pub fn records(&self) -> Option<Vec<TaskRecord>> {
        self.records.borrow().clone()
    }

    /// Number of saves so far
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

#[cfg(test)]
impl Persistence for MemoryStore {
    fn load(&self) -> Result<Option<Vec<TaskRecord>>> {
        Ok(self.records.borrow().clone())
    }

    fn save(&self, records: &[TaskRecord]) -> Result<()> {
        *self.records.borrow_mut() = Some(records.to_vec());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
