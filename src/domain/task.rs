//! Task domain model
//!
//! A task is a named unit of work with a priority, a due date and a set of
//! prerequisite tasks. Dependencies are stored by name and resolved against
//! the registry that owns the canonical instances.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar date format used on input and in persisted records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq)]
pub enum TaskError {
    #[error("Invalid due date '{value}': expected YYYY-MM-DD ({source})")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    DanglingDependency { task: String, dependency: String },

    #[error("Duplicate task record: {0}")]
    DuplicateRecord(String),
}

/// Parses a due date in the fixed `YYYY-MM-DD` format
///
/// Surrounding whitespace is rejected, not trimmed.
pub fn parse_due_date(value: &str) -> Result<NaiveDate, TaskError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| {
        TaskError::InvalidDate {
            value: value.to_string(),
            source,
        }
    })
}

/// Ordering key: priority ascending, then due date ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderKey {
    pub priority: i64,
    pub due_date: NaiveDate,
}

/// Persisted form of a task
///
/// Dependencies are plain names; wiring them to tasks happens on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub name: String,
    pub priority: i64,
    pub due_date: String,
    pub dependencies: Vec<String>,
    pub completed: bool,
}

/// A task tracked by the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    name: String,

    /// Lower value = more urgent
    pub priority: i64,

    pub due_date: NaiveDate,

    /// Names of prerequisite tasks
    dependencies: BTreeSet<String>,

    completed: bool,
}

impl Task {
    /// Creates a new pending task with no dependencies
    pub fn new(name: impl Into<String>, priority: i64, due_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            priority,
            due_date,
            dependencies: BTreeSet::new(),
            completed: false,
        }
    }

    /// Creates a new pending task, parsing the due date from `YYYY-MM-DD`
    pub fn parse<I, S>(
        name: impl Into<String>,
        priority: i64,
        due_date: &str,
        dependencies: I,
    ) -> Result<Self, TaskError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let due_date = parse_due_date(due_date)?;
        Ok(Self::new(name, priority, due_date).with_dependencies(dependencies))
    }

    /// Adds prerequisite task names (duplicates collapse)
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the direct prerequisites
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(String::as_str)
    }

    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.contains(name)
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Marks the task completed. There is no way back.
    pub(crate) fn complete(&mut self) {
        self.completed = true;
    }

    /// Drops references to tasks that were compacted out of the registry
    pub(crate) fn forget_dependencies(&mut self, purged: &BTreeSet<String>) {
        self.dependencies.retain(|dep| !purged.contains(dep));
    }

    pub fn order_key(&self) -> OrderKey {
        OrderKey {
            priority: self.priority,
            due_date: self.due_date,
        }
    }

    /// Compares by priority, then due date
    pub fn priority_cmp(&self, other: &Task) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }

    /// Converts to the persisted form
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            name: self.name.clone(),
            priority: self.priority,
            due_date: self.due_date.format(DATE_FORMAT).to_string(),
            dependencies: self.dependencies.iter().cloned().collect(),
            completed: self.completed,
        }
    }

    /// Builds a task with no dependencies from a record (first load phase)
    pub fn shell_from_record(record: &TaskRecord) -> Result<Self, TaskError> {
        let mut task = Self::new(
            record.name.clone(),
            record.priority,
            parse_due_date(&record.due_date)?,
        );
        task.completed = record.completed;
        Ok(task)
    }

    /// Rebuilds a task from a record, resolving dependency names against
    /// tasks that already exist
    pub fn from_record(
        record: &TaskRecord,
        known: &HashMap<String, Task>,
    ) -> Result<Self, TaskError> {
        let task = Self::shell_from_record(record)?;

        if let Some(missing) = record
            .dependencies
            .iter()
            .find(|dep| !known.contains_key(dep.as_str()))
        {
            return Err(TaskError::DanglingDependency {
                task: record.name.clone(),
                dependency: missing.clone(),
            });
        }

        Ok(task.with_dependencies(record.dependencies.iter().cloned()))
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (priority: {}, due: {}, completed: {})",
            self.name,
            self.priority,
            self.due_date.format(DATE_FORMAT),
            self.completed
        )
    }
}
