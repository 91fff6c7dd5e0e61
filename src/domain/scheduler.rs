//! Task registry and scheduler
//!
//! The [`Scheduler`] owns every task, keyed by name, plus a [`TaskQueue`] over
//! the incomplete ones. Every mutation goes through `&mut self` and updates
//! both structures before returning, so callers never observe one without the
//! other.
//!
//! ## Completion semantics
//!
//! Completing a task checks only its direct prerequisites. Once the task is
//! marked done the registry is compacted: *every* completed task is dropped
//! from the index (including ones loaded already completed), survivors forget
//! the purged names, and the queue is rebuilt over what remains.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use super::graph::DependencyGraph;
use super::queue::TaskQueue;
use super::task::{Task, TaskError, TaskRecord};

#[derive(Debug, Error, PartialEq)]
pub enum SchedulerError {
    #[error("Task '{0}' already exists")]
    DuplicateTask(String),

    #[error("Task not found: {0}")]
    UnknownTask(String),

    #[error("Cannot complete '{task}': waiting on {}", .pending.join(", "))]
    UnmetDependency { task: String, pending: Vec<String> },

    #[error("Failed to load tasks: {0}")]
    Load(#[from] TaskError),
}

/// Result of a successful completion
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The task that was completed
    pub completed: Task,

    /// Names compacted out of the registry, sorted
    pub purged: Vec<String>,

    /// Incomplete tasks whose direct prerequisites are now all done,
    /// in priority order
    pub ready: Vec<Task>,
}

#[derive(Debug, Clone)]
struct Entry {
    task: Task,
    seq: u64,
}

/// Registry of tasks with priority ordering and dependency tracking
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: HashMap<String, Entry>,
    queue: TaskQueue,
    next_seq: u64,
}

impl Scheduler {
    /// Creates an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a scheduler from persisted records
    ///
    /// Loading is two-phase: every task is first built without dependencies,
    /// then dependency names are resolved against the complete index. Any
    /// error leaves nothing behind.
    pub fn from_records(records: &[TaskRecord]) -> Result<Self, SchedulerError> {
        // First pass: bare shells
        let mut shells = HashMap::with_capacity(records.len());
        for record in records {
            let shell = Task::shell_from_record(record)?;
            if shells.insert(record.name.clone(), shell).is_some() {
                return Err(TaskError::DuplicateRecord(record.name.clone()).into());
            }
        }

        // Second pass: wire dependencies
        let mut scheduler = Self::new();
        for record in records {
            let task = Task::from_record(record, &shells)?;
            scheduler.insert(task);
        }

        Ok(scheduler)
    }

    /// Snapshot of every indexed task, in insertion order
    pub fn to_records(&self) -> Vec<TaskRecord> {
        self.entries_in_order()
            .into_iter()
            .map(|entry| entry.task.to_record())
            .collect()
    }

    /// Adds a new task
    ///
    /// Rejected without any change if the name is taken or a dependency is
    /// not a known task.
    pub fn add_task(&mut self, task: Task) -> Result<(), SchedulerError> {
        if self.tasks.contains_key(task.name()) {
            return Err(SchedulerError::DuplicateTask(task.name().to_string()));
        }

        if let Some(missing) = task.dependencies().find(|dep| !self.tasks.contains_key(*dep)) {
            return Err(SchedulerError::UnknownTask(missing.to_string()));
        }

        self.insert(task);
        Ok(())
    }

    fn insert(&mut self, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;

        if !task.is_completed() {
            self.queue.push(task.name(), task.order_key(), seq);
        }

        self.tasks
            .insert(task.name().to_string(), Entry { task, seq });
    }

    /// Incomplete tasks sorted by priority, then due date
    pub fn list_pending(&self) -> Vec<&Task> {
        let mut pending = self.pending_entries();
        pending.sort_by(|a, b| {
            a.task
                .priority_cmp(&b.task)
                .then_with(|| a.seq.cmp(&b.seq))
        });
        pending.into_iter().map(|entry| &entry.task).collect()
    }

    /// Incomplete tasks sorted by due date only
    pub fn list_by_due_date(&self) -> Vec<&Task> {
        let mut pending = self.pending_entries();
        pending.sort_by(|a, b| {
            a.task
                .due_date
                .cmp(&b.task.due_date)
                .then_with(|| a.seq.cmp(&b.seq))
        });
        pending.into_iter().map(|entry| &entry.task).collect()
    }

    /// The most urgent incomplete task, if any
    pub fn peek_next(&mut self) -> Option<&Task> {
        let tasks = &self.tasks;
        let name = self
            .queue
            .peek_live(|name| {
                tasks
                    .get(name)
                    .is_some_and(|entry| !entry.task.is_completed())
            })?
            .to_string();

        self.get(&name)
    }

    /// Completes a task whose direct prerequisites are all done
    pub fn complete_task(&mut self, name: &str) -> Result<Completion, SchedulerError> {
        let entry = self
            .tasks
            .get(name)
            .ok_or_else(|| SchedulerError::UnknownTask(name.to_string()))?;

        let pending = self.pending_dependencies(&entry.task);
        if !pending.is_empty() {
            return Err(SchedulerError::UnmetDependency {
                task: name.to_string(),
                pending,
            });
        }

        let mut completed = entry.task.clone();
        completed.complete();
        if let Some(entry) = self.tasks.get_mut(name) {
            entry.task.complete();
        }

        let purged = self.compact();
        let ready = self.ready_tasks();

        Ok(Completion {
            completed,
            purged,
            ready,
        })
    }

    /// Drops every completed task and rebuilds the queue over the rest
    fn compact(&mut self) -> Vec<String> {
        let purged: BTreeSet<String> = self
            .tasks
            .iter()
            .filter(|(_, entry)| entry.task.is_completed())
            .map(|(name, _)| name.clone())
            .collect();

        self.tasks.retain(|name, _| !purged.contains(name));
        for entry in self.tasks.values_mut() {
            entry.task.forget_dependencies(&purged);
        }

        self.queue.rebuild(
            self.tasks
                .values()
                .map(|entry| (entry.task.name(), entry.task.order_key(), entry.seq)),
        );

        purged.into_iter().collect()
    }

    /// Incomplete tasks whose direct prerequisites are all completed,
    /// in priority order
    pub fn ready_tasks(&self) -> Vec<Task> {
        self.list_pending()
            .into_iter()
            .filter(|task| self.pending_dependencies(task).is_empty())
            .cloned()
            .collect()
    }

    /// Direct prerequisites of `name` that are still incomplete
    pub fn blocked_by(&self, name: &str) -> Result<Vec<String>, SchedulerError> {
        let entry = self
            .tasks
            .get(name)
            .ok_or_else(|| SchedulerError::UnknownTask(name.to_string()))?;
        Ok(self.pending_dependencies(&entry.task))
    }

    fn pending_dependencies(&self, task: &Task) -> Vec<String> {
        // A name missing from the index was compacted away, so it is done
        task.dependencies()
            .filter(|dep| {
                self.tasks
                    .get(*dep)
                    .is_some_and(|entry| !entry.task.is_completed())
            })
            .map(str::to_string)
            .collect()
    }

    /// Dependency graph over the indexed tasks
    pub fn graph(&self) -> DependencyGraph {
        DependencyGraph::from_tasks(self.entries_in_order().into_iter().map(|entry| &entry.task))
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name).map(|entry| &entry.task)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Number of indexed tasks, completed-but-not-compacted included
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn pending_entries(&self) -> Vec<&Entry> {
        self.tasks
            .values()
            .filter(|entry| !entry.task.is_completed())
            .collect()
    }

    fn entries_in_order(&self) -> Vec<&Entry> {
        let mut entries: Vec<_> = self.tasks.values().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use proptest::prelude::*;

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    // (priority, day offset) pairs; names are assigned by position
    fn params() -> impl Strategy<Value = Vec<(i64, u64)>> {
        proptest::collection::vec((-5i64..5, 0u64..30), 0..40)
    }

    fn build(params: &[(i64, u64)]) -> Scheduler {
        let mut scheduler = Scheduler::new();
        for (i, (priority, offset)) in params.iter().enumerate() {
            let due = base_date() + Days::new(*offset);
            scheduler
                .add_task(Task::new(format!("t{}", i), *priority, due))
                .unwrap();
        }
        scheduler
    }

    proptest! {
        #[test]
        fn list_pending_is_sorted_and_complete(params in params()) {
            let scheduler = build(&params);
            let pending = scheduler.list_pending();

            prop_assert_eq!(pending.len(), params.len());
            for pair in pending.windows(2) {
                prop_assert!(pair[0].order_key() <= pair[1].order_key());
            }
        }

        #[test]
        fn peek_next_matches_list_pending_head(params in params()) {
            let mut scheduler = build(&params);
            let head = scheduler.list_pending().first().map(|t| t.name().to_string());

            let first = scheduler.peek_next().map(|t| t.name().to_string());
            let second = scheduler.peek_next().map(|t| t.name().to_string());

            prop_assert_eq!(&first, &head);
            prop_assert_eq!(&second, &head);
        }

        #[test]
        fn completing_in_peek_order_drains_everything(params in params()) {
            let mut scheduler = build(&params);
            let expected: Vec<String> = scheduler
                .list_pending()
                .into_iter()
                .map(|t| t.name().to_string())
                .collect();

            let mut drained = Vec::new();
            while let Some(next) = scheduler.peek_next().map(|t| t.name().to_string()) {
                prop_assert!(!scheduler.get(&next).unwrap().is_completed());
                scheduler.complete_task(&next).unwrap();
                drained.push(next);
            }

            prop_assert_eq!(drained, expected);
            prop_assert!(scheduler.is_empty());
        }
    }
}
