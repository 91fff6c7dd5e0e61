//! Persistent task board
//!
//! Couples a [`Scheduler`] with a [`Persistence`] backend. The whole document
//! is rewritten after every successful add or completion; rejected operations
//! never touch it.

use thiserror::Error;
use tracing::{debug, info, warn};

use super::store::Persistence;
use crate::domain::{Completion, Scheduler, SchedulerError, Task};

#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl BoardError {
    /// Returns the scheduling outcome, if this is one
    pub fn as_scheduler(&self) -> Option<&SchedulerError> {
        match self {
            BoardError::Scheduler(e) => Some(e),
            BoardError::Storage(_) => None,
        }
    }
}

/// What was found when the board was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No document existed; the board starts empty
    Missing,

    /// A document with this many tasks was loaded
    Loaded(usize),
}

/// Scheduler plus its backing document
pub struct TaskBoard<P: Persistence> {
    scheduler: Scheduler,
    persistence: P,
}

impl<P: Persistence> TaskBoard<P> {
    /// Loads the board from `persistence`
    ///
    /// A missing document starts an empty board. A malformed document, or one
    /// with dangling dependencies, fails without building anything.
    pub fn open(persistence: P) -> Result<(Self, LoadStatus), BoardError> {
        let (scheduler, status) = match persistence.load()? {
            None => {
                warn!("no task document found, starting empty");
                (Scheduler::new(), LoadStatus::Missing)
            }
            Some(records) => {
                let scheduler = Scheduler::from_records(&records)?;
                debug!(count = records.len(), "task board loaded");
                (scheduler, LoadStatus::Loaded(records.len()))
            }
        };

        for cycle in scheduler.graph().cycles() {
            warn!(tasks = ?cycle, "dependency cycle: these tasks can never be completed");
        }

        Ok((
            Self {
                scheduler,
                persistence,
            },
            status,
        ))
    }

    /// Adds a task and saves the board
    pub fn add_task(&mut self, task: Task) -> Result<(), BoardError> {
        let name = task.name().to_string();
        self.scheduler.add_task(task)?;
        self.save()?;
        info!(task = %name, "task added");
        Ok(())
    }

    /// Completes a task, compacts, and saves the board
    pub fn complete_task(&mut self, name: &str) -> Result<Completion, BoardError> {
        let completion = self.scheduler.complete_task(name)?;
        self.save()?;
        info!(
            task = %name,
            purged = completion.purged.len(),
            ready = completion.ready.len(),
            "task completed"
        );
        Ok(completion)
    }

    pub fn list_pending(&self) -> Vec<&Task> {
        self.scheduler.list_pending()
    }

    pub fn list_by_due_date(&self) -> Vec<&Task> {
        self.scheduler.list_by_due_date()
    }

    pub fn peek_next(&mut self) -> Option<&Task> {
        self.scheduler.peek_next()
    }

    /// Direct prerequisites of `name` that are still incomplete
    pub fn blocked_by(&self, name: &str) -> Result<Vec<String>, BoardError> {
        Ok(self.scheduler.blocked_by(name)?)
    }

    /// Groups of tasks stuck on dependency cycles
    pub fn cycles(&self) -> Vec<Vec<String>> {
        self.scheduler.graph().cycles()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn save(&self) -> anyhow::Result<()> {
        self.persistence.save(&self.scheduler.to_records())
    }
}
