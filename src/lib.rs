//! taskheap - a local-first priority task queue
//!
//! Tasks carry a priority, a due date and prerequisite tasks. The
//! [`Scheduler`] keeps them ordered by urgency and only lets a task be
//! completed once its direct prerequisites are done. [`TaskBoard`] adds a
//! JSON document that is rewritten after every change.

pub mod domain;
pub mod storage;
pub mod logging;
pub mod cli;

pub use domain::{Completion, Scheduler, SchedulerError, Task, TaskError, TaskRecord};
pub use storage::{BoardError, TaskBoard, TaskStore};
