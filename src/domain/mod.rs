//! Domain models for taskheap
//!
//! Contains the ordering and dependency engine without any I/O concerns.

mod task;
mod queue;
mod graph;
mod scheduler;

pub use task::{parse_due_date, OrderKey, Task, TaskError, TaskRecord, DATE_FORMAT};
pub use queue::TaskQueue;
pub use graph::DependencyGraph;
pub use scheduler::{Completion, Scheduler, SchedulerError};
