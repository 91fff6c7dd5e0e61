//! # Storage Layer
//!
//! Persistence for taskheap.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSON array, 4-space indent | `tasks.json` (configurable) |
//! | Config | TOML | `taskheap.toml` or `~/.config/taskheap/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`TaskStore`] uses file locking (`fs2`) for concurrent access
//! - All writes are atomic (temp file + rename)
//! - [`TaskBoard`] takes `&mut self` for every mutation, so the index, the
//!   priority queue and the saved document change together
//!
//! ## Key Types
//!
//! - [`TaskBoard`] - Scheduler plus its backing document
//! - [`TaskStore`] - Read/write the task document
//! - [`Persistence`] - Seam between the board and its document
//! - [`Config`] - Project and global configuration

mod store;
mod config;
mod board;

pub use store::{Persistence, TaskStore};
#[cfg(test)]
pub use store::MemoryStore;
pub use config::{Config, ConfigError, OutputFormat, DEFAULT_TASKS_FILE, PROJECT_CONFIG_FILE};
pub use board::{BoardError, LoadStatus, TaskBoard};
