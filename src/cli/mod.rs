//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `add` | Add a task with priority, due date and dependencies |
//! | `list` | Pending tasks by priority (or `--by-due`) |
//! | `next` | Most urgent pending task |
//! | `done` | Complete a task and report what became ready |
//! | `check` | Report dependency cycles |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod task;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
