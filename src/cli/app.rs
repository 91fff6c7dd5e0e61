//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use super::output::{Output, OutputFormat};
use super::task;
use crate::logging::{self, LogLevel};
use crate::storage::{Config, LoadStatus, TaskBoard, TaskStore};

#[derive(Parser)]
#[command(name = "taskheap")]
#[command(author, version, about = "Priority task queue with due dates and dependencies")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Task document to use
    #[arg(long, global = true, env = "TASKHEAP_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    ///
    /// Examples:
    ///   taskheap add "write tests" --priority 1 --due 2025-01-10
    ///   taskheap add release -p 2 -d 2025-02-01 --dep "write tests"
    Add {
        /// Unique task name
        name: String,

        /// Priority (lower is more urgent)
        #[arg(long, short, allow_negative_numbers = true)]
        priority: i64,

        /// Due date (YYYY-MM-DD)
        #[arg(long, short)]
        due: String,

        /// Task that must be completed first (repeatable)
        #[arg(long = "dep", value_name = "NAME")]
        deps: Vec<String>,
    },

    /// List pending tasks by priority, then due date
    List {
        /// Order by due date only
        #[arg(long)]
        by_due: bool,
    },

    /// Show the most urgent pending task
    Next,

    /// Mark a task as completed
    Done {
        /// Task name
        name: String,
    },

    /// Report dependency cycles
    Check,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    logging::init_logging(cli.log_level, cli.verbose, config.log_level.as_deref())?;

    let output = Output::new(cli.format.unwrap_or(config.default_format));
    let path = cli.file.unwrap_or(config.tasks_file);

    let (mut board, status) = TaskBoard::open(TaskStore::new(&path))
        .with_context(|| format!("Failed to load tasks from {}", path.display()))?;
    match status {
        LoadStatus::Missing => debug!(path = %path.display(), "no task file yet"),
        LoadStatus::Loaded(count) => debug!(path = %path.display(), count, "tasks loaded"),
    }

    match cli.command {
        Commands::Add {
            name,
            priority,
            due,
            deps,
        } => task::add(&mut board, &output, &name, priority, &due, &deps),
        Commands::List { by_due } => task::list(&board, &output, by_due),
        Commands::Next => task::next(&mut board, &output),
        Commands::Done { name } => task::done(&mut board, &output, &name),
        Commands::Check => task::check(&board, &output),
    }
}
