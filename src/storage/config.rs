//! Configuration handling for taskheap
//!
//! Configuration is read from `taskheap.toml` in the working directory
//! (project) or `~/.config/taskheap/config.toml` (global). The project file
//! wins when both exist; command-line flags win over either.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the project configuration file
pub const PROJECT_CONFIG_FILE: &str = "taskheap.toml";

/// Default location of the task document, relative to the working directory
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings shared by the project and global files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Path of the task document
    pub tasks_file: PathBuf,

    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Log level filter (e.g. "info", "debug")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: PathBuf::from(DEFAULT_TASKS_FILE),
            default_format: OutputFormat::Text,
            log_level: None,
        }
    }
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Self::load_from(&cwd, Self::global_config_dir().as_deref())
    }

    /// Loads configuration using the given project and global directories
    pub fn load_from(project_dir: &Path, global_dir: Option<&Path>) -> Result<Self> {
        let project_path = project_dir.join(PROJECT_CONFIG_FILE);
        if project_path.is_file() {
            return Self::read_file(&project_path).context("Failed to load project config");
        }

        match global_dir.map(|dir| dir.join("config.toml")) {
            Some(global_path) if global_path.is_file() => {
                Self::read_file(&global_path).context("Failed to load global config")
            }
            _ => Ok(Self::default()),
        }
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "taskheap", "taskheap")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Saves the configuration as a project file in `project_dir`
    pub fn save_project(&self, project_dir: &Path) -> Result<()> {
        let config_path = project_dir.join(PROJECT_CONFIG_FILE);

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config: {}", config_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.tasks_file, PathBuf::from("tasks.json"));
        assert_eq!(config.default_format, OutputFormat::Text);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
tasks_file = "work/queue.json"
default_format = "json"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.tasks_file, PathBuf::from("work/queue.json"));
        assert_eq!(config.default_format, OutputFormat::Json);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let config = Config::load_from(project.path(), Some(global.path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn project_file_wins_over_global() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        fs::write(global.path().join("config.toml"), "tasks_file = \"global.json\"\n").unwrap();
        let config = Config::load_from(project.path(), Some(global.path())).unwrap();
        assert_eq!(config.tasks_file, PathBuf::from("global.json"));

        fs::write(
            project.path().join(PROJECT_CONFIG_FILE),
            "tasks_file = \"project.json\"\nlog_level = \"debug\"\n",
        )
        .unwrap();
        let config = Config::load_from(project.path(), Some(global.path())).unwrap();
        assert_eq!(config.tasks_file, PathBuf::from("project.json"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join(PROJECT_CONFIG_FILE), "default_format = 3\n").unwrap();

        assert!(Config::load_from(project.path(), None).is_err());
    }

    #[test]
    fn save_and_reload_project_config() {
        let project = TempDir::new().unwrap();
        let config = Config {
            tasks_file: PathBuf::from("other.json"),
            default_format: OutputFormat::Json,
            log_level: Some("info".to_string()),
        };

        config.save_project(project.path()).unwrap();
        let loaded = Config::load_from(project.path(), None).unwrap();
        assert_eq!(loaded, config);
    }
}
