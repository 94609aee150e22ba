//! Configuration management for the shell-task binary.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::task::TaskConfig;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Task configuration.
    pub task: TaskConfig,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply environment variable overrides from an arbitrary lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(command) = lookup("SHELL_TASK_COMMAND") {
            if !command.is_empty() {
                self.task.command = Some(command);
            }
        }

        if let Some(dir) = lookup("SHELL_TASK_CD") {
            if !dir.is_empty() {
                self.task.working_directory = Some(dir.into());
            }
        }

        if let Some(shell) = lookup("SHELL_TASK_SHELL") {
            if !shell.is_empty() {
                self.task.shell = shell;
            }
        }

        if let Some(level) = lookup("SHELL_TASK_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    ///
    /// The positional command is not applied here; it is a call-time value.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref dir) = args.cd {
            self.task.working_directory = Some(dir.clone());
        }

        if let Some(ref shell) = args.shell {
            self.task.shell = shell.clone();
        }

        if !args.env.is_empty() {
            self.task = std::mem::take(&mut self.task).with_envs(args.env.iter().cloned());
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
