//! Task configuration and per-call invocation parameters.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ShellTaskError;
use crate::Result;

/// Interpreter used when none is configured.
pub const DEFAULT_SHELL: &str = "bash";

/// Configuration captured when a task is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Default command, used when a call does not supply one.
    pub command: Option<String>,
    /// Directory to `cd` into before running the command.
    pub working_directory: Option<PathBuf>,
    /// Default environment overrides.
    pub env: Option<HashMap<String, String>>,
    /// Shell binary invoked with `-c`.
    pub shell: String,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            command: None,
            working_directory: None,
            env: None,
            shell: DEFAULT_SHELL.to_string(),
        }
    }
}

impl TaskConfig {
    /// Create an empty configuration using the default shell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default command.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Set the working directory.
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Add a default environment override.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Add multiple default environment overrides.
    pub fn with_envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env = self.env.get_or_insert_with(HashMap::new);
        for (k, v) in vars {
            env.insert(k.into(), v.into());
        }
        self
    }

    /// Set the shell binary.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

/// Parameters supplied for a single call.
///
/// Omitted fields fall back to the task's [`TaskConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Command for this call.
    pub command: Option<String>,
    /// Environment overrides for this call.
    pub env: Option<HashMap<String, String>>,
}

impl Invocation {
    /// Create an invocation that uses every configured default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the command for this call.
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Add an environment override for this call.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Two-tier lookup: the call-time value wins over the configured default.
pub fn resolve<'a, T: ?Sized>(call: Option<&'a T>, default: Option<&'a T>) -> Option<&'a T> {
    call.or(default)
}

/// Like [`resolve`], but a missing command is a configuration error.
pub fn resolve_required<'a>(call: Option<&'a str>, default: Option<&'a str>) -> Result<&'a str> {
    resolve(call, default).ok_or(ShellTaskError::MissingCommand)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TaskConfig::default();
        assert!(config.command.is_none());
        assert!(config.working_directory.is_none());
        assert!(config.env.is_none());
        assert_eq!(config.shell, "bash");
    }

    #[test]
    fn test_config_builder_chain() {
        let config = TaskConfig::new()
            .with_command("ls")
            .with_working_directory("/usr/bin")
            .with_env("FOO", "bar")
            .with_shell("sh");

        assert_eq!(config.command.as_deref(), Some("ls"));
        assert_eq!(config.working_directory, Some(PathBuf::from("/usr/bin")));
        assert_eq!(
            config.env.as_ref().and_then(|e| e.get("FOO")),
            Some(&"bar".to_string())
        );
        assert_eq!(config.shell, "sh");
    }

    #[test]
    fn test_config_with_envs() {
        let config = TaskConfig::new().with_envs([("A", "1"), ("B", "2")]);
        let env = config.env.unwrap();
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("B"), Some(&"2".to_string()));
    }

    #[test]
    fn test_config_partial_json() {
        let config: TaskConfig = serde_json::from_str(r#"{"command": "echo hi"}"#).unwrap();
        assert_eq!(config.command.as_deref(), Some("echo hi"));
        assert_eq!(config.shell, "bash");
    }

    #[test]
    fn test_invocation_builder() {
        let inv = Invocation::new().command("echo $X").env("X", "1");
        assert_eq!(inv.command.as_deref(), Some("echo $X"));
        assert_eq!(inv.env.unwrap().get("X"), Some(&"1".to_string()));
    }

    #[test]
    fn test_resolve_call_wins() {
        assert_eq!(resolve(Some("call"), Some("default")), Some("call"));
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        assert_eq!(resolve(None, Some("default")), Some("default"));
        assert_eq!(resolve::<str>(None, None), None);
    }

    #[test]
    fn test_resolve_required_missing() {
        let err = resolve_required(None, None).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_resolve_required_empty_string_is_present() {
        assert_eq!(resolve_required(Some(""), Some("default")).unwrap(), "");
    }
}
