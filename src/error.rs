//! Error types for shell-task.

use thiserror::Error;

use crate::task::InvocationState;

/// Main error type for shell-task operations.
#[derive(Error, Debug)]
pub enum ShellTaskError {
    /// No command was given at call time and none was configured.
    #[error("run() missing required argument: 'command'")]
    MissingCommand,

    /// The shell exited with a non-zero status.
    #[error("Command failed with exit code {exit_code}: {}", String::from_utf8_lossy(.output))]
    CommandFailed {
        /// Exit code reported for the shell process.
        exit_code: i32,
        /// Combined stdout and stderr captured before exit.
        output: Vec<u8>,
    },

    /// The shell binary could not be started.
    #[error("failed to spawn shell '{shell}': {source}")]
    Spawn {
        shell: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while draining output or waiting on the child.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid invocation state transition attempted.
    #[error("invalid state transition from {from:?} to {to:?}")]
    InvalidStateTransition {
        from: InvocationState,
        to: InvocationState,
    },
}

impl ShellTaskError {
    /// Whether this failure happened before anything was spawned.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::MissingCommand)
    }

    /// Whether the shell ran and exited with a non-zero status.
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }

    /// Exit code of a failed command, if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }

    /// Output captured from a failed command, if any.
    pub fn output(&self) -> Option<&[u8]> {
        match self {
            Self::CommandFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Convenience Result type for shell-task operations.
pub type Result<T> = std::result::Result<T, ShellTaskError>;
