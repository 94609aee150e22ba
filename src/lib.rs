//! # shell-task
//!
//! Run a shell command as one step of a larger pipeline.
//!
//! A [`ShellTask`] is configured once with an optional default command,
//! working directory, environment overrides and shell. Each call spawns
//! `[shell, "-c", command]`, captures stdout and stderr as one interleaved
//! byte stream, and returns it on exit code 0. A non-zero exit becomes
//! [`ShellTaskError::CommandFailed`] carrying the code and the output.
//!
//! ## Features
//!
//! - **Two-tier parameters**: call-time values win over configured defaults
//! - **Inherited environment**: overrides are layered on a snapshot of the parent's environment
//! - **Combined output**: stdout and stderr share one pipe, so ordering is preserved
//! - **Injectable collaborators**: environment snapshots and process spawning are traits
//!
//! ## Quick Start
//!
//! ```no_run
//! use shell_task::{Invocation, ShellTask, TaskConfig};
//!
//! fn main() -> shell_task::Result<()> {
//!     shell_task::logging::try_init().ok();
//!
//!     let task = ShellTask::new(TaskConfig::new().with_env("FOO", "bar"));
//!     let output = task.run_with(&Invocation::new().command("echo $FOO"))?;
//!     assert_eq!(output, b"bar\n");
//!
//!     Ok(())
//! }
//! ```
//!
//! The command string is handed to the shell as-is. With a working
//! directory it becomes `cd <dir> && <command>`, and both parts are shell
//! syntax: never build either from untrusted input.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod task;

// Re-export commonly used types
pub use error::{Result, ShellTaskError};
pub use task::{
    EnvironmentSnapshot, FixedEnvironment, Invocation, InvocationState, ProcessEnvironment,
    ProcessOutput, ProcessSpawner, ShellTask, SpawnRequest, SystemSpawner, TaskConfig,
};
