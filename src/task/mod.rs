//! The shell task: a reusable unit of work that runs one shell command.
//!
//! A [`ShellTask`] holds a [`TaskConfig`] captured at construction time.
//! Each call resolves its [`Invocation`] against that configuration, then:
//! - composes the command line (optional `cd <dir> && ` prefix)
//! - composes the child environment (inherited snapshot plus overrides)
//! - spawns `[shell, "-c", command]` and captures stdout and stderr as one stream
//!
//! # Example
//!
//! ```no_run
//! use shell_task::{Invocation, ShellTask, TaskConfig};
//!
//! let task = ShellTask::new(TaskConfig::new().with_working_directory("/tmp"));
//! let output = task.run_with(&Invocation::new().command("pwd")).unwrap();
//! assert_eq!(output, b"/tmp\n");
//! ```

mod command;
mod config;
mod environment;
mod executor;
mod spawner;
mod state;

pub use command::compose_command;
pub use config::{resolve, resolve_required, Invocation, TaskConfig, DEFAULT_SHELL};
pub use environment::{
    compose_environment, EnvironmentSnapshot, FixedEnvironment, ProcessEnvironment,
};
pub use executor::ShellTask;
pub use spawner::{ProcessOutput, ProcessSpawner, SpawnRequest, SystemSpawner};
pub use state::InvocationState;
