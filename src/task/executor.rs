//! The shell task executor.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::command::compose_command;
use super::config::{resolve, resolve_required, Invocation, TaskConfig};
use super::environment::{compose_environment, EnvironmentSnapshot, ProcessEnvironment};
use super::spawner::{ProcessSpawner, SpawnRequest, SystemSpawner};
use super::state::InvocationState;
use crate::error::ShellTaskError;
use crate::Result;

/// A configured, reusable shell step.
///
/// The task holds only read-only configuration. Every call builds its own
/// environment and spawns its own process, so one task can be run from
/// several threads at once.
#[derive(Clone)]
pub struct ShellTask {
    config: TaskConfig,
    environment: Arc<dyn EnvironmentSnapshot>,
    spawner: Arc<dyn ProcessSpawner>,
}

impl ShellTask {
    /// Create a task that inherits the process environment and spawns real processes.
    pub fn new(config: TaskConfig) -> Self {
        Self {
            config,
            environment: Arc::new(ProcessEnvironment),
            spawner: Arc::new(SystemSpawner),
        }
    }

    /// Replace the base environment provider.
    pub fn with_environment(mut self, environment: impl EnvironmentSnapshot + 'static) -> Self {
        self.environment = Arc::new(environment);
        self
    }

    /// Replace the process spawner.
    pub fn with_spawner(mut self, spawner: impl ProcessSpawner + 'static) -> Self {
        self.spawner = Arc::new(spawner);
        self
    }

    /// Run the configured command with the configured overrides.
    pub fn run(&self) -> Result<Vec<u8>> {
        self.run_with(&Invocation::default())
    }

    /// Run one invocation and return the combined output on exit code 0.
    ///
    /// # Errors
    ///
    /// - [`ShellTaskError::MissingCommand`] if neither the invocation nor the
    ///   configuration supplies a command. Nothing is spawned.
    /// - [`ShellTaskError::CommandFailed`] if the shell exits non-zero.
    /// - [`ShellTaskError::Spawn`] if the shell cannot be started.
    pub fn run_with(&self, invocation: &Invocation) -> Result<Vec<u8>> {
        let mut state = InvocationState::Idle;
        state.transition_to(InvocationState::Composing)?;

        let command = match resolve_required(
            invocation.command.as_deref(),
            self.config.command.as_deref(),
        ) {
            Ok(command) => command,
            Err(e) => {
                state.transition_to(InvocationState::FailedConfig)?;
                warn!("no command supplied or configured");
                return Err(e);
            }
        };

        let overrides = resolve(invocation.env.as_ref(), self.config.env.as_ref());
        let command = compose_command(command, self.config.working_directory.as_deref());
        let env = compose_environment(self.environment.snapshot(), overrides);

        debug!(
            shell = %self.config.shell,
            command = %command,
            overrides = overrides.map_or(0, |o| o.len()),
            "running shell task"
        );

        state.transition_to(InvocationState::Spawned)?;
        let result = self.spawner.spawn(&SpawnRequest {
            shell: &self.config.shell,
            command: &command,
            env: &env,
        });

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                state.transition_to(InvocationState::FailedExitCode)?;
                return Err(e);
            }
        };

        if output.success() {
            state.transition_to(InvocationState::Succeeded)?;
            info!(bytes = output.output.len(), "shell task succeeded");
            Ok(output.output)
        } else {
            state.transition_to(InvocationState::FailedExitCode)?;
            warn!(exit_code = output.exit_code, "shell task failed");
            Err(ShellTaskError::CommandFailed {
                exit_code: output.exit_code,
                output: output.output,
            })
        }
    }

    /// Run one invocation on tokio's blocking thread pool.
    ///
    /// No timeout is applied; wrap the future in `tokio::time::timeout` if
    /// the caller needs one. Dropping the future does not kill the process.
    pub async fn run_async(&self, invocation: Invocation) -> Result<Vec<u8>> {
        let task = self.clone();
        tokio::task::spawn_blocking(move || task.run_with(&invocation))
            .await
            .map_err(|e| ShellTaskError::Io(std::io::Error::other(e)))?
    }
}

impl Default for ShellTask {
    fn default() -> Self {
        Self::new(TaskConfig::default())
    }
}

impl fmt::Debug for ShellTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellTask")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{FixedEnvironment, ProcessOutput};
    use std::collections::HashMap;
    use std::ffi::{OsStr, OsString};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every request and replies with a canned result.
    #[derive(Clone, Default)]
    struct SpySpawner {
        calls: Arc<AtomicUsize>,
        last: Arc<Mutex<Option<(String, String, HashMap<OsString, OsString>)>>>,
        exit_code: i32,
        output: Vec<u8>,
    }

    impl SpySpawner {
        fn replying(exit_code: i32, output: &[u8]) -> Self {
            Self {
                exit_code,
                output: output.to_vec(),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last(&self) -> (String, String, HashMap<OsString, OsString>) {
            self.last.lock().unwrap().clone().unwrap()
        }
    }

    impl ProcessSpawner for SpySpawner {
        fn spawn(&self, request: &SpawnRequest<'_>) -> Result<ProcessOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((
                request.shell.to_string(),
                request.command.to_string(),
                request.env.clone(),
            ));
            Ok(ProcessOutput {
                exit_code: self.exit_code,
                output: self.output.clone(),
            })
        }
    }

    fn task_with(config: TaskConfig, spy: &SpySpawner) -> ShellTask {
        ShellTask::new(config)
            .with_environment(FixedEnvironment::new([("PATH", "/bin"), ("HOME", "/root")]))
            .with_spawner(spy.clone())
    }

    #[test]
    fn test_missing_command_spawns_nothing() {
        let spy = SpySpawner::replying(0, b"");
        let task = task_with(TaskConfig::new(), &spy);

        let err = task.run().unwrap_err();
        assert!(matches!(err, ShellTaskError::MissingCommand));
        assert_eq!(spy.calls(), 0);
    }

    #[test]
    fn test_call_command_wins_over_default() {
        let spy = SpySpawner::replying(0, b"ok");
        let task = task_with(TaskConfig::new().with_command("echo default"), &spy);

        task.run_with(&Invocation::new().command("echo call")).unwrap();
        assert_eq!(spy.last().1, "echo call");

        task.run().unwrap();
        assert_eq!(spy.last().1, "echo default");
        assert_eq!(spy.calls(), 2);
    }

    #[test]
    fn test_request_uses_shell_and_cd_prefix() {
        let spy = SpySpawner::replying(0, b"");
        let config = TaskConfig::new()
            .with_command("ls")
            .with_working_directory("/usr/bin")
            .with_shell("zsh");
        task_with(config, &spy).run().unwrap();

        let (shell, command, _) = spy.last();
        assert_eq!(shell, "zsh");
        assert_eq!(command, "cd /usr/bin && ls");
    }

    #[test]
    fn test_env_overrides_merged_onto_snapshot() {
        let spy = SpySpawner::replying(0, b"");
        let config = TaskConfig::new()
            .with_command("env")
            .with_env("HOME", "/home/x");
        let task = task_with(config, &spy);

        task.run().unwrap();
        let env = spy.last().2;
        assert_eq!(env.get(OsStr::new("HOME")), Some(&OsString::from("/home/x")));
        assert_eq!(env.get(OsStr::new("PATH")), Some(&OsString::from("/bin")));

        // Call-time overrides replace the configured mapping entirely.
        task.run_with(&Invocation::new().env("FOO", "bar")).unwrap();
        let env = spy.last().2;
        assert_eq!(env.get(OsStr::new("FOO")), Some(&OsString::from("bar")));
        assert_eq!(env.get(OsStr::new("HOME")), Some(&OsString::from("/root")));
    }

    #[test]
    fn test_nonzero_exit_is_command_failed() {
        let spy = SpySpawner::replying(3, b"oops\n");
        let task = task_with(TaskConfig::new().with_command("exit 3"), &spy);

        let err = task.run().unwrap_err();
        assert_eq!(err.exit_code(), Some(3));
        assert_eq!(err.output(), Some(&b"oops\n"[..]));
        assert!(err.to_string().contains("exit code 3"));
    }

    #[test]
    fn test_success_returns_bytes_unmodified() {
        let spy = SpySpawner::replying(0, b"  raw\r\n\xff");
        let task = task_with(TaskConfig::new().with_command("x"), &spy);
        assert_eq!(task.run().unwrap(), b"  raw\r\n\xff");
    }

    #[test]
    fn test_debug_shows_config() {
        let task = ShellTask::new(TaskConfig::new().with_command("echo hi"));
        assert!(format!("{task:?}").contains("echo hi"));
    }
}
