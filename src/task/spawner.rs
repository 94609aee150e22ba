//! Process spawning with combined output capture.

use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, error};

use crate::error::ShellTaskError;
use crate::Result;

/// Everything needed to start one shell process.
#[derive(Debug, Clone, Copy)]
pub struct SpawnRequest<'a> {
    /// Shell binary.
    pub shell: &'a str,
    /// Composed command passed after `-c`.
    pub command: &'a str,
    /// Complete child environment.
    pub env: &'a HashMap<OsString, OsString>,
}

/// Outcome of a process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code of the shell.
    pub exit_code: i32,
    /// Interleaved stdout and stderr bytes.
    pub output: Vec<u8>,
}

impl ProcessOutput {
    /// Check if the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Starts a shell process and blocks until it exits.
pub trait ProcessSpawner: Send + Sync {
    /// Run `[shell, "-c", command]` with exactly `env` as its environment.
    ///
    /// Returns once the process has exited and its output is drained. A
    /// non-zero exit is not an error at this level.
    fn spawn(&self, request: &SpawnRequest<'_>) -> Result<ProcessOutput>;
}

/// Spawner backed by `std::process`.
///
/// Stdout and stderr share the write end of one pipe, so the captured
/// bytes keep the order the child wrote them in.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSpawner;

impl ProcessSpawner for SystemSpawner {
    fn spawn(&self, request: &SpawnRequest<'_>) -> Result<ProcessOutput> {
        let (mut reader, writer) = std::io::pipe()?;
        let stderr_writer = writer.try_clone()?;

        // The Command (and its copies of the write end) is dropped at the end
        // of this statement, so the reader sees EOF once the child exits.
        let mut child = Command::new(request.shell)
            .arg("-c")
            .arg(request.command)
            .env_clear()
            .envs(request.env)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr_writer)
            .spawn()
            .map_err(|source| {
                error!(shell = request.shell, %source, "failed to spawn shell");
                ShellTaskError::Spawn {
                    shell: request.shell.to_string(),
                    source,
                }
            })?;

        debug!(pid = child.id(), shell = request.shell, "shell spawned");

        let mut output = Vec::new();
        let drained = reader.read_to_end(&mut output);
        // Close our end first so a child still writing gets EPIPE instead of
        // blocking on a full pipe while we wait on it.
        drop(reader);
        let status = child.wait()?;
        drained?;

        Ok(ProcessOutput {
            exit_code: exit_code(status),
            output,
        })
    }
}

/// Map an exit status to a code, using `128 + signal` for signal deaths.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
