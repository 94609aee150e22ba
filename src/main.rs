//! Shell-task binary entry point.

use std::io::Write;
use std::process::ExitCode;

use shell_task::cli::{self, Args};
use shell_task::config::Config;
use shell_task::{logging, Invocation, ShellTask, ShellTaskError};
use tracing::{debug, error};

const USAGE_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Run 'shell-task --help' for usage.");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    let _ = logging::try_init_with(config.log_filter());
    debug!("shell-task v{}", env!("CARGO_PKG_VERSION"));

    run(config, args)
}

fn run(config: Config, args: Args) -> ExitCode {
    let task = ShellTask::new(config.task);
    let invocation = Invocation {
        command: args.command,
        env: None,
    };

    match task.run_with(&invocation) {
        Ok(output) => match write_output(&output) {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        },
        Err(e @ ShellTaskError::CommandFailed { .. }) => {
            let output = e.output().unwrap_or_default();
            if write_output(output).is_err() {
                return ExitCode::FAILURE;
            }
            error!("{e}");
            ExitCode::from(failure_exit_code(&e))
        }
        Err(e @ ShellTaskError::MissingCommand) => {
            eprintln!("error: {e}");
            eprintln!("Pass a command or set one in the config file.");
            ExitCode::from(USAGE_ERROR)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn write_output(output: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output)
        .and_then(|()| stdout.flush())
        .inspect_err(|e| eprintln!("error: failed to write output: {e}"))
}

/// Exit code for a failed command; codes outside 1..=255 become 1.
fn failure_exit_code(err: &ShellTaskError) -> u8 {
    err.exit_code()
        .and_then(|code| u8::try_from(code).ok())
        .filter(|c| *c != 0)
        .unwrap_or(1)
}
