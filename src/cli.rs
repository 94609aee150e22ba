//! Command-line interface for shell-task.
//!
//! Uses lexopt for minimal binary size overhead (~34KB).

use std::ffi::OsString;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Command to run; overrides the configured default.
    pub command: Option<String>,
    /// Working directory to `cd` into first.
    pub cd: Option<PathBuf>,
    /// Shell binary.
    pub shell: Option<String>,
    /// Environment overrides given with `-e KEY=VALUE`.
    pub env: Vec<(String, String)>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
///
/// The first positional argument starts the command; it and everything
/// after it are joined with spaces, options included.
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('d') | Long("cd") => {
                result.cd = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("shell") => {
                result.shell = Some(parser.value()?.parse()?);
            }
            Short('e') | Long("env") => {
                let value: String = parser.value()?.parse()?;
                result.env.push(parse_env_pair(&value)?);
            }
            Short('f') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                let mut words = vec![val.string()?];
                for raw in parser.raw_args()? {
                    let word = raw.into_string().map_err(|bad| {
                        ArgsError::InvalidValue("command", bad.to_string_lossy().into())
                    })?;
                    words.push(word);
                }
                result.command = Some(words.join(" "));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

fn parse_env_pair(value: &str) -> Result<(String, String), ArgsError> {
    match value.split_once('=') {
        Some((key, val)) if !key.is_empty() => Ok((key.to_string(), val.to_string())),
        _ => Err(ArgsError::InvalidValue("env", value.to_string())),
    }
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"shell-task {version}
Run a shell command as a pipeline step

USAGE:
    shell-task [OPTIONS] [--] [COMMAND]...

OPTIONS:
    -d, --cd <DIR>          Directory to cd into before running the command
    -s, --shell <SHELL>     Shell to run the command with [default: bash]
    -e, --env <KEY=VALUE>   Environment override (repeatable)
    -f, --config <FILE>     Path to configuration file (JSON)
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    SHELL_TASK_COMMAND      Default command (overrides config)
    SHELL_TASK_CD           Working directory (overrides config)
    SHELL_TASK_SHELL        Shell (overrides config)
    SHELL_TASK_LOG_LEVEL    Log level (overrides config)
    RUST_LOG                Alternative log level setting

EXIT STATUS:
    0 on success, the command's exit code on failure, 2 on usage errors

EXAMPLES:
    # Run a command with bash
    shell-task echo hello

    # Run from another directory with an override
    shell-task -d /tmp -e GREETING=hi -- 'echo $GREETING from $(pwd)'

    # Run the command stored in a config file
    shell-task -f task.json
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("shell-task {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
