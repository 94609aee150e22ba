//! Command composition.

use std::path::Path;

/// Build the literal string handed to the shell's `-c` flag.
///
/// With a working directory the result is `cd <dir> && <command>`, so a
/// failed `cd` fails the whole step. The directory is inserted verbatim and
/// the result is interpreted by the shell as written; no quoting is applied.
pub fn compose_command(command: &str, working_directory: Option<&Path>) -> String {
    match working_directory {
        Some(dir) => format!("cd {} && {}", dir.display(), command),
        None => command.to_string(),
    }
}
