//! Running external tools.

use std::io;
use std::path::Path;
use std::process::Command;

/// Runs an external program and reports its exit code.
///
/// The build engine talks to compilers, linkers and strip tools only through
/// this trait, so tests can substitute a runner that fabricates outputs.
pub trait ToolRunner: Send + Sync {
    /// Runs `program` with `args` in `cwd`, blocking until it exits.
    ///
    /// Returns the exit code, or an error if the program could not be started.
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<i32>;
}

/// Runs tools as child processes sharing this process's stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<i32> {
        tracing::debug!(cwd = %cwd.display(), "{}", display_command(program, args));
        let status = Command::new(program).args(args).current_dir(cwd).status()?;
        // Killed by a signal: no exit code.
        Ok(status.code().unwrap_or(1))
    }
}

/// Renders a command line with POSIX shell quoting, for logs only.
pub fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .map(shell_quote)
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+,@%".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
