//! Out-of-process execution of one test program.
//!
//! The interpreter is invoked as `<executable> <file-path>` with stdin
//! closed and both output streams piped. The call resolves only once both
//! pipes have reached EOF *and* the process has exited; pipe closure is
//! the synchronization signal, so buffered output still in flight at exit
//! time is never lost.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::process::Command;

/// Captured outcome of one interpreter invocation, immutable once built.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Standard output split on `\n` (a trailing newline yields a trailing
    /// empty entry).
    pub stdout_lines: Vec<String>,
    /// Standard error split the same way.
    pub stderr_lines: Vec<String>,
    /// Exit code when the process returned one, the negated signal number
    /// on Unix when it was killed, `0` otherwise.
    pub status: i32,
    /// Observed wall-clock time.
    pub duration: Duration,
}

/// Why an invocation produced no [`ExecutionResult`].
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn interpreter: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("interpreter did not finish within {0:?} (process killed)")]
    Timeout(Duration),
}

/// Run `interpreter file` and drain it to completion within `budget`.
///
/// A single invocation, no retries, no output size limit. On timeout the
/// child is killed rather than left running detached.
#[tracing::instrument(skip_all, fields(file = %file.display()))]
pub async fn run(
    interpreter: &Path,
    file: &Path,
    budget: Duration,
) -> Result<ExecutionResult, ExecError> {
    let start = Instant::now();

    let child = Command::new(interpreter)
        .arg(file)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // Dropping the timed-out wait below must also reap the child.
        .kill_on_drop(true)
        .spawn()?;

    // wait_with_output drains both pipes concurrently and then waits for
    // the exit status.
    let output = match tokio::time::timeout(budget, child.wait_with_output()).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!(file = %file.display(), ?budget, "interpreter exceeded time budget, killing");
            return Err(ExecError::Timeout(budget));
        }
    };

    Ok(ExecutionResult {
        stdout_lines: split_lines(&String::from_utf8_lossy(&output.stdout)),
        stderr_lines: split_lines(&String::from_utf8_lossy(&output.stderr)),
        status: exit_code(&output.status),
        duration: start.elapsed(),
    })
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

fn exit_code(status: &std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_trailing_empty_entry() {
        assert_eq!(split_lines("1\n2\n"), vec!["1", "2", ""]);
        assert_eq!(split_lines(""), vec![""]);
    }
}
