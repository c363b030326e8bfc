//! Fatal harness errors.
//!
//! Only two things abort a whole run: an unreadable directory during
//! discovery, and an interpreter path that does not point at a file.
//! Everything else (unreadable test file, spawn failure, timeout, output
//! mismatch) is scoped to a single test and becomes a `TestResult::Failed`.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    /// A directory in the fixture tree could not be read. Fatal on purpose:
    /// a broken tree must not silently shrink the test set.
    #[error("failed to read test directory '{path}'")]
    #[diagnostic(code(xtest::discovery))]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The interpreter executable was missing before any test was spawned.
    #[error("interpreter '{path}' is not a file")]
    #[diagnostic(
        code(xtest::interpreter),
        help("pass the interpreter executable with --interpreter")
    )]
    InterpreterNotFound { path: PathBuf },
}
