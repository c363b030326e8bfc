//! CLI module for the xtest harness
//!
//! ## Commands
//!
//! - `run [PATH] --interpreter <EXE>` - Run the conformance suite
//! - `list [PATH]` - List discovered test programs without running them
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::harness::{self, ConsoleReporter, HarnessError, SuiteConfig};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Conformance test harness for external interpreter executables
#[derive(Parser, Debug)]
#[command(name = "xtest")]
#[command(version = VERSION)]
#[command(about = "Conformance test harness for interpreter executables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover and run the conformance suite
    Run {
        /// Root directory of test programs
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
        /// Interpreter executable, invoked as `<EXE> <file>`
        #[arg(short, long, value_name = "EXE")]
        interpreter: PathBuf,
        /// Test-program file suffix
        #[arg(long, default_value = harness::DEFAULT_SUFFIX)]
        suffix: String,
        /// Per-test wall-clock budget in seconds
        #[arg(long, value_name = "SECS", default_value_t = 10)]
        timeout: u64,
        /// Maximum concurrent interpreter processes (0 = unbounded)
        #[arg(short, long, value_name = "N")]
        jobs: Option<usize>,
        /// Filter tests by path substring
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
        /// Verbose output (per-test durations)
        #[arg(short, long)]
        verbose: bool,
    },

    /// List discovered test programs without running them
    List {
        /// Root directory of test programs
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
        /// Test-program file suffix
        #[arg(long, default_value = harness::DEFAULT_SUFFIX)]
        suffix: String,
        /// Filter tests by path substring
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            path,
            interpreter,
            suffix,
            timeout,
            jobs,
            filter,
            verbose,
        } => {
            let config = SuiteConfig {
                interpreter,
                root: path,
                suffix,
                timeout: Duration::from_secs(timeout),
                jobs: jobs.unwrap_or_else(harness::default_jobs),
                filter,
            };
            run_suite_command(config, verbose)
        }
        Command::List {
            path,
            suffix,
            filter,
        } => list_command(&path, &suffix, filter.as_deref()),
    }
}

/// Run the full suite on a fresh tokio runtime.
fn run_suite_command(config: SuiteConfig, verbose: bool) -> CliResult<ExitCode> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::failure(format!("failed to start async runtime: {e}")))?;

    let mut reporter = ConsoleReporter::new(verbose);
    let summary = runtime
        .block_on(harness::run_suite(config, &mut reporter))
        .map_err(render_fatal)?;

    if summary.failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Print discovered test paths, one per line.
fn list_command(path: &std::path::Path, suffix: &str, filter: Option<&str>) -> CliResult<ExitCode> {
    for p in &list_paths(path, suffix, filter)? {
        println!("{}", p);
    }
    Ok(ExitCode::SUCCESS)
}

/// The discovery sequence `list` prints, after keyword filtering.
fn list_paths(
    path: &std::path::Path,
    suffix: &str,
    filter: Option<&str>,
) -> CliResult<Vec<String>> {
    let mut paths = harness::discovery::discover(path, suffix).map_err(render_fatal)?;
    if let Some(keyword) = filter {
        paths.retain(|p| p.contains(keyword));
    }
    Ok(paths)
}

/// Render a fatal harness error through miette's fancy report.
fn render_fatal(error: HarnessError) -> CliError {
    CliError::failure(format!("{:?}", miette::Report::new(error)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli =
            Cli::try_parse_from(["xtest", "run", "fixtures", "--interpreter", "bin/alox"]).unwrap();
        if let Command::Run {
            path, interpreter, ..
        } = cli.command
        {
            assert_eq!(path, PathBuf::from("fixtures"));
            assert_eq!(interpreter, PathBuf::from("bin/alox"));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["xtest", "run", "-i", "bin/alox"]).unwrap();
        if let Command::Run {
            path,
            suffix,
            timeout,
            jobs,
            verbose,
            ..
        } = cli.command
        {
            assert_eq!(path, PathBuf::from("."));
            assert_eq!(suffix, ".lox");
            assert_eq!(timeout, 10);
            assert_eq!(jobs, None);
            assert!(!verbose);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "xtest", "run", "-i", "bin/alox", "--timeout", "3", "-j", "2", "-k", "closure", "-v",
        ])
        .unwrap();
        if let Command::Run {
            timeout,
            jobs,
            filter,
            verbose,
            ..
        } = cli.command
        {
            assert_eq!(timeout, 3);
            assert_eq!(jobs, Some(2));
            assert_eq!(filter.as_deref(), Some("closure"));
            assert!(verbose);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::try_parse_from(["xtest", "list", "fixtures", "--suffix", ".alox"]).unwrap();
        if let Command::List { path, suffix, .. } = cli.command {
            assert_eq!(path, PathBuf::from("fixtures"));
            assert_eq!(suffix, ".alox");
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn test_run_requires_interpreter() {
        assert!(Cli::try_parse_from(["xtest", "run", "fixtures"]).is_err());
    }

    fn tree_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tree")
    }

    #[test]
    fn test_list_matches_discovery_sequence() {
        let root = tree_root();
        let listed = list_paths(&root, ".lox", None).unwrap();
        let discovered = harness::discovery::discover(&root, ".lox").unwrap();
        assert_eq!(listed, discovered);
        assert_eq!(listed, vec!["a.lox", "sub/b.lox", "sub/deep/c.lox"]);
    }

    #[test]
    fn test_list_filter_narrows_by_substring() {
        let listed = list_paths(&tree_root(), ".lox", Some("sub")).unwrap();
        assert_eq!(listed, vec!["sub/b.lox", "sub/deep/c.lox"]);
    }
}
