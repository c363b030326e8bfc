//! Conformance harness core.
//!
//! Ties the pieces together: discover test programs, then for each one run
//! an independent test unit (read file → parse annotations → execute the
//! interpreter → compare output) and join the results.
//!
//! ## Concurrency
//!
//! Test units are spawned onto the tokio runtime as stack-local task
//! values with no shared mutable state; each owns its file content,
//! expectation set and execution result exclusively. The join is
//! wait-for-all: one slow or failing unit never blocks or hides the
//! results of its siblings. Fan-out is bounded by a semaphore
//! (`jobs` permits; `0` means unbounded).

pub mod annotations;
pub mod compare;
pub mod discovery;
pub mod error;
pub mod exec;
pub mod reporter;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub use annotations::ExpectationSet;
pub use compare::{Mismatch, Stream};
pub use error::HarnessError;
pub use exec::ExecutionResult;
pub use reporter::{ConsoleReporter, Reporter, SuiteSummary, TestResult};

/// Default test-program file suffix.
pub const DEFAULT_SUFFIX: &str = ".lox";
/// Default per-test wall-clock budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for one suite run.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Interpreter executable, invoked as `<interpreter> <file>`.
    pub interpreter: PathBuf,
    /// Root of the fixture tree.
    pub root: PathBuf,
    /// File-name suffix identifying test programs.
    pub suffix: String,
    /// Per-test wall-clock budget; exceeding it fails that test only.
    pub timeout: Duration,
    /// Maximum concurrently running interpreters; `0` means unbounded.
    pub jobs: usize,
    /// Substring filter over relative paths.
    pub filter: Option<String>,
}

impl SuiteConfig {
    pub fn new(interpreter: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            root: root.into(),
            suffix: DEFAULT_SUFFIX.to_string(),
            timeout: DEFAULT_TIMEOUT,
            jobs: default_jobs(),
            filter: None,
        }
    }
}

/// Default concurrency cap: host parallelism.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Discover, execute and compare every test under `config.root`.
///
/// Fatal errors (unreadable directory, missing interpreter) abort the run
/// before any test is spawned; everything else is reported per test.
#[tracing::instrument(skip_all, fields(root = %config.root.display()))]
pub async fn run_suite(
    config: SuiteConfig,
    reporter: &mut dyn Reporter,
) -> Result<SuiteSummary, HarnessError> {
    let start = Instant::now();

    if !config.interpreter.is_file() {
        return Err(HarnessError::InterpreterNotFound {
            path: config.interpreter.clone(),
        });
    }

    let mut paths = discovery::discover(&config.root, &config.suffix)?;
    if let Some(keyword) = &config.filter {
        paths.retain(|path| path.contains(keyword.as_str()));
    }

    reporter.on_collection_complete(paths.len());
    tracing::debug!(count = paths.len(), jobs = config.jobs, "starting test units");

    let permits = Arc::new(Semaphore::new(if config.jobs == 0 {
        Semaphore::MAX_PERMITS
    } else {
        config.jobs
    }));
    let config = Arc::new(config);

    let mut units = JoinSet::new();
    for path in paths {
        let config = Arc::clone(&config);
        let permits = Arc::clone(&permits);
        units.spawn(async move {
            // The semaphore stays open while units run; if that invariant
            // ever breaks, fail the unit rather than running uncapped.
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return (
                        path,
                        Vec::new(),
                        TestResult::Failed(
                            Duration::ZERO,
                            "concurrency limiter closed".to_string(),
                        ),
                    );
                }
            };
            let (options, result) = run_unit(&config, &path).await;
            (path, options, result)
        });
    }

    let mut summary = SuiteSummary {
        total: 0,
        passed: 0,
        failed: 0,
        duration: Duration::ZERO,
    };

    while let Some(joined) = units.join_next().await {
        match joined {
            Ok((path, options, result)) => {
                summary.total += 1;
                if result.is_pass() {
                    summary.passed += 1;
                } else {
                    summary.failed += 1;
                }
                reporter.on_test_complete(&path, &options, &result);
            }
            Err(join_error) => {
                tracing::error!(error = %join_error, "test unit aborted");
                summary.total += 1;
                summary.failed += 1;
            }
        }
    }

    summary.duration = start.elapsed();
    reporter.on_run_complete(&summary);
    Ok(summary)
}

/// One read → parse → execute → compare pipeline for a single test program.
///
/// Per-test irregularities (unreadable file, spawn failure, timeout)
/// become a `Failed` verdict for this test only. Parsed option tokens are
/// returned alongside the verdict so the reporter can surface them.
async fn run_unit(config: &SuiteConfig, rel_path: &str) -> (Vec<String>, TestResult) {
    let start = Instant::now();
    let file = config.root.join(rel_path);

    let source = match tokio::fs::read_to_string(&file).await {
        Ok(source) => source,
        Err(e) => {
            return (
                Vec::new(),
                TestResult::Failed(start.elapsed(), format!("failed to read file: {e}")),
            );
        }
    };

    let expected = annotations::parse(&source);
    let options = expected.options.clone();

    let result = match exec::run(&config.interpreter, &file, config.timeout).await {
        Ok(result) => result,
        Err(e) => return (options, TestResult::Failed(start.elapsed(), e.to_string())),
    };

    let mismatches = compare::compare(&expected, &result);
    let verdict = if mismatches.is_empty() {
        TestResult::Passed(result.duration)
    } else {
        let detail = mismatches
            .iter()
            .map(Mismatch::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        TestResult::Failed(result.duration, detail)
    };
    (options, verdict)
}
