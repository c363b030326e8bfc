//! Test reporting seam.
//!
//! The orchestrator talks to a `Reporter` trait rather than printing
//! directly, so alternative output formats (JSON, TAP, etc.) can be added
//! by implementing the trait. The default `ConsoleReporter` prints one
//! line per test plus a colored summary.

use std::time::Duration;

/// Verdict for one test unit.
#[derive(Debug)]
pub enum TestResult {
    Passed(Duration),
    /// Failure detail: one line per collected mismatch, or a timeout/spawn
    /// diagnostic.
    Failed(Duration, String),
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Passed(_))
    }
}

/// Tally of a finished suite run.
#[derive(Debug)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration: Duration,
}

/// Implement to customize test output format.
pub trait Reporter {
    /// Called once discovery and filtering are done.
    fn on_collection_complete(&mut self, test_count: usize);

    /// Called as each test unit settles, in completion order. `options`
    /// holds the test's parsed advisory option tokens.
    fn on_test_complete(&mut self, path: &str, options: &[String], result: &TestResult);

    /// Called after every unit has settled.
    fn on_run_complete(&mut self, summary: &SuiteSummary);
}

/// Default console reporter.
#[derive(Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn on_collection_complete(&mut self, test_count: usize) {
        if test_count == 0 {
            eprintln!("No tests collected");
        } else {
            println!("collected {} test(s)", test_count);
        }
    }

    fn on_test_complete(&mut self, path: &str, options: &[String], result: &TestResult) {
        match result {
            TestResult::Passed(d) => {
                if self.verbose {
                    println!("{} \x1b[32mPASSED\x1b[0m ({:.0}ms)", path, d.as_millis());
                } else {
                    println!("{} \x1b[32mPASSED\x1b[0m", path);
                }
            }
            TestResult::Failed(d, detail) => {
                if self.verbose {
                    println!("{} \x1b[31mFAILED\x1b[0m ({:.0}ms)", path, d.as_millis());
                } else {
                    println!("{} \x1b[31mFAILED\x1b[0m", path);
                }
                for line in detail.lines() {
                    println!("    {}", line);
                }
            }
        }

        if self.verbose && !options.is_empty() {
            println!("    options: {}", options.join(", "));
        }
    }

    fn on_run_complete(&mut self, summary: &SuiteSummary) {
        let color = if summary.failed > 0 {
            "\x1b[1;31m"
        } else {
            "\x1b[1;32m"
        };

        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("{} passed", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if parts.is_empty() {
            parts.push("no tests run".to_string());
        }

        println!();
        println!(
            "{}=================== {} in {:.2}s ===================\x1b[0m",
            color,
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
    }
}
