#![forbid(unsafe_code)]
//! xtest: conformance test harness for external interpreter executables
//!
//! xtest runs an opaque interpreter binary against a tree of annotated
//! test-program files and checks the captured output against expectations
//! embedded as comments in each file:
//!
//! ```text
//! print 1;          // expect: 1
//! print undefined;  // error: Undefined variable 'undefined'.
//! ```
//!
//! The harness only consumes the process interface: `<executable> <file>`,
//! line-oriented text on stdout/stderr, exit code 0 for success. See the
//! [`harness`] module for the comparison contract (it is deliberately a
//! prefix match, and stderr is only checked for non-zero exits).
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling: production code uses
//! `Result` with `?` (the `cli` module enforces
//! `#![deny(clippy::unwrap_used)]`); `.unwrap()` is acceptable in tests.

pub mod cli;
pub mod harness;

pub use harness::{
    ConsoleReporter, ExecutionResult, ExpectationSet, HarnessError, Mismatch, Reporter, Stream,
    SuiteConfig, SuiteSummary, TestResult, run_suite,
};
