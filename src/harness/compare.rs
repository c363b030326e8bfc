//! Prefix-match comparison of an expectation set against captured output.
//!
//! The contract is deliberately asymmetric:
//!
//! - stdout is compared unconditionally, but only over the overlapping
//!   index range (`0..min(expected, actual)`). Trailing excess on either
//!   side is never a failure.
//! - stderr is compared with the same prefix rule, and only when the
//!   process exited non-zero. A clean exit never has its stderr checked,
//!   even when error expectations exist.
//! - The exit status itself is never asserted; its zero/non-zero value
//!   only gates the stderr check.
//!
//! All mismatches within a test are collected; comparison never
//! short-circuits at the first differing index.

use std::fmt;

use super::annotations::ExpectationSet;
use super::exec::ExecutionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => write!(f, "stdout"),
            Stream::Stderr => write!(f, "stderr"),
        }
    }
}

/// One differing line within the overlapping index range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub stream: Stream,
    pub index: usize,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: expected {:?}, got {:?}",
            self.stream, self.index, self.expected, self.actual
        )
    }
}

/// Compare `expected` against `result`; an empty return value is a pass.
pub fn compare(expected: &ExpectationSet, result: &ExecutionResult) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();

    collect(
        Stream::Stdout,
        &expected.output,
        &result.stdout_lines,
        &mut mismatches,
    );

    if result.status != 0 {
        collect(
            Stream::Stderr,
            &expected.errors,
            &result.stderr_lines,
            &mut mismatches,
        );
    }

    mismatches
}

fn collect(stream: Stream, expected: &[String], actual: &[String], out: &mut Vec<Mismatch>) {
    // zip stops at the shorter sequence, which is exactly the prefix rule.
    for (index, (want, got)) in expected.iter().zip(actual).enumerate() {
        if want != got {
            out.push(Mismatch {
                stream,
                index,
                expected: want.clone(),
                actual: got.clone(),
            });
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
