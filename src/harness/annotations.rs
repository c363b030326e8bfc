//! Annotation extraction from test-program text.
//!
//! Test programs embed their expectations as comment directives, one per
//! line, matched anywhere in the line:
//!
//! ```text
//! print 1 + 1; // expect: 2
//! foo();       // error: Undefined variable 'foo'.
//! // option: bytecode
//! ```
//!
//! `expect:` and `error:` payloads are taken verbatim to the end of the
//! line; `option:` payloads are trimmed. No payload validation happens
//! here: an empty or odd-looking payload is carried through as-is, and a
//! file with no directives yields an empty (vacuously passing) set.

/// Marker for an expected standard-output line.
pub const EXPECT_MARKER: &str = "// expect: ";
/// Marker for an expected standard-error line.
pub const ERROR_MARKER: &str = "// error: ";
/// Marker for a free-form per-test option token.
pub const OPTION_MARKER: &str = "// option: ";

/// Expectations extracted from one test program, in source-line order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectationSet {
    /// Expected standard-output lines.
    pub output: Vec<String>,
    /// Expected standard-error lines (consulted only for non-zero exits).
    pub errors: Vec<String>,
    /// Option tokens. Advisory only; execution does not consume them yet.
    pub options: Vec<String>,
}

impl ExpectationSet {
    pub fn is_empty(&self) -> bool {
        self.output.is_empty() && self.errors.is_empty() && self.options.is_empty()
    }
}

/// Scan `source` line by line and collect every directive.
///
/// The three markers are checked independently: a line carrying more than
/// one marker appends to every matching sequence.
pub fn parse(source: &str) -> ExpectationSet {
    let mut set = ExpectationSet::default();

    for line in source.split('\n') {
        if let Some(payload) = tail_after(line, EXPECT_MARKER) {
            set.output.push(payload.to_string());
        }
        if let Some(payload) = tail_after(line, ERROR_MARKER) {
            set.errors.push(payload.to_string());
        }
        if let Some(payload) = tail_after(line, OPTION_MARKER) {
            set.options.push(payload.trim().to_string());
        }
    }

    set
}

/// Everything after the first occurrence of `marker`, or `None`.
fn tail_after<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker).map(|at| &line[at + marker.len()..])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn collects_markers_in_source_order() {
        let set = parse("print 1; // expect: 1\nprint 2; // expect: 2\n");
        assert_eq!(set.output, vec!["1", "2"]);
        assert!(set.errors.is_empty());
        assert!(set.options.is_empty());
    }

    #[test]
    fn marker_may_appear_anywhere_in_the_line() {
        let set = parse("var x = nil;    // error: Undefined variable 'x'.");
        assert_eq!(set.errors, vec!["Undefined variable 'x'."]);
    }

    #[test]
    fn option_payload_is_trimmed() {
        let set = parse("// option:   bytecode  ");
        assert_eq!(set.options, vec!["bytecode"]);
    }

    #[test]
    fn expect_payload_is_kept_verbatim() {
        let set = parse("// expect:   spaced   ");
        assert_eq!(set.output, vec!["  spaced   "]);
    }

    #[test]
    fn empty_payload_passes_through() {
        let set = parse("// expect: \n// error: ");
        assert_eq!(set.output, vec![""]);
        assert_eq!(set.errors, vec![""]);
    }

    #[test]
    fn lines_without_markers_are_ignored() {
        let set = parse("print 1;\n// a plain comment\nexpect nothing here\n");
        assert!(set.is_empty());
    }

    #[test]
    fn marker_without_trailing_space_does_not_match() {
        let set = parse("// expect:1");
        assert!(set.is_empty());
    }

    #[test]
    fn one_line_may_feed_multiple_sequences() {
        // The checks are independent; `expect:` grabs the rest of the line
        // greedily, so the `error:` marker text is part of its payload too.
        let set = parse("// expect: a // error: b");
        assert_eq!(set.output, vec!["a // error: b"]);
        assert_eq!(set.errors, vec!["b"]);
    }

    #[test]
    fn mixed_directive_snapshot() {
        let source = "\
print clock(); // expect: 0
bad token here // error: Unexpected character.
// option: bytecode
print done; // expect: done
";
        insta::assert_debug_snapshot!(parse(source), @r#"
        ExpectationSet {
            output: [
                "0",
                "done",
            ],
            errors: [
                "Unexpected character.",
            ],
            options: [
                "bytecode",
            ],
        }
        "#);
    }

    proptest::proptest! {
        #[test]
        fn parsing_is_idempotent(source in ".*") {
            let first = parse(&source);
            let second = parse(&source);
            proptest::prop_assert_eq!(first, second);
        }

        #[test]
        fn payload_round_trips_through_expect(payload in "[^\n\r]*") {
            let source = format!("// expect: {payload}");
            let set = parse(&source);
            proptest::prop_assert_eq!(&set.output, &vec![payload]);
        }
    }
}
