//! Synthesis of string transformation programs from input-output examples.
//!
//! This crate learns a small string-transformation program from a handful of
//! demonstrated examples and applies it to further inputs. The approach is
//! the one popularized by [Flash
//! Fill](https://support.microsoft.com/en-us/office/using-flash-fill-in-excel-3f9bcf1e-db93-4890-94a0-1578341f73f7)
//! in Excel: the user shows a transformation instead of writing it.
//!
//! | Input | Output |
//! |---|---|
//! | http://www.example.com | example |
//! | https://www.apple.com/uk/mac | apple |
//! | https://www.google.com | ? |
//!
//! The engine decomposes the example outputs into pieces, enumerates the
//! symbolic substring extractions that could produce each piece, and keeps
//! only the descriptions that hold in *every* example, so the learned
//! program extrapolates to unseen inputs rather than memorizing offsets.
//!
//! ```
//! let examples = [("http://www.example.com", Some("example")),
//!                 ("https://www.apple.com/uk/mac", Some("apple"))];
//! let tests = ["https://www.google.com"];
//!
//! let result = mimic::synthesize(&examples, &tests);
//! assert!(result.program.is_some());
//! assert_eq!(result.test_results, vec![Some(String::from("google"))]);
//! ```
//!
//! Learned programs belong to a deliberately restricted language: literal
//! constants and substring extractions whose cut points are absolute offsets
//! or token-match boundaries, concatenated together. Transformations outside
//! that language (loops, semantic mappings like "3" to "March") cannot be
//! learned, and [`synthesize`] reports that by returning no program.

#![warn(missing_docs)]

mod language;
mod search;
mod spec;
mod token;

pub use language::{AtomicExpression, Delta, Direction, Occurrence, Position, Program};
pub use spec::{Limits, SynthesisError};
pub use token::Token;

use serde::Serialize;
use spec::Specification;
use tracing::debug;

/// The outcome of one synthesis request.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Synthesis {
    /// The synthesized program, or `None` when no program in the search
    /// space reproduces every example.
    pub program: Option<Program>,
    /// One entry per test input, in the order the tests were given. An entry
    /// is `None` when no program was found at all or when the program fails
    /// to evaluate on that input; the two causes are not distinguished here.
    pub test_results: Vec<Option<String>>,
}

/// Learns a program from input-output examples and runs it on every test
/// input.
///
/// Examples with an absent or empty output contribute no evidence but are
/// harmless to include, so a caller may pass the same rows both as examples
/// and as tests. Synthesis failure is not an error: it yields a [`Synthesis`]
/// with no program and all-`None` results.
///
/// ```
/// let examples = [("I have 17 cookies", Some("17")),
///                 ("Give me at least 3 cookies", Some("3"))];
///
/// let result = mimic::synthesize(&examples, &["36"]);
/// assert_eq!(result.test_results, vec![Some(String::from("36"))]);
/// ```
pub fn synthesize<S: AsRef<str>>(examples: &[(S, Option<S>)], tests: &[S]) -> Synthesis {
    synthesize_with_limits(examples, tests, &Limits::default())
}

/// Like [`synthesize`], with explicit search bounds.
pub fn synthesize_with_limits<S: AsRef<str>>(
    examples: &[(S, Option<S>)],
    tests: &[S],
    limits: &Limits,
) -> Synthesis {
    let program = learn_with_limits(examples, limits).ok();
    let test_results = tests
        .iter()
        .map(|test| program.as_ref().and_then(|p| p.run(test.as_ref())))
        .collect();
    Synthesis {
        program,
        test_results,
    }
}

/// Learns a program from input-output examples.
///
/// This is the synthesis half of [`synthesize`], for callers that want to
/// keep the program and run it themselves, or that care why learning failed.
///
/// ```
/// use mimic::learn;
///
/// let examples = [("First Last", Some("F.L.")), ("Hi Aref", Some("H.A."))];
/// let program = learn(&examples)?;
/// assert_eq!(program.run("Bed Time"), Some(String::from("B.T.")));
/// # Ok::<(), mimic::SynthesisError>(())
/// ```
pub fn learn<S: AsRef<str>>(examples: &[(S, Option<S>)]) -> Result<Program, SynthesisError> {
    learn_with_limits(examples, &Limits::default())
}

/// Like [`learn`], with explicit search bounds.
pub fn learn_with_limits<S: AsRef<str>>(
    examples: &[(S, Option<S>)],
    limits: &Limits,
) -> Result<Program, SynthesisError> {
    let spec = Specification::build(examples, limits)?;
    debug!(evidence = spec.examples.len(), "built specification");
    search::generalize(&spec, limits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_evidence_yields_empty_outcome() {
        let examples = [("a", None)];
        let result = synthesize(&examples, &["a"]);
        assert_eq!(result.program, None);
        assert_eq!(result.test_results, vec![None]);
    }

    #[test]
    fn empty_request_is_not_an_error() {
        let examples: [(&str, Option<&str>); 0] = [];
        let result = synthesize(&examples, &[]);
        assert_eq!(result.program, None);
        assert!(result.test_results.is_empty());
    }

    #[test]
    fn evidence_rows_can_be_tests_too() {
        let examples = [
            ("http://www.example.com", Some("example")),
            ("https://www.apple.com/uk/mac", Some("apple")),
        ];
        let tests = ["http://www.example.com", "https://www.apple.com/uk/mac"];
        let result = synthesize(&examples, &tests);
        assert_eq!(
            result.test_results,
            vec![Some(String::from("example")), Some(String::from("apple"))]
        );
    }
}
