use crate::language::{Delta, Direction, Occurrence, Position};
use crate::token::ALL_TOKENS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why synthesis produced no program.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum SynthesisError {
    /// No example had both an input and a non-empty output.
    #[error("no usable input-output examples to learn from")]
    NoEvidence,
    /// Two examples demand different outputs for the same input.
    #[error("examples demand different outputs for the same input")]
    Inconsistent,
    /// The bounded search space contains no program that reproduces every
    /// example.
    #[error("no program within the search bounds reproduces every example")]
    NoGeneralization,
}

/// Bounds on the synthesis search space.
///
/// These are configuration, not part of the algorithm's contract: growing
/// them trades search cost for coverage, roughly quadratically in
/// `max_offset` and `max_delta`.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Largest number of concatenated atoms to hypothesize.
    pub max_pieces: usize,
    /// Largest absolute offset from either end of the input.
    pub max_offset: usize,
    /// Largest shift applied after a token-match boundary.
    pub max_delta: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_pieces: 4,
            max_offset: 4,
            max_delta: 2,
        }
    }
}

/// One evidence example, with every position descriptor of its input
/// precomputed.
#[derive(Debug)]
pub(crate) struct Evidence {
    pub(crate) input: String,
    pub(crate) output: String,
    positions: Vec<Vec<Position>>,
}

impl Evidence {
    fn new(input: &str, output: &str, limits: &Limits) -> Self {
        Evidence {
            input: String::from(input),
            output: String::from(output),
            positions: position_table(input, limits),
        }
    }

    /// All position descriptors that resolve to byte index `i` of the input.
    pub(crate) fn positions_at(&self, i: usize) -> &[Position] {
        &self.positions[i]
    }
}

/// The evidence examples a program must reproduce, in submission order.
#[derive(Debug)]
pub(crate) struct Specification {
    pub(crate) examples: Vec<Evidence>,
}

impl Specification {
    /// Filters the raw examples down to usable evidence and precomputes
    /// position tables.
    ///
    /// Examples with an absent or empty output are not evidence; they are
    /// harmless to include and are simply skipped.
    pub(crate) fn build<S: AsRef<str>>(
        examples: &[(S, Option<S>)],
        limits: &Limits,
    ) -> Result<Self, SynthesisError> {
        let evidence: Vec<(&str, &str)> = examples
            .iter()
            .filter_map(|(input, output)| match output {
                Some(output) if !output.as_ref().is_empty() => {
                    Some((input.as_ref(), output.as_ref()))
                }
                _ => None,
            })
            .collect();
        if evidence.is_empty() {
            return Err(SynthesisError::NoEvidence);
        }
        for (i, (in1, out1)) in evidence.iter().enumerate() {
            for (in2, out2) in &evidence[i + 1..] {
                if in1 == in2 && out1 != out2 {
                    return Err(SynthesisError::Inconsistent);
                }
            }
        }
        Ok(Specification {
            examples: evidence
                .into_iter()
                .map(|(input, output)| Evidence::new(input, output, limits))
                .collect(),
        })
    }
}

/// For every byte index `0..=len` of `s`, the set of position descriptors
/// that resolve to it.
///
/// Absolute positions cover small offsets from both ends, so indices `0` and
/// `len` are always representable. Every token match contributes both of its
/// signed occurrence encodings (`+k` counting from the start, `k - n` from
/// the end), both boundaries, and every shift within the delta bound, the
/// same dual encoding the match itself would be found under when counting
/// from either end.
fn position_table(s: &str, limits: &Limits) -> Vec<Vec<Position>> {
    let len = s.len();
    let mut table: Vec<Vec<Position>> = vec![Vec::new(); len + 1];
    for i in 0..=len {
        if !s.is_char_boundary(i) {
            continue;
        }
        if i <= limits.max_offset {
            table[i].push(Position::FromStart(i));
        }
        if len - i <= limits.max_offset {
            table[i].push(Position::FromEnd(len - i));
        }
    }
    let max_delta = limits.max_delta as isize;
    for token in ALL_TOKENS {
        let matches = token.all_matches(s);
        let n = matches.len() as isize;
        for (m, span) in matches.iter().enumerate() {
            let occurrences = [
                Occurrence(m as isize + 1),
                Occurrence(m as isize - n),
            ];
            for dir in [Direction::Start, Direction::End] {
                let base = match dir {
                    Direction::Start => span.start,
                    Direction::End => span.end,
                } as isize;
                for delta in -max_delta..=max_delta {
                    let i = base + delta;
                    if i < 0 || i as usize > len || !s.is_char_boundary(i as usize) {
                        continue;
                    }
                    for occ in occurrences {
                        table[i as usize].push(Position::Match(*token, occ, dir, Delta(delta)));
                    }
                }
            }
        }
    }
    table
}
