use crate::language::{AtomicExpression, Position, Program};
use crate::spec::{Evidence, Limits, Specification, SynthesisError};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

/// Finds the first program, in canonical candidate order, that reproduces
/// every evidence example, trying piece counts from smallest to largest so
/// the simplest explanation wins.
pub(crate) fn generalize(
    spec: &Specification,
    limits: &Limits,
) -> Result<Program, SynthesisError> {
    let mut search = Search {
        spec,
        failed: HashSet::new(),
    };
    for arity in 1..=limits.max_pieces {
        trace!(arity, "trying piece-count hypothesis");
        let offsets = vec![0; spec.examples.len()];
        if let Some(atoms) = search.fill_slots(arity, &offsets) {
            let program = Program(atoms);
            debug!(%program, arity, "synthesized program");
            return Ok(program);
        }
    }
    Err(SynthesisError::NoGeneralization)
}

struct Search<'a> {
    spec: &'a Specification,
    // (slots_left, per-example output offsets) states known not to lead to a
    // solution; whether a suffix of slots can be filled is independent of the
    // piece-count hypothesis that reached it, so the set is shared across
    // hypotheses
    failed: HashSet<(usize, Vec<usize>)>,
}

impl Search<'_> {
    /// Depth-first: pick an atom for the next slot that is valid for every
    /// example at its current output offset, advance each offset by what the
    /// atom produced for that example, and recurse.
    fn fill_slots(&mut self, slots_left: usize, offsets: &[usize]) -> Option<Vec<AtomicExpression>> {
        if slots_left == 0 {
            let done = self
                .spec
                .examples
                .iter()
                .zip(offsets)
                .all(|(ex, &o)| o == ex.output.len());
            return done.then(Vec::new);
        }
        let key = (slots_left, offsets.to_vec());
        if self.failed.contains(&key) {
            return None;
        }
        let last = slots_left == 1;
        for (atom, consumed) in self.slot_candidates(offsets, last) {
            let next: Vec<usize> = offsets.iter().zip(&consumed).map(|(o, c)| o + c).collect();
            if let Some(mut rest) = self.fill_slots(slots_left - 1, &next) {
                rest.insert(0, atom);
                return Some(rest);
            }
        }
        self.failed.insert(key);
        None
    }

    /// All atoms valid for one slot, paired with the number of output bytes
    /// each consumes per example, in canonical order: constants (longest
    /// first), then substring descriptor pairs in `Position` order.
    ///
    /// At the final slot only candidates that consume every example's whole
    /// remainder qualify.
    fn slot_candidates(
        &self,
        offsets: &[usize],
        last: bool,
    ) -> Vec<(AtomicExpression, Vec<usize>)> {
        let examples = &self.spec.examples;
        let mut candidates = Vec::new();

        let remainders: Vec<&str> = examples
            .iter()
            .zip(offsets)
            .map(|(ex, &o)| &ex.output[o..])
            .collect();

        // a constant is valid when it is a literal prefix of every example's
        // remainder, which makes it the shared prefix of all of them
        let mut lcp = remainders[0].len();
        for rem in &remainders[1..] {
            lcp = lcp.min(common_prefix_len(remainders[0], rem));
        }
        for len in (1..=lcp).rev() {
            if !remainders[0].is_char_boundary(len) {
                continue;
            }
            if last && remainders.iter().any(|rem| rem.len() != len) {
                continue;
            }
            candidates.push((
                AtomicExpression::Constant(String::from(&remainders[0][..len])),
                vec![len; examples.len()],
            ));
        }

        // substring candidates survive only by structural intersection: the
        // same descriptor pair must reproduce a piece in every example
        let maps: Vec<BTreeMap<(Position, Position), usize>> = examples
            .iter()
            .zip(offsets)
            .map(|(ex, &o)| pair_candidates(ex, o))
            .collect();
        let (first, rest) = maps.split_first().unwrap();
        'pairs: for (pair, &len) in first {
            let mut consumed = Vec::with_capacity(examples.len());
            consumed.push(len);
            for map in rest {
                match map.get(pair) {
                    Some(&len) => consumed.push(len),
                    None => continue 'pairs,
                }
            }
            if last
                && remainders
                    .iter()
                    .zip(&consumed)
                    .any(|(rem, &c)| rem.len() != c)
            {
                continue;
            }
            candidates.push((AtomicExpression::Substring(pair.0, pair.1), consumed));
        }

        trace!(candidates = candidates.len(), "slot candidates");
        candidates
    }
}

/// Every descriptor pair that extracts some prefix of this example's
/// remaining output from its input, mapped to the length of that prefix.
///
/// Enumeration is target-directed: for each prefix of the remainder, find
/// its occurrences in the input and cross the descriptor sets of the two cut
/// points. Zero-length pieces are hosted by any index, so a pair that
/// degenerates to an empty cut here may still extract real text in another
/// example.
fn pair_candidates(ex: &Evidence, offset: usize) -> BTreeMap<(Position, Position), usize> {
    let mut pairs = BTreeMap::new();
    let remainder = &ex.output[offset..];
    let input = ex.input.as_str();

    for i in 0..=input.len() {
        for left in ex.positions_at(i) {
            for right in ex.positions_at(i) {
                pairs.insert((*left, *right), 0);
            }
        }
    }

    for len in 1..=remainder.len() {
        let piece = match remainder.get(..len) {
            Some(piece) => piece,
            None => continue,
        };
        // all occurrences in the input, including overlapping ones
        let mut from = 0;
        while let Some(found) = input.get(from..).and_then(|rest| rest.find(piece)) {
            let start = from + found;
            let end = start + len;
            for left in ex.positions_at(start) {
                for right in ex.positions_at(end) {
                    pairs.insert((*left, *right), len);
                }
            }
            from = start + 1;
            while from < input.len() && !input.is_char_boundary(from) {
                from += 1;
            }
        }
    }
    pairs
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .take_while(|(x, y)| x == y)
        .count()
}
