use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A match occurrence index: positive `k` counts the k-th match from the
/// start of the string, negative `k` the k-th from the end. Never zero.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Occurrence(pub isize);

/// A byte offset applied after a match boundary has been resolved.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Delta(pub isize);

/// Which boundary of a token match anchors a position.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// The start boundary of the match.
    Start,
    /// The end boundary of the match.
    End,
}

/// A symbolic rule resolving to a byte index in `[0, len]` of some string.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Position {
    /// A fixed offset from the start of the string.
    FromStart(usize),
    /// A fixed offset from the end of the string.
    FromEnd(usize),
    /// A boundary of the k-th match of a token, shifted by a delta.
    Match(Token, Occurrence, Direction, Delta),
}

impl Position {
    /// Resolves this position against `s`, or fails if the described index
    /// does not exist in `s`.
    pub(crate) fn resolve(&self, s: &str) -> Option<usize> {
        match self {
            Position::FromStart(k) => {
                if *k <= s.len() && s.is_char_boundary(*k) {
                    Some(*k)
                } else {
                    None
                }
            }
            Position::FromEnd(k) => {
                let i = s.len().checked_sub(*k)?;
                if s.is_char_boundary(i) {
                    Some(i)
                } else {
                    None
                }
            }
            Position::Match(token, k, dir, delta) => {
                let matches = token.all_matches(s);
                let n = matches.len() as isize;
                let k = k.0;
                let k = if k > 0 { k - 1 } else { n + k };
                if !(0 <= k && k < n) {
                    return None;
                }
                let span = &matches[k as usize];
                let base = match dir {
                    Direction::Start => span.start,
                    Direction::End => span.end,
                };
                let i = base as isize + delta.0;
                if 0 <= i && i as usize <= s.len() && s.is_char_boundary(i as usize) {
                    Some(i as usize)
                } else {
                    None
                }
            }
        }
    }
}

// Candidate preference order: absolute positions before match-relative ones,
// and among matches occurrences closer to either end, positive before
// negative, then token declaration order, then smaller shifts. The search
// relies on this being a total order so synthesis is reproducible.
impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        use Position::*;
        match (self, other) {
            (FromStart(a), FromStart(b)) => a.cmp(b),
            (FromStart(_), _) => Ordering::Less,
            (_, FromStart(_)) => Ordering::Greater,
            (FromEnd(a), FromEnd(b)) => a.cmp(b),
            (FromEnd(_), _) => Ordering::Less,
            (_, FromEnd(_)) => Ordering::Greater,
            (Match(t1, k1, d1, e1), Match(t2, k2, d2, e2)) => k1
                .0
                .unsigned_abs()
                .cmp(&k2.0.unsigned_abs())
                .then((k1.0 < 0).cmp(&(k2.0 < 0)))
                .then(t1.cmp(t2))
                .then(e1.0.unsigned_abs().cmp(&e2.0.unsigned_abs()))
                .then(d1.cmp(d2))
                .then((e1.0 < 0).cmp(&(e2.0 < 0))),
        }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One slot of a synthesized program: a literal or a substring extraction.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub enum AtomicExpression {
    /// A literal string, independent of the input.
    Constant(String),
    /// Extracts `input[left..right]`.
    Substring(Position, Position),
}

impl AtomicExpression {
    pub(crate) fn run(&self, input: &str) -> Option<String> {
        match self {
            AtomicExpression::Constant(s) => Some(s.clone()),
            AtomicExpression::Substring(left, right) => {
                let l = left.resolve(input)?;
                let r = right.resolve(input)?;
                if l > r {
                    return None;
                }
                input.get(l..r).map(String::from)
            }
        }
    }
}

/// A synthesized string-transformation program: a concatenation of atomic
/// expressions.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub struct Program(pub Vec<AtomicExpression>);

impl Program {
    /// Runs the program on `input`.
    ///
    /// Returns `None` when any atom fails to evaluate, for example when a
    /// required token match does not exist in this input. There is no
    /// partial output: a program either produces a whole string or nothing.
    pub fn run(&self, input: &str) -> Option<String> {
        self.0.iter().fold(Some(String::new()), |acc, e| {
            acc.and_then(|mut s| {
                e.run(input).map(|part| {
                    s.push_str(&part);
                    s
                })
            })
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::FromStart(k) => write!(f, "start+{}", k),
            Position::FromEnd(k) => write!(f, "end-{}", k),
            Position::Match(token, k, dir, delta) => {
                let dir = match dir {
                    Direction::Start => "start",
                    Direction::End => "end",
                };
                write!(f, "{}[{}].{}", token, k.0, dir)?;
                if delta.0 != 0 {
                    write!(f, "{:+}", delta.0)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for AtomicExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomicExpression::Constant(s) => write!(f, "lit({:?})", s),
            AtomicExpression::Substring(l, r) => write!(f, "sub({}, {})", l, r),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", atom)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AtomicExpression::*;
    use Position::*;

    fn assert_eval(p: &Program, input: &str, expected: &str) {
        assert_eq!(p.run(input).unwrap(), String::from(expected));
    }

    #[test]
    fn extract_domain() {
        let p = Program(vec![Substring(
            Match(Token::Dot, Occurrence(1), Direction::End, Delta(0)),
            Match(Token::Dot, Occurrence(-1), Direction::Start, Delta(0)),
        )]);
        assert_eval(&p, "http://www.example.com", "example");
        assert_eval(&p, "https://www.google.com", "google");
    }

    #[test]
    fn initials() {
        let p = Program(vec![
            Substring(FromStart(0), FromStart(1)),
            Constant(String::from(".")),
            Substring(
                Match(Token::Whitespace, Occurrence(-1), Direction::End, Delta(0)),
                Match(Token::Whitespace, Occurrence(-1), Direction::End, Delta(1)),
            ),
            Constant(String::from(".")),
        ]);
        assert_eval(&p, "First Last", "F.L.");
        assert_eval(&p, "Bed Time", "B.T.");
    }

    #[test]
    fn missing_match_fails_whole_program() {
        let p = Program(vec![
            Constant(String::from("#")),
            Substring(
                Match(Token::Digits, Occurrence(1), Direction::Start, Delta(0)),
                Match(Token::Digits, Occurrence(1), Direction::End, Delta(0)),
            ),
        ]);
        assert_eq!(p.run("item 42"), Some(String::from("#42")));
        assert_eq!(p.run("no digits here"), None);
    }

    #[test]
    fn absolute_out_of_range_fails() {
        let p = Program(vec![Substring(FromStart(0), FromEnd(10))]);
        assert_eq!(p.run("short"), None);
        assert_eq!(p.run("exactly ten..."), Some(String::from("exac")));
    }

    #[test]
    fn crossed_positions_fail() {
        let p = Program(vec![Substring(FromStart(3), FromStart(1))]);
        assert_eq!(p.run("abcdef"), None);
    }

    #[test]
    fn equal_positions_yield_empty_string() {
        let p = Program(vec![Substring(FromStart(2), FromStart(2))]);
        assert_eq!(p.run("abcdef"), Some(String::new()));
    }

    #[test]
    fn delta_off_char_boundary_fails() {
        // the shifted index lands inside a multi-byte sequence
        let p = Program(vec![Substring(
            FromStart(0),
            Match(Token::Whitespace, Occurrence(1), Direction::End, Delta(1)),
        )]);
        assert_eq!(p.run("a é"), None);
        assert_eq!(p.run("a xy"), Some(String::from("a x")));
    }

    #[test]
    fn candidate_order() {
        let a = FromStart(0);
        let b = FromStart(3);
        let c = FromEnd(0);
        let d = Match(Token::Digits, Occurrence(1), Direction::Start, Delta(0));
        let e = Match(Token::Digits, Occurrence(-1), Direction::Start, Delta(0));
        let f = Match(Token::Alphabets, Occurrence(2), Direction::Start, Delta(0));
        let g = Match(Token::Digits, Occurrence(1), Direction::Start, Delta(-2));
        assert!(a < b && b < c && c < d);
        // positive occurrence before negative at equal magnitude
        assert!(d < e);
        // occurrence magnitude outranks token declaration order
        assert!(e < f);
        // zero delta before shifted
        assert!(d < g);
    }

    #[test]
    fn display_round_trip_readable() {
        let p = Program(vec![
            Substring(
                FromStart(0),
                Match(Token::Digits, Occurrence(-1), Direction::End, Delta(2)),
            ),
            Constant(String::from("!")),
        ]);
        assert_eq!(p.to_string(), "sub(start+0, digits[-1].end+2) + lit(\"!\")");
    }
}
