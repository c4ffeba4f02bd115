use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed library of boundary patterns that regex-relative positions can
/// anchor to.
///
/// Declaration order doubles as the tie-break order used by the search:
/// earlier tokens are preferred when several patterns explain the same cut
/// point across all examples.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Token {
    /// A run of decimal digits.
    Digits,
    /// A run of letters.
    Alphabets,
    /// A run of letters and digits.
    Alphanumeric,
    /// A run of uppercase letters.
    Uppercase,
    /// A run of lowercase letters.
    Lowercase,
    /// An uppercase letter followed by lowercase letters.
    ProperCase,
    /// A run of whitespace.
    Whitespace,
    /// A run of characters that are neither alphanumeric nor whitespace.
    Symbols,
    /// A literal `.`.
    Dot,
    /// A literal `,`.
    Comma,
    /// A literal `-`.
    Hyphen,
    /// A literal `_`.
    Underscore,
    /// A literal `/`.
    Slash,
    /// A literal `:`.
    Colon,
    /// A literal `@`.
    At,
}

use Token::*;

// 0-indexed, end exclusive
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

pub const ALL_TOKENS: &[Token] = &[
    Digits,
    Alphabets,
    Alphanumeric,
    Uppercase,
    Lowercase,
    ProperCase,
    Whitespace,
    Symbols,
    Dot,
    Comma,
    Hyphen,
    Underscore,
    Slash,
    Colon,
    At,
];

impl Token {
    /// All non-overlapping matches of this token in `s`, left to right.
    pub fn all_matches(&self, s: &str) -> Vec<Span> {
        match self.separator() {
            Some(sep) => {
                let mut matches = Vec::new();
                let mut offset = 0;
                while let Some(start) = s[offset..].find(sep) {
                    let start = offset + start;
                    let end = start + sep.len();
                    matches.push(Span { start, end });
                    offset = end;
                }
                matches
            }
            None => self
                .to_regex()
                .find_iter(s)
                .map(|m| Span {
                    start: m.start(),
                    end: m.end(),
                })
                .collect(),
        }
    }

    // single-character separators are found literally, everything else via regex
    fn separator(&self) -> Option<&'static str> {
        match self {
            Dot => Some("."),
            Comma => Some(","),
            Hyphen => Some("-"),
            Underscore => Some("_"),
            Slash => Some("/"),
            Colon => Some(":"),
            At => Some("@"),
            _ => None,
        }
    }

    fn to_regex(&self) -> &Regex {
        match self {
            Digits => {
                lazy_static! {
                    static ref RE: Regex = Regex::new(r"\d+").unwrap();
                }
                &RE
            }
            Alphabets => {
                lazy_static! {
                    static ref RE: Regex = Regex::new(r"\p{L}+").unwrap();
                }
                &RE
            }
            Alphanumeric => {
                lazy_static! {
                    static ref RE: Regex = Regex::new(r"[\p{L}\d]+").unwrap();
                }
                &RE
            }
            Uppercase => {
                lazy_static! {
                    static ref RE: Regex = Regex::new(r"\p{Lu}+").unwrap();
                }
                &RE
            }
            Lowercase => {
                lazy_static! {
                    static ref RE: Regex = Regex::new(r"\p{Ll}+").unwrap();
                }
                &RE
            }
            ProperCase => {
                lazy_static! {
                    static ref RE: Regex = Regex::new(r"\p{Lu}\p{Ll}+").unwrap();
                }
                &RE
            }
            Whitespace => {
                lazy_static! {
                    static ref RE: Regex = Regex::new(r"\s+").unwrap();
                }
                &RE
            }
            Symbols => {
                lazy_static! {
                    static ref RE: Regex = Regex::new(r"[^\p{L}\d\s]+").unwrap();
                }
                &RE
            }
            Dot | Comma | Hyphen | Underscore | Slash | Colon | At => {
                panic!("token {:?} is matched literally, not by regex", self)
            }
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Digits => "digits",
            Alphabets => "alphabets",
            Alphanumeric => "alphanumeric",
            Uppercase => "uppercase",
            Lowercase => "lowercase",
            ProperCase => "propercase",
            Whitespace => "whitespace",
            Symbols => "symbols",
            Dot => "dot",
            Comma => "comma",
            Hyphen => "hyphen",
            Underscore => "underscore",
            Slash => "slash",
            Colon => "colon",
            At => "at",
        };
        write!(f, "{}", name)
    }
}
