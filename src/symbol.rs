//! Grammar symbols for the SLR(1) analysis engine.
//!
//! Symbols are string-coded rather than interned to numeric ids: the
//! map-keyed design used throughout this crate is clearer at
//! teaching-scale grammars and the lookup cost is negligible. Avoid
//! interning symbols here — only production ids are interned, because
//! the parse table references them densely (see `table.rs`).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The epsilon sentinel (empty right-hand side).
pub const EPSILON: &str = "\u{3b5}";
/// The end-of-input sentinel.
pub const END_MARKER: &str = "#";

/// A single grammar symbol.
///
/// # Grammar conventions
/// - Non-terminals are upper-case or multi-letter identifiers and are
///   exactly the keys of a `GrammarSet`'s production map.
/// - Terminals are any other token that appears on a right-hand side.
/// - `Epsilon` is the empty-string sentinel `ε`.
/// - `EndMarker` is the end-of-input sentinel `#`.
/// - The dot in a dotted item is tracked out-of-band (as a `usize`
///   position on `Item`, see `item.rs`) rather than as a symbol variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// A terminal symbol, carrying its lexeme/name.
    Terminal(String),
    /// A non-terminal symbol.
    NonTerminal(String),
    /// The empty string ε.
    Epsilon,
    /// The end-of-input marker #.
    EndMarker,
}

impl Symbol {
    /// Builds a terminal symbol.
    pub fn terminal(name: impl Into<String>) -> Self {
        Symbol::Terminal(name.into())
    }

    /// Builds a non-terminal symbol.
    pub fn non_terminal(name: impl Into<String>) -> Self {
        Symbol::NonTerminal(name.into())
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    #[inline]
    pub fn is_non_terminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }

    #[inline]
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    #[inline]
    pub fn is_end_marker(&self) -> bool {
        matches!(self, Symbol::EndMarker)
    }

    /// Returns the textual name carried by this symbol.
    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(s) | Symbol::NonTerminal(s) => s,
            Symbol::Epsilon => EPSILON,
            Symbol::EndMarker => END_MARKER,
        }
    }

    /// Classifies a raw token string into a symbol, given the set of
    /// known non-terminal names. Used while loading a grammar: any rhs
    /// token that is not a key of the production map is a terminal.
    pub fn classify(token: &str, non_terminals: &std::collections::HashSet<String>) -> Self {
        if token == EPSILON || token == "e" {
            Symbol::Epsilon
        } else if token == END_MARKER {
            Symbol::EndMarker
        } else if non_terminals.contains(token) {
            Symbol::NonTerminal(token.to_string())
        } else {
            Symbol::Terminal(token.to_string())
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Ordering used when a deterministic symbol sequence is required: CSV
/// column headers list terminals (including `#`) then non-terminals,
/// each block lexicographic (spec §4.4).
impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(s: &Symbol) -> u8 {
            match s {
                Symbol::Epsilon => 0,
                Symbol::Terminal(_) => 1,
                Symbol::EndMarker => 1,
                Symbol::NonTerminal(_) => 2,
            }
        }
        rank(self)
            .cmp(&rank(other))
            .then_with(|| self.name().cmp(other.name()))
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
