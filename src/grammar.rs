//! Grammar storage: productions, symbol sets, and memoised FIRST/FOLLOW.

use crate::error::{EngineError, Result};
use crate::first_follow::{compute_first_sets, compute_follow_sets, FirstSets, FollowSets};
use crate::symbol::{Symbol, EPSILON};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A single production `lhs -> rhs`.
///
/// Two productions are equal iff `lhs` and `rhs` match pairwise; an rhs
/// of length 1 containing `ε` represents the empty production.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Production {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs }
    }

    /// True for the `A -> ε` productions produced by an empty alternative.
    pub fn is_epsilon(&self) -> bool {
        matches!(self.rhs.as_slice(), [s] if s.is_epsilon())
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rhs_str = if self.is_epsilon() {
            EPSILON.to_string()
        } else {
            self.rhs
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(" ")
        };
        write!(f, "{} -> {}", self.lhs, rhs_str)
    }
}

/// A context-free grammar: productions, derived symbol sets, and
/// memoised FIRST/FOLLOW tables.
#[derive(Debug)]
pub struct GrammarSet {
    productions: Vec<Production>,
    production_map: HashMap<Symbol, Vec<Production>>,
    non_terminals: HashSet<Symbol>,
    terminals: HashSet<Symbol>,
    start_symbol: Symbol,
    first_cache: RefCell<Option<FirstSets>>,
    follow_cache: RefCell<Option<FollowSets>>,
}

impl GrammarSet {
    /// Loads a grammar from its text form: one production per line,
    /// `LHS -> alt1 | alt2 | ...`, tokens separated by whitespace. The
    /// literal `ε` denotes the empty rhs and must be the sole rhs
    /// token. Blank lines are skipped. The first LHS encountered is the
    /// start symbol.
    pub fn parse(lines: &[String]) -> Result<Self> {
        let mut start_symbol: Option<Symbol> = None;
        let mut non_terminals: HashSet<String> = HashSet::new();
        let mut raw_lines: Vec<(String, Vec<String>)> = Vec::new();

        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(2, "->");
            let lhs = parts
                .next()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| EngineError::GrammarFormat(format!("missing lhs: {line:?}")))?
                .to_string();
            let rhs = parts
                .next()
                .ok_or_else(|| EngineError::GrammarFormat(format!("missing '->': {line:?}")))?
                .trim()
                .to_string();
            if start_symbol.is_none() {
                start_symbol = Some(Symbol::non_terminal(lhs.clone()));
            }
            non_terminals.insert(lhs.clone());
            raw_lines.push((lhs, rhs));
        }

        let start_symbol = start_symbol.ok_or(EngineError::GrammarFormat(
            "grammar has no productions".into(),
        ))?;

        let mut productions = Vec::new();
        for (lhs, rhs) in &raw_lines {
            for alt in rhs.split('|') {
                let tokens: Vec<&str> = alt.split_whitespace().collect();
                if tokens.is_empty() {
                    return Err(EngineError::GrammarFormat(format!(
                        "empty alternative for {lhs}"
                    )));
                }
                let rhs_symbols: Vec<Symbol> = tokens
                    .iter()
                    .map(|t| Symbol::classify(t, &non_terminals))
                    .collect();
                productions.push(Production::new(Symbol::non_terminal(lhs.clone()), rhs_symbols));
            }
        }

        Self::from_productions(productions, start_symbol)
    }

    /// Builds a grammar set from an explicit production list and start
    /// symbol (used by JSON loading and by tests).
    pub fn from_productions(productions: Vec<Production>, start_symbol: Symbol) -> Result<Self> {
        if productions.is_empty() {
            return Err(EngineError::GrammarFormat("no productions given".into()));
        }

        let non_terminals: HashSet<Symbol> = productions.iter().map(|p| p.lhs.clone()).collect();

        let terminals: HashSet<Symbol> = productions
            .iter()
            .flat_map(|p| p.rhs.iter())
            .filter(|s| s.is_terminal())
            .cloned()
            .collect();

        let mut production_map: HashMap<Symbol, Vec<Production>> = HashMap::new();
        for prod in &productions {
            production_map
                .entry(prod.lhs.clone())
                .or_default()
                .push(prod.clone());
        }

        Ok(Self {
            productions,
            production_map,
            non_terminals,
            terminals,
            start_symbol,
            first_cache: RefCell::new(None),
            follow_cache: RefCell::new(None),
        })
    }

    /// Loads a grammar from its serialised JSON form (productions plus
    /// start symbol).
    pub fn from_json(text: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Wire {
            start_symbol: Symbol,
            productions: Vec<Production>,
        }
        let wire: Wire = serde_json::from_str(text)?;
        Self::from_productions(wire.productions, wire.start_symbol)
    }

    /// Serialises this grammar to JSON.
    pub fn to_json(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Wire<'a> {
            start_symbol: &'a Symbol,
            productions: &'a [Production],
        }
        let wire = Wire {
            start_symbol: &self.start_symbol,
            productions: &self.productions,
        };
        Ok(serde_json::to_string_pretty(&wire)?)
    }

    pub fn productions(&self, lhs: &Symbol) -> &[Production] {
        self.production_map
            .get(lhs)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn all_productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn non_terminals(&self) -> &HashSet<Symbol> {
        &self.non_terminals
    }

    pub fn terminals(&self) -> &HashSet<Symbol> {
        &self.terminals
    }

    pub fn start_symbol(&self) -> &Symbol {
        &self.start_symbol
    }

    /// FIRST(symbol), computed and memoised on first use.
    pub fn first(&self, symbol: &Symbol) -> HashSet<Symbol> {
        self.ensure_first();
        self.first_cache
            .borrow()
            .as_ref()
            .unwrap()
            .get(symbol)
            .cloned()
            .unwrap_or_default()
    }

    /// FIRST of a symbol sequence (used by FOLLOW and by item lookahead).
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> HashSet<Symbol> {
        self.ensure_first();
        let cache = self.first_cache.borrow();
        let first_sets = cache.as_ref().unwrap();
        crate::first_follow::first_of_string(first_sets, symbols)
    }

    /// FOLLOW(non_terminal), computed and memoised on first use.
    pub fn follow(&self, non_terminal: &Symbol) -> HashSet<Symbol> {
        self.ensure_follow();
        self.follow_cache
            .borrow()
            .as_ref()
            .unwrap()
            .get(non_terminal)
            .cloned()
            .unwrap_or_default()
    }

    fn ensure_first(&self) {
        if self.first_cache.borrow().is_none() {
            *self.first_cache.borrow_mut() = Some(compute_first_sets(self));
        }
    }

    fn ensure_follow(&self) {
        self.ensure_first();
        if self.follow_cache.borrow().is_none() {
            let first = self.first_cache.borrow().clone().unwrap();
            *self.follow_cache.borrow_mut() = Some(compute_follow_sets(self, &first));
        }
    }
}

impl fmt::Display for GrammarSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prod in &self.productions {
            writeln!(f, "{prod}")?;
        }
        Ok(())
    }
}
