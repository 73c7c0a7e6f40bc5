//! FIRST and FOLLOW set computation, as fixed-point iterations over a
//! [`GrammarSet`](crate::grammar::GrammarSet).

use crate::grammar::GrammarSet;
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};

pub type FirstSets = HashMap<Symbol, HashSet<Symbol>>;
pub type FollowSets = HashMap<Symbol, HashSet<Symbol>>;

/// Computes FIRST for every terminal and non-terminal in `grammar`.
///
/// Terminals seed as singletons; non-terminals start empty and are
/// grown by repeated scans over every production until no set changes.
/// This is the fixed-point form of the recursive definition; a
/// left-recursive non-terminal simply contributes nothing on the round
/// that would otherwise recurse into itself; the next round picks up
/// what earlier productions already added.
pub fn compute_first_sets(grammar: &GrammarSet) -> FirstSets {
    let mut first_sets: FirstSets = HashMap::new();

    for terminal in grammar.terminals() {
        first_sets.insert(terminal.clone(), HashSet::from([terminal.clone()]));
    }
    first_sets.insert(Symbol::Epsilon, HashSet::from([Symbol::Epsilon]));
    first_sets.insert(Symbol::EndMarker, HashSet::from([Symbol::EndMarker]));
    for non_terminal in grammar.non_terminals() {
        first_sets.entry(non_terminal.clone()).or_default();
    }

    let mut changed = true;
    while changed {
        changed = false;
        for production in grammar.all_productions() {
            let rhs_first = first_of_string(&first_sets, &production.rhs);
            let current = first_sets.entry(production.lhs.clone()).or_default();
            let before = current.len();
            current.extend(rhs_first);
            if current.len() != before {
                changed = true;
            }
        }
    }

    first_sets
}

/// FIRST of a symbol sequence, given already-computed per-symbol FIRST
/// sets: union `FIRST(X1) - {ε}`, and continue into `X2` etc. as long
/// as every preceding symbol is nullable; add `ε` if the whole
/// sequence is nullable (including the empty sequence).
pub fn first_of_string(first_sets: &FirstSets, symbols: &[Symbol]) -> HashSet<Symbol> {
    let mut result = HashSet::new();
    let mut nullable_prefix = true;

    for symbol in symbols {
        if !nullable_prefix {
            break;
        }
        let first_sym = first_sets.get(symbol).cloned().unwrap_or_default();
        result.extend(first_sym.iter().filter(|s| !s.is_epsilon()).cloned());
        nullable_prefix = first_sym.contains(&Symbol::Epsilon);
    }

    if nullable_prefix {
        result.insert(Symbol::Epsilon);
    }

    result
}

/// Computes FOLLOW for every non-terminal: seeds `FOLLOW(start) ⊇ {#}`,
/// then for every production `A -> α B β` adds `FIRST(β) - {ε}` to
/// `FOLLOW(B)`, and `FOLLOW(A)` as well when β is empty or nullable.
/// Fixed point over all productions.
pub fn compute_follow_sets(grammar: &GrammarSet, first_sets: &FirstSets) -> FollowSets {
    let mut follow_sets: FollowSets = HashMap::new();
    for non_terminal in grammar.non_terminals() {
        follow_sets.entry(non_terminal.clone()).or_default();
    }
    follow_sets
        .entry(grammar.start_symbol().clone())
        .or_default()
        .insert(Symbol::EndMarker);

    let mut changed = true;
    while changed {
        changed = false;
        for production in grammar.all_productions() {
            let rhs = &production.rhs;
            for (i, symbol) in rhs.iter().enumerate() {
                if !symbol.is_non_terminal() {
                    continue;
                }
                let beta = &rhs[i + 1..];
                let first_beta = first_of_string(first_sets, beta);

                let mut addition: HashSet<Symbol> = first_beta
                    .iter()
                    .filter(|s| !s.is_epsilon())
                    .cloned()
                    .collect();
                if beta.is_empty() || first_beta.contains(&Symbol::Epsilon) {
                    if let Some(follow_lhs) = follow_sets.get(&production.lhs) {
                        addition.extend(follow_lhs.iter().cloned());
                    }
                }

                let entry = follow_sets.entry(symbol.clone()).or_default();
                let before = entry.len();
                entry.extend(addition);
                if entry.len() != before {
                    changed = true;
                }
            }
        }
    }

    follow_sets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_of_terminal_is_itself() {
        let g = GrammarSet::parse(&lines(&["E -> E + T | T", "T -> i"])).unwrap();
        let first = compute_first_sets(&g);
        assert_eq!(
            first.get(&Symbol::terminal("i")),
            Some(&HashSet::from([Symbol::terminal("i")]))
        );
    }

    #[test]
    fn first_propagates_through_left_recursion() {
        let g = GrammarSet::parse(&lines(&["E -> E + T | T", "T -> i"])).unwrap();
        let first = compute_first_sets(&g);
        assert_eq!(
            first.get(&Symbol::non_terminal("E")),
            Some(&HashSet::from([Symbol::terminal("i")]))
        );
    }

    #[test]
    fn follow_of_start_contains_end_marker() {
        let g = GrammarSet::parse(&lines(&["E -> E + T | T", "T -> i"])).unwrap();
        let first = compute_first_sets(&g);
        let follow = compute_follow_sets(&g, &first);
        assert!(follow
            .get(&Symbol::non_terminal("E"))
            .unwrap()
            .contains(&Symbol::EndMarker));
    }

    #[test]
    fn follow_of_nullable_tail_includes_outer_follow() {
        let g = GrammarSet::parse(&lines(&["S -> A B", "A -> a | \u{3b5}", "B -> b"])).unwrap();
        let first = compute_first_sets(&g);
        let follow = compute_follow_sets(&g, &first);
        assert!(follow
            .get(&Symbol::non_terminal("A"))
            .unwrap()
            .contains(&Symbol::terminal("b")));
    }
}
