//! Integration tests for the symbol module.

use std::collections::HashSet;
use tac_engine::Symbol;

#[test]
fn test_classify_distinguishes_every_kind() {
    let mut non_terminals = HashSet::new();
    non_terminals.insert("EXPR".to_string());

    assert_eq!(Symbol::classify("EXPR", &non_terminals), Symbol::non_terminal("EXPR"));
    assert_eq!(Symbol::classify("+", &non_terminals), Symbol::terminal("+"));
    assert_eq!(Symbol::classify("#", &non_terminals), Symbol::EndMarker);
    assert_eq!(Symbol::classify("e", &non_terminals), Symbol::Epsilon);
}

#[test]
fn test_ordering_places_epsilon_then_terminals_then_non_terminals() {
    assert!(Symbol::Epsilon < Symbol::terminal("a"));
    assert!(Symbol::terminal("a") < Symbol::non_terminal("A"));
    assert!(Symbol::non_terminal("A") < Symbol::EndMarker);
}

#[test]
fn test_terminal_and_end_marker_both_sort_in_the_same_csv_block() {
    // Spec 6.4: CSV columns list terminals (including #) then
    // non-terminals; # must not sort among the non-terminals.
    let mut symbols = vec![
        Symbol::non_terminal("E"),
        Symbol::EndMarker,
        Symbol::terminal("+"),
    ];
    symbols.sort();
    assert_eq!(symbols, vec![Symbol::terminal("+"), Symbol::EndMarker, Symbol::non_terminal("E")]);
}

#[test]
fn test_display_shows_the_bare_name() {
    assert_eq!(Symbol::terminal("if").to_string(), "if");
    assert_eq!(Symbol::non_terminal("S").to_string(), "S");
    assert_eq!(Symbol::EndMarker.to_string(), "#");
}

#[test]
fn test_equality_distinguishes_terminal_from_non_terminal_of_the_same_name() {
    assert_eq!(Symbol::terminal("a"), Symbol::terminal("a"));
    assert_ne!(Symbol::terminal("a"), Symbol::terminal("b"));
    assert_ne!(Symbol::terminal("a"), Symbol::non_terminal("a"));
}
