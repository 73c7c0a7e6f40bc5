//! Integration tests for the grammar module.

use tac_engine::{GrammarSet, Symbol};

fn lines(s: &[&str]) -> Vec<String> {
    s.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_parse_simple_grammar() {
    let grammar = GrammarSet::parse(&lines(&["S -> A B", "A -> a"])).unwrap();
    assert_eq!(grammar.all_productions().len(), 2);
    assert!(grammar.non_terminals().contains(&Symbol::non_terminal("S")));
    assert!(grammar.terminals().contains(&Symbol::terminal("a")));
}

#[test]
fn test_parse_alternatives_split_on_the_pipe() {
    let grammar = GrammarSet::parse(&lines(&["S -> a | b | c"])).unwrap();
    assert_eq!(grammar.all_productions().len(), 3);
}

#[test]
fn test_empty_grammar_is_an_error() {
    let result = GrammarSet::parse(&[]);
    assert!(result.is_err());
}

#[test]
fn test_productions_for_a_non_terminal() {
    let grammar = GrammarSet::parse(&lines(&["S -> A B | A C", "A -> a"])).unwrap();
    let s_prods = grammar.productions(&Symbol::non_terminal("S"));
    assert_eq!(s_prods.len(), 2);
}

#[test]
fn test_start_symbol_is_the_first_lhs_seen() {
    let grammar = GrammarSet::parse(&lines(&["S -> a"])).unwrap();
    assert_eq!(grammar.start_symbol(), &Symbol::non_terminal("S"));
}

#[test]
fn test_epsilon_production() {
    let grammar = GrammarSet::parse(&lines(&["S -> e"])).unwrap();
    let prods = grammar.productions(&Symbol::non_terminal("S"));
    assert_eq!(prods[0].rhs, vec![Symbol::Epsilon]);
    assert!(prods[0].is_epsilon());
}

#[test]
fn test_a_classic_arithmetic_grammar() {
    let grammar = GrammarSet::parse(&lines(&[
        "S -> S + T | T",
        "T -> T * F | F",
        "F -> ( S ) | i",
    ]))
    .unwrap();
    assert_eq!(grammar.all_productions().len(), 6);
    assert!(grammar.terminals().contains(&Symbol::terminal("+")));
    assert!(grammar.terminals().contains(&Symbol::terminal("*")));
    assert!(grammar.terminals().contains(&Symbol::terminal("(")));
    assert!(grammar.terminals().contains(&Symbol::terminal(")")));
    assert!(grammar.terminals().contains(&Symbol::terminal("i")));
}

#[test]
fn test_json_round_trips_productions_and_start_symbol() {
    let grammar = GrammarSet::parse(&lines(&["S -> A B", "A -> a | e", "B -> b"])).unwrap();
    let json = grammar.to_json().unwrap();
    let reloaded = GrammarSet::from_json(&json).unwrap();
    assert_eq!(reloaded.all_productions(), grammar.all_productions());
    assert_eq!(reloaded.start_symbol(), grammar.start_symbol());
}

#[test]
fn test_malformed_line_without_an_arrow_is_a_grammar_format_error() {
    let result = GrammarSet::parse(&lines(&["S a b"]));
    assert!(result.is_err());
}
