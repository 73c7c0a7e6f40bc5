//! End-to-end driver tests: build a table from a small grammar, then
//! drive a parse over it, with and without semantic actions attached.
//!
//! The baseline 47-production grammar (spec §6.2) has genuine SLR(1)
//! conflicts by construction (dangling-else, flat expression
//! precedence — see `tests/table_tests.rs` and DESIGN.md), so these
//! happy-path driver tests use small conflict-free grammars instead;
//! the semantic action catalogue itself is exercised directly, against
//! spec's literal traces, in `src/semantic/actions.rs`'s own tests.

use tac_engine::semantic::actions::{build_action_table, SemanticContext};
use tac_engine::{Driver, EngineError, GrammarSet, ItemCluster, Process, SlrTable, Symbol};

fn lines(s: &[&str]) -> Vec<String> {
    s.iter().map(|s| s.to_string()).collect()
}

fn build(rules: &[&str]) -> (GrammarSet, SlrTable) {
    let grammar = GrammarSet::parse(&lines(rules)).unwrap();
    let cluster = ItemCluster::build(&grammar).unwrap();
    let table = SlrTable::build(&grammar, &cluster).unwrap();
    (grammar, table)
}

#[test]
fn a_minimal_declaration_is_parsed_and_registers_a_symbol_table_entry() {
    // D -> T d ; T -> int   (matches the "D -> T d" action shape).
    let (grammar, table) = build(&["D -> T d", "T -> int"]);
    let actions = build_action_table(&grammar);

    let tokens = vec![
        (Symbol::terminal("int"), "int".to_string()),
        (Symbol::terminal("d"), "count".to_string()),
    ];

    let mut ctx = SemanticContext::new();
    let mut driver = Driver::new(&grammar, &table);
    let result = driver.parse(&tokens, Some(&actions), &mut ctx);
    assert!(result.is_ok());
    assert!(matches!(driver.trace().last(), Some(Process::Accept)));

    let system_table = ctx.tables.get("system_table").unwrap();
    assert!(system_table.local("count").is_some());
}

#[test]
fn trace_records_one_shift_per_token_and_ends_with_accept() {
    let (grammar, table) = build(&["E -> E + T | T", "T -> i"]);
    let tokens = vec![
        (Symbol::terminal("i"), "1".to_string()),
        (Symbol::terminal("+"), "+".to_string()),
        (Symbol::terminal("i"), "2".to_string()),
        (Symbol::terminal("+"), "+".to_string()),
        (Symbol::terminal("i"), "3".to_string()),
    ];
    let mut ctx = SemanticContext::new();
    let mut driver = Driver::new(&grammar, &table);
    driver.parse(&tokens, None, &mut ctx).unwrap();

    let shifts = driver
        .trace()
        .iter()
        .filter(|p| matches!(p, Process::Shift { .. }))
        .count();
    assert_eq!(shifts, tokens.len());
    assert!(matches!(driver.trace().last(), Some(Process::Accept)));
}

#[test]
fn newlines_in_the_token_stream_are_skipped_without_affecting_the_parse() {
    let (grammar, table) = build(&["E -> E + T | T", "T -> i"]);
    let tokens = vec![
        (Symbol::terminal("i"), "1".to_string()),
        (Symbol::terminal("NEWLINE"), "\n".to_string()),
        (Symbol::terminal("+"), "+".to_string()),
        (Symbol::terminal("i"), "2".to_string()),
    ];
    let mut ctx = SemanticContext::new();
    let mut driver = Driver::new(&grammar, &table);
    assert!(driver.parse(&tokens, None, &mut ctx).is_ok());
}

#[test]
fn an_unexpected_token_is_a_parse_error_naming_the_offending_state() {
    let (grammar, table) = build(&["E -> E + T | T", "T -> i"]);
    let tokens = vec![(Symbol::terminal("+"), "+".to_string())];
    let mut ctx = SemanticContext::new();
    let mut driver = Driver::new(&grammar, &table);
    assert!(matches!(
        driver.parse(&tokens, None, &mut ctx),
        Err(EngineError::Parse { .. })
    ));
}

#[test]
fn a_genuinely_ambiguous_table_reports_a_parse_conflict_instead_of_guessing() {
    // Dangling-else: after `if ( b ) x` the parser can shift `else` or
    // reduce `S -> if ( b ) S`, and both are legal SLR(1) actions.
    let (grammar, table) = build(&[
        "S -> if ( B ) S | if ( B ) S else S | x",
        "B -> b",
    ]);
    assert!(!table.conflicts().is_empty());

    let tokens = vec![
        (Symbol::terminal("if"), "if".to_string()),
        (Symbol::terminal("("), "(".to_string()),
        (Symbol::terminal("b"), "b".to_string()),
        (Symbol::terminal(")"), ")".to_string()),
        (Symbol::terminal("x"), "x".to_string()),
        (Symbol::terminal("else"), "else".to_string()),
        (Symbol::terminal("x"), "x".to_string()),
    ];
    let mut ctx = SemanticContext::new();
    let mut driver = Driver::new(&grammar, &table);
    assert!(matches!(
        driver.parse(&tokens, None, &mut ctx),
        Err(EngineError::ParseConflict { .. })
    ));
}
