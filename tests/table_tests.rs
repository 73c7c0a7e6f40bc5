//! Integration tests for SLR(1) ACTION/GOTO table construction.

use pretty_assertions::assert_eq;
use tac_engine::table::{Action, ConflictKind};
use tac_engine::{EngineError, GrammarSet, ItemCluster, Symbol};

fn lines(s: &[&str]) -> Vec<String> {
    s.iter().map(|s| s.to_string()).collect()
}

fn table_for(rules: &[&str]) -> (GrammarSet, tac_engine::SlrTable) {
    let grammar = GrammarSet::parse(&lines(rules)).unwrap();
    let cluster = ItemCluster::build(&grammar).unwrap();
    let table = tac_engine::SlrTable::build(&grammar, &cluster).unwrap();
    (grammar, table)
}

#[test]
fn a_conflict_free_grammar_has_a_single_action_per_cell() {
    let (_, table) = table_for(&["E -> E + T | T", "T -> T * F | F", "F -> ( E ) | i"]);
    assert!(table.conflicts().is_empty());
}

#[test]
fn accept_is_recorded_on_the_end_marker_of_the_final_state() {
    let (_, table) = table_for(&["S -> a"]);
    let accept_cell = table.action(table.final_accept_state(), &Symbol::EndMarker);
    assert!(accept_cell.contains(&Action::Accept));
}

#[test]
fn dangling_else_produces_a_recorded_shift_reduce_conflict() {
    // S -> if ( B ) S | if ( B ) S else S | x ; B -> b
    // The classic dangling-else ambiguity: in the state reached after
    // parsing `if ( B ) S` the parser can either shift `else` or
    // reduce `S -> if ( B ) S`, and SLR(1) cannot tell them apart
    // because `else` is in FOLLOW(S).
    let (_, table) = table_for(&[
        "S -> if ( B ) S | if ( B ) S else S | x",
        "B -> b",
    ]);
    assert!(!table.conflicts().is_empty());
    assert!(table
        .conflicts()
        .iter()
        .any(|c| c.kind == ConflictKind::ShiftReduce));
}

#[test]
fn csv_round_trip_preserves_every_action_and_goto_cell() {
    let (grammar, table) = table_for(&["E -> E + T | T", "T -> i"]);
    let bytes = table.to_csv().unwrap();
    let reloaded = tac_engine::SlrTable::from_csv(&bytes).unwrap();

    assert_eq!(reloaded.start_state(), table.start_state());
    assert_eq!(reloaded.accept_states(), table.accept_states());

    let mut id = 0;
    while table.state_name(id).is_some() {
        for terminal in grammar.terminals() {
            assert_eq!(reloaded.action(id, terminal), table.action(id, terminal));
        }
        id += 1;
    }
}

#[test]
fn csv_header_lists_terminals_then_non_terminals_with_the_end_marker_among_terminals() {
    let (_, table) = table_for(&["S -> a S | a"]);
    let bytes = table.to_csv().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let header: Vec<&str> = text.lines().next().unwrap().split(',').collect();
    let marker_pos = header.iter().position(|&c| c == "#").unwrap();
    let non_terminal_pos = header.iter().position(|&c| c == "S").unwrap();
    assert!(marker_pos < non_terminal_pos);
}

#[test]
fn malformed_csv_is_a_serialisation_error_not_a_panic() {
    let bytes = "\u{feff}State,a,#\n0,bogus,\n".as_bytes();
    let err = tac_engine::SlrTable::from_csv(bytes).unwrap_err();
    assert!(matches!(err, EngineError::Serialisation(_)));
}
