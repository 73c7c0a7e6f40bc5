//! Integration tests for the three-address-code emission helpers.

use tac_engine::semantic::tac::{gen_goto, gen_label, gen_labels, merge_code, merge_labels, new_params, TacEmitter};

#[test]
fn temp_and_label_counters_advance_independently() {
    let mut tac = TacEmitter::new();
    assert_eq!(tac.new_temp(), "t0");
    assert_eq!(tac.new_temp(), "t1");
    assert_eq!(tac.new_label(), "l0");
    assert_eq!(tac.new_temp(), "t2");
    assert_eq!(tac.new_label(), "l1");
    assert_eq!(tac.new_label(), "l2");
}

#[test]
fn gen_label_and_gen_goto_produce_the_documented_instruction_shape() {
    assert_eq!(gen_label("l3"), "LABEL l3;\n");
    assert_eq!(gen_goto("l3"), "GOTO l3;\n");
}

#[test]
fn gen_labels_emits_one_label_line_per_entry_in_order() {
    let labels = vec!["l0".to_string(), "l1".to_string()];
    assert_eq!(gen_labels(&labels), "LABEL l0;\nLABEL l1;\n");
    assert_eq!(gen_labels(&[]), "");
}

#[test]
fn new_params_pushes_arguments_back_to_front() {
    let places = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    assert_eq!(new_params(&places), "PAR c;\nPAR b;\nPAR a;\n");
    assert_eq!(new_params(&[]), "");
}

#[test]
fn merge_code_concatenates_blocks_in_order() {
    let blocks = vec!["a;\n".to_string(), "b;\n".to_string(), "c;\n".to_string()];
    assert_eq!(merge_code(&blocks), "a;\nb;\nc;\n");
}

#[test]
fn merge_labels_appends_the_second_list_after_the_first() {
    let a = vec!["l0".to_string(), "l1".to_string()];
    let b = vec!["l2".to_string()];
    assert_eq!(merge_labels(&a, &b), vec!["l0".to_string(), "l1".to_string(), "l2".to_string()]);
}

#[test]
fn two_fresh_emitters_start_from_the_same_counters() {
    // Counters are parse-instance state, never process-global.
    let mut first = TacEmitter::new();
    let mut second = TacEmitter::new();
    assert_eq!(first.new_temp(), second.new_temp());
    assert_eq!(first.new_label(), second.new_label());
}
