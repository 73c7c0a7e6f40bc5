//! Grammar analysis and semantic-directed translation engine.
//!
//! Given a grammar and (optionally) a token stream, builds the
//! canonical LR(0) collection and SLR(1) table, drives a parse, and
//! emits the requested artifact (table, TAC, symbol tables, trace, or
//! a DOT rendering of the automaton).
//!
//! # Author
//! Juan Manuel Young Hoyos
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools" (2nd Edition).
//! Addison-Wesley, 2006.

use clap::Parser;
use std::process;
use tac_engine::cli::{self, Cli};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli::run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
