//! Command-line front-end: load a grammar (and optionally a token
//! stream), run the requested stage, and print its result.

use crate::cluster::ItemCluster;
use crate::driver::Driver;
use crate::error::{EngineError, Result};
use crate::grammar::GrammarSet;
use crate::lexer::Token;
use crate::semantic::actions::{build_action_table, SemanticContext};
use crate::table::SlrTable;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// What to print after analysing the grammar (and, for `tokens`/`tac`/
/// `symbols`, running the supplied token stream through the driver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// The shift/reduce trace consumed while parsing `--tokens`.
    Tokens,
    /// The ACTION/GOTO table, as CSV.
    Table,
    /// The generated three-address code for the accepted program.
    Tac,
    /// A text dump of every symbol table populated during the parse.
    Symbols,
    /// A Graphviz DOT rendering of the canonical LR(0) automaton.
    Dot,
}

#[derive(Debug, Parser)]
#[command(name = "tac_engine", about = "SLR(1) grammar analysis and semantic-directed translation")]
pub struct Cli {
    /// Path to a grammar text file (`LHS -> a1 | a2 | ...` per line).
    pub grammar: PathBuf,

    /// Path to a JSON array of `{"type": ..., "lexeme": ...}` tokens.
    /// Required for `--emit tokens|tac|symbols`.
    #[arg(long)]
    pub tokens: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Emit::Table)]
    pub emit: Emit,
}

#[derive(Debug, Deserialize)]
struct TokenWire {
    r#type: String,
    lexeme: String,
}

pub fn run(cli: &Cli) -> Result<()> {
    let grammar_text = std::fs::read_to_string(&cli.grammar)?;
    let lines: Vec<String> = grammar_text.lines().map(str::to_string).collect();
    let grammar = GrammarSet::parse(&lines)?;
    tracing::info!(productions = grammar.all_productions().len(), "loaded grammar");

    let cluster = ItemCluster::build(&grammar)?;
    let table = SlrTable::build(&grammar, &cluster)?;

    match cli.emit {
        Emit::Dot => {
            println!("{}", cluster.to_dot());
        }
        Emit::Table => {
            let csv_bytes = table.to_csv()?;
            print!("{}", String::from_utf8_lossy(&csv_bytes));
        }
        Emit::Tokens => {
            let tokens = load_tokens(cli)?;
            let mut ctx = SemanticContext::new();
            let mut driver = Driver::new(&grammar, &table);
            driver.parse(&tokens, None, &mut ctx)?;
            for step in driver.trace() {
                println!("{step:?}");
            }
        }
        Emit::Tac => {
            let tokens = load_tokens(cli)?;
            let actions = build_action_table(&grammar);
            let mut ctx = SemanticContext::new();
            let mut driver = Driver::new(&grammar, &table);
            let program = driver.parse(&tokens, Some(&actions), &mut ctx)?;
            print!("{}", program.code());
        }
        Emit::Symbols => {
            let tokens = load_tokens(cli)?;
            let actions = build_action_table(&grammar);
            let mut ctx = SemanticContext::new();
            let mut driver = Driver::new(&grammar, &table);
            driver.parse(&tokens, Some(&actions), &mut ctx)?;
            for symbol_table in ctx.tables.tables() {
                println!("{symbol_table}");
            }
        }
    }

    Ok(())
}

fn load_tokens(cli: &Cli) -> Result<Vec<(crate::symbol::Symbol, String)>> {
    let path = cli
        .tokens
        .as_ref()
        .ok_or_else(|| EngineError::Build("--emit requires --tokens <file>".into()))?;
    let text = std::fs::read_to_string(path)?;
    let wire: Vec<TokenWire> = serde_json::from_str(&text)?;
    Ok(wire
        .into_iter()
        .map(|w| Token::new(w.r#type, w.lexeme).as_terminal())
        .collect())
}
