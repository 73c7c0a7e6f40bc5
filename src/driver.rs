//! Table-driven shift/reduce parsing: walks an input token stream
//! against an [`SlrTable`], running semantic actions (if registered
//! for the reduced production) to build up an [`Attribute`] for the
//! accepted sentence.

use crate::attribute::Attribute;
use crate::error::{EngineError, Result};
use crate::grammar::GrammarSet;
use crate::semantic::actions::{ActionFn, SemanticContext};
use crate::symbol::Symbol;
use crate::table::{Action, SlrTable};
use std::collections::HashMap;

/// One shift or reduce taken during a parse, recorded for inspection
/// (debugging, golden-trace tests) when [`Driver::trace`] is read.
#[derive(Debug, Clone)]
pub enum Process {
    Shift { state: usize, symbol: Symbol },
    Reduce { state: usize, rule: usize },
    Accept,
}

pub struct Driver<'g> {
    grammar: &'g GrammarSet,
    table: &'g SlrTable,
    trace: Vec<Process>,
}

impl<'g> Driver<'g> {
    pub fn new(grammar: &'g GrammarSet, table: &'g SlrTable) -> Self {
        Self {
            grammar,
            table,
            trace: Vec::new(),
        }
    }

    pub fn trace(&self) -> &[Process] {
        &self.trace
    }

    /// Drives the parser over `tokens` (terminal symbol, lexeme pairs;
    /// an `Symbol::EndMarker` is appended automatically if the caller
    /// did not include one). `actions`, if given, supplies the
    /// semantic action for each reduced production; productions with
    /// no registered action fall back to concatenating the popped
    /// attributes' code, so a driver still runs for grammars the
    /// semantic catalogue does not cover.
    pub fn parse(
        &mut self,
        tokens: &[(Symbol, String)],
        actions: Option<&HashMap<crate::grammar::Production, ActionFn>>,
        ctx: &mut SemanticContext,
    ) -> Result<Attribute> {
        self.trace.clear();

        let mut input: Vec<(Symbol, String)> = tokens.to_vec();
        if input.last().map(|(s, _)| s) != Some(&Symbol::EndMarker) {
            input.push((Symbol::EndMarker, String::new()));
        }

        let mut state_stack = vec![self.table.start_state()];
        let mut attr_stack: Vec<Attribute> = Vec::new();
        let mut pos = 0usize;

        loop {
            if input[pos].0.name() == "NEWLINE" {
                pos += 1;
                continue;
            }
            let state = *state_stack.last().expect("state stack is never empty");
            let (symbol, lexeme) = &input[pos];
            let cell = self.table.action(state, symbol);

            if cell.is_empty() {
                return Err(EngineError::Parse {
                    state,
                    lexeme: lexeme.clone(),
                });
            }
            if cell.len() > 1 {
                return Err(EngineError::ParseConflict {
                    state,
                    symbol: symbol.to_string(),
                    actions: cell.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", "),
                });
            }
            let action = cell.into_iter().next().expect("checked non-empty");

            match action {
                Action::Shift(target) => {
                    self.trace.push(Process::Shift {
                        state,
                        symbol: symbol.clone(),
                    });
                    attr_stack.push(Attribute::Leaf {
                        value: lexeme.clone(),
                    });
                    state_stack.push(target);
                    pos += 1;
                }
                Action::Reduce(rule) => {
                    tracing::trace!(state, rule, "reduce");
                    self.trace.push(Process::Reduce { state, rule });
                    let production = self
                        .table
                        .production(rule)
                        .ok_or_else(|| EngineError::Build(format!("unknown production id {rule}")))?
                        .clone();
                    let arity = if production.is_epsilon() {
                        0
                    } else {
                        production.rhs.len()
                    };
                    let popped_start = attr_stack.len() - arity;
                    let popped: Vec<Attribute> = attr_stack.split_off(popped_start);
                    state_stack.truncate(state_stack.len() - arity);

                    let result = match actions.and_then(|table| table.get(&production)) {
                        Some(handler) => handler(ctx, &popped)?,
                        None => Attribute::S {
                            code: popped.iter().map(Attribute::code).collect(),
                        },
                    };

                    let goto_top = *state_stack.last().expect("state stack is never empty");
                    let targets = self.table.goto(goto_top, &production.lhs);
                    let target = targets.into_iter().next().ok_or_else(|| EngineError::Build(
                        format!("no goto for {} from state {goto_top}", production.lhs),
                    ))?;

                    attr_stack.push(result);
                    state_stack.push(target);
                }
                Action::Accept => {
                    self.trace.push(Process::Accept);
                    return Ok(attr_stack.pop().unwrap_or(Attribute::P { code: vec![] }));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ItemCluster;

    fn lines(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepts_a_simple_arithmetic_sentence() {
        let grammar = GrammarSet::parse(&lines(&["E -> E + T | T", "T -> T * i | i"])).unwrap();
        let cluster = ItemCluster::build(&grammar).unwrap();
        let table = SlrTable::build(&grammar, &cluster).unwrap();

        let tokens = vec![
            (Symbol::terminal("i"), "1".to_string()),
            (Symbol::terminal("+"), "+".to_string()),
            (Symbol::terminal("i"), "2".to_string()),
        ];

        let mut ctx = SemanticContext::new();
        let mut driver = Driver::new(&grammar, &table);
        let result = driver.parse(&tokens, None, &mut ctx);
        assert!(result.is_ok());
        assert!(matches!(driver.trace().last(), Some(Process::Accept)));
    }

    #[test]
    fn reports_a_parse_error_on_an_unexpected_token() {
        let grammar = GrammarSet::parse(&lines(&["E -> E + T | T", "T -> T * i | i"])).unwrap();
        let cluster = ItemCluster::build(&grammar).unwrap();
        let table = SlrTable::build(&grammar, &cluster).unwrap();

        let tokens = vec![(Symbol::terminal("+"), "+".to_string())];
        let mut ctx = SemanticContext::new();
        let mut driver = Driver::new(&grammar, &table);
        assert!(matches!(
            driver.parse(&tokens, None, &mut ctx),
            Err(EngineError::Parse { .. })
        ));
    }
}
