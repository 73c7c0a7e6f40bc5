//! The canonical LR(0) collection: states, their goto edges, and the
//! worklist algorithm that builds them from a grammar.

use crate::error::{EngineError, Result};
use crate::grammar::GrammarSet;
use crate::item::{Item, ItemSet};
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of the LR(0) automaton: the kernel items that define it,
/// their closure, and the symbol-keyed transitions out of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub kernel: ItemSet,
    pub closure: ItemSet,
    pub goto: BTreeMap<Symbol, String>,
}

/// The canonical collection of states plus the goto DFA over them.
///
/// States are named sequentially (`Item Set 0`, `Item Set 1`, ...).
/// Two states are the same state iff their closures are set-equal; the
/// kernel is kept only for display and for the initial worklist seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCluster {
    states: Vec<State>,
}

impl ItemCluster {
    /// Builds the canonical collection starting from
    /// `closure({[S' -> • S]})`, where `S` is `grammar`'s start symbol
    /// and `S'` is the augmented start built by appending `'`.
    pub fn build(grammar: &GrammarSet) -> Result<Self> {
        let augmented_start = Symbol::non_terminal(format!("{}'", grammar.start_symbol().name()));
        let augmented_production =
            crate::grammar::Production::new(augmented_start.clone(), vec![grammar.start_symbol().clone()]);

        let mut kernel = ItemSet::new();
        kernel.insert(Item::initial(augmented_production));
        let closure = kernel.closure(grammar);

        let mut cluster = ItemCluster { states: Vec::new() };
        cluster.states.push(State {
            name: cluster.next_state_name(),
            kernel,
            closure,
            goto: BTreeMap::new(),
        });

        let mut worklist = vec![0usize];
        while let Some(idx) = worklist.pop() {
            let next_symbols: Vec<Symbol> = cluster.states[idx].closure.next_symbols().into_iter().collect();
            for symbol in next_symbols {
                if cluster.states[idx].goto.contains_key(&symbol) {
                    continue;
                }
                let target_kernel: ItemSet = ItemSet::from_items(
                    cluster.states[idx]
                        .closure
                        .iter()
                        .filter(|it| it.symbol_after_dot() == Some(&symbol))
                        .map(Item::advanced),
                );
                let target_closure = target_kernel.closure(grammar);

                let existing = cluster
                    .states
                    .iter()
                    .find(|s| s.closure == target_closure)
                    .map(|s| s.name.clone());

                let target_name = match existing {
                    Some(name) => name,
                    None => {
                        let name = cluster.next_state_name();
                        tracing::trace!(state = %name, via = %symbol, "discovered new state");
                        cluster.states.push(State {
                            name: name.clone(),
                            kernel: target_kernel,
                            closure: target_closure,
                            goto: BTreeMap::new(),
                        });
                        worklist.push(cluster.states.len() - 1);
                        name
                    }
                };

                cluster.states[idx].goto.insert(symbol, target_name);
            }
        }

        if cluster.states.is_empty() {
            return Err(EngineError::Build("no initial state".into()));
        }

        tracing::debug!(states = cluster.states.len(), "built canonical LR(0) collection");
        Ok(cluster)
    }

    fn next_state_name(&self) -> String {
        format!("Item Set {}", self.states.len())
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name == name)
    }

    pub fn initial_state(&self) -> &State {
        &self.states[0]
    }

    /// Renders a Graphviz DOT digraph of the goto automaton.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph ItemCluster {\n");
        for state in &self.states {
            out.push_str(&format!("  \"{}\";\n", state.name));
        }
        for state in &self.states {
            for (symbol, target) in &state.goto {
                out.push_str(&format!(
                    "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                    state.name,
                    target,
                    symbol
                ));
            }
        }
        out.push_str("}\n");
        out
    }

    /// Human-readable pretty form: per-state kernel, closure, goto.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for state in &self.states {
            out.push_str(&format!("{}\n", state.name));
            out.push_str("  kernel:\n");
            for item in state.kernel.iter() {
                out.push_str(&format!("    {item}\n"));
            }
            out.push_str("  closure:\n");
            for item in state.closure.iter() {
                out.push_str(&format!("    {item}\n"));
            }
            out.push_str("  goto:\n");
            for (symbol, target) in &state.goto {
                out.push_str(&format!("    {symbol} -> {target}\n"));
            }
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
