//! SLR(1) ACTION/GOTO table construction, conflict classification, and
//! CSV serialisation.

use crate::cluster::ItemCluster;
use crate::error::{EngineError, Result};
use crate::grammar::{GrammarSet, Production};
use crate::symbol::{Symbol, END_MARKER};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write as _;

/// One parse action. Cells hold a *set* of these so a conflicting
/// build can still be recorded rather than silently overwritten.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(s) => write!(f, "s{s}"),
            Action::Reduce(r) => write!(f, "r{r}"),
            Action::Accept => write!(f, "acc"),
        }
    }
}

/// The kind of a multi-action ACTION cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
    ShiftShift,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub state: usize,
    pub symbol: Symbol,
    pub kind: ConflictKind,
    pub actions: BTreeSet<Action>,
}

/// The full SLR(1) table: state/production id bijections, ACTION,
/// GOTO, and any conflicts discovered while building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlrTable {
    state_to_id: HashMap<String, usize>,
    id_to_state: Vec<String>,
    grammar_to_id: HashMap<Production, usize>,
    id_to_grammar: Vec<Production>,
    action: HashMap<usize, HashMap<Symbol, BTreeSet<Action>>>,
    goto: HashMap<usize, HashMap<Symbol, BTreeSet<usize>>>,
    start_state: usize,
    accept_states: BTreeSet<usize>,
    final_accept_state: usize,
    conflicts: Vec<Conflict>,
}

impl SlrTable {
    /// Builds the ACTION/GOTO table for `cluster` over `grammar`.
    pub fn build(grammar: &GrammarSet, cluster: &ItemCluster) -> Result<Self> {
        let mut id_to_state: Vec<String> = cluster.states().iter().map(|s| s.name.clone()).collect();
        id_to_state.sort_by_key(|name| {
            name.rsplit(' ')
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(usize::MAX)
        });
        let state_to_id: HashMap<String, usize> = id_to_state
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();

        let mut id_to_grammar: Vec<Production> = grammar.all_productions().to_vec();
        let augmented_start = Symbol::non_terminal(format!("{}'", grammar.start_symbol().name()));
        let augmented_production =
            Production::new(augmented_start.clone(), vec![grammar.start_symbol().clone()]);
        id_to_grammar.push(augmented_production.clone());
        let grammar_to_id: HashMap<Production, usize> = id_to_grammar
            .iter()
            .enumerate()
            .map(|(id, p)| (p.clone(), id))
            .collect();

        let mut action: HashMap<usize, HashMap<Symbol, BTreeSet<Action>>> = HashMap::new();
        let mut goto: HashMap<usize, HashMap<Symbol, BTreeSet<usize>>> = HashMap::new();
        let mut accept_states = BTreeSet::new();
        let mut final_accept_state = None;

        for state in cluster.states() {
            let state_id = state_to_id[&state.name];

            for item in state.closure.iter() {
                if item.is_completed() {
                    if item.production.lhs == augmented_start {
                        accept_states.insert(state_id);
                        final_accept_state = Some(state_id);
                        action
                            .entry(state_id)
                            .or_default()
                            .entry(Symbol::EndMarker)
                            .or_default()
                            .insert(Action::Accept);
                    } else {
                        let prod_id = grammar_to_id[&item.production];
                        for follow_symbol in grammar.follow(&item.production.lhs) {
                            action
                                .entry(state_id)
                                .or_default()
                                .entry(follow_symbol)
                                .or_default()
                                .insert(Action::Reduce(prod_id));
                        }
                    }
                } else if let Some(symbol) = item.symbol_after_dot() {
                    if symbol.is_terminal() || symbol.is_end_marker() {
                        if let Some(target) = state.goto.get(symbol) {
                            let target_id = state_to_id[target];
                            action
                                .entry(state_id)
                                .or_default()
                                .entry(symbol.clone())
                                .or_default()
                                .insert(Action::Shift(target_id));
                        }
                    }
                }
            }

            for (symbol, target) in &state.goto {
                if symbol.is_non_terminal() {
                    let target_id = state_to_id[target];
                    goto.entry(state_id)
                        .or_default()
                        .entry(symbol.clone())
                        .or_default()
                        .insert(target_id);
                }
            }
        }

        let final_accept_state = final_accept_state
            .ok_or_else(|| EngineError::Build("no accepting state in cluster".into()))?;
        let start_state = *state_to_id
            .get("Item Set 0")
            .ok_or_else(|| EngineError::Build("no initial state".into()))?;

        let mut conflicts = Vec::new();
        for (&state_id, by_symbol) in &action {
            for (symbol, actions) in by_symbol {
                if actions.len() > 1 {
                    conflicts.push(Conflict {
                        state: state_id,
                        symbol: symbol.clone(),
                        kind: classify_conflict(actions),
                        actions: actions.clone(),
                    });
                }
            }
        }
        conflicts.sort_by_key(|c| (c.state, c.symbol.name().to_string()));
        if !conflicts.is_empty() {
            tracing::debug!(count = conflicts.len(), "SLR table has unresolved conflicts");
        }

        Ok(SlrTable {
            state_to_id,
            id_to_state,
            grammar_to_id,
            id_to_grammar,
            action,
            goto,
            start_state,
            accept_states,
            final_accept_state,
            conflicts,
        })
    }

    pub fn state_id(&self, name: &str) -> Option<usize> {
        self.state_to_id.get(name).copied()
    }

    pub fn state_name(&self, id: usize) -> Option<&str> {
        self.id_to_state.get(id).map(String::as_str)
    }

    pub fn production_id(&self, production: &Production) -> Option<usize> {
        self.grammar_to_id.get(production).copied()
    }

    pub fn production(&self, id: usize) -> Option<&Production> {
        self.id_to_grammar.get(id)
    }

    pub fn start_state(&self) -> usize {
        self.start_state
    }

    pub fn accept_states(&self) -> &BTreeSet<usize> {
        &self.accept_states
    }

    pub fn final_accept_state(&self) -> usize {
        self.final_accept_state
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// The ACTION cell for `(state, symbol)`, or an empty set if none
    /// is defined.
    pub fn action(&self, state: usize, symbol: &Symbol) -> BTreeSet<Action> {
        self.action
            .get(&state)
            .and_then(|row| row.get(symbol))
            .cloned()
            .unwrap_or_default()
    }

    /// The GOTO cell for `(state, non_terminal)`, or an empty set.
    pub fn goto(&self, state: usize, non_terminal: &Symbol) -> BTreeSet<usize> {
        self.goto
            .get(&state)
            .and_then(|row| row.get(non_terminal))
            .cloned()
            .unwrap_or_default()
    }

    fn terminal_columns(&self) -> Vec<Symbol> {
        let mut set: BTreeSet<Symbol> = self
            .action
            .values()
            .flat_map(|row| row.keys())
            .cloned()
            .collect();
        set.insert(Symbol::EndMarker);
        set.into_iter().collect()
    }

    fn non_terminal_columns(&self) -> Vec<Symbol> {
        self.goto
            .values()
            .flat_map(|row| row.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// CSV serialisation per §6.4: `State, t1..tm, N1..Nk` header (UTF-8
    /// with BOM), one row per state id; ACTION cells are `/`-joined
    /// `sN`/`rN`/`acc`, GOTO cells a bare integer or blank.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let terminals = self.terminal_columns();
        let non_terminals = self.non_terminal_columns();

        let mut bytes: Vec<u8> = vec![0xEF, 0xBB, 0xBF];
        {
            let mut writer = csv::WriterBuilder::new().from_writer(&mut bytes);
            let mut header = vec!["State".to_string()];
            header.extend(terminals.iter().map(|s| s.name().to_string()));
            header.extend(non_terminals.iter().map(|s| s.name().to_string()));
            writer.write_record(&header)?;

            for id in 0..self.id_to_state.len() {
                let mut row = vec![id.to_string()];
                for terminal in &terminals {
                    let cell = self.action(id, terminal);
                    let text = cell
                        .iter()
                        .map(|a| a.to_string())
                        .collect::<Vec<_>>()
                        .join("/");
                    row.push(text);
                }
                for non_terminal in &non_terminals {
                    let cell = self.goto(id, non_terminal);
                    let text = cell
                        .iter()
                        .next()
                        .map(|id| id.to_string())
                        .unwrap_or_default();
                    row.push(text);
                }
                writer.write_record(&row)?;
            }
            writer.flush()?;
        }
        Ok(bytes)
    }

    pub fn write_csv(&self, path: &std::path::Path) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(&self.to_csv()?)?;
        Ok(())
    }

    /// Reconstructs ACTION/GOTO content from CSV written by
    /// [`SlrTable::to_csv`]. A CSV cell carries only production/state
    /// ids, not `Production` values, so a table loaded this way always
    /// answers `production(id)` with `None` — `action()`, `goto()`,
    /// `start_state()`, `accept_states()` and `conflicts()` are fully
    /// restored and compare equal cell-by-cell to the table that wrote
    /// the CSV (spec §8 round-trip property).
    pub fn from_csv(bytes: &[u8]) -> Result<Self> {
        let text = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(text);
        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .skip(1)
            .map(str::to_string)
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        let mut is_action_column = vec![false; columns.len()];
        for row in &rows {
            for (i, cell) in row.iter().skip(1).enumerate() {
                if !cell.is_empty() && (cell == "acc" || cell.starts_with(['s', 'r'])) {
                    is_action_column[i] = true;
                }
            }
        }

        let mut action: HashMap<usize, HashMap<Symbol, BTreeSet<Action>>> = HashMap::new();
        let mut goto: HashMap<usize, HashMap<Symbol, BTreeSet<usize>>> = HashMap::new();
        let mut accept_states = BTreeSet::new();
        let mut final_accept_state = None;
        let mut max_state_id = 0usize;

        for row in &rows {
            let state_id: usize = row[0]
                .parse()
                .map_err(|_| EngineError::Serialisation(format!("bad state id {:?}", row[0])))?;
            max_state_id = max_state_id.max(state_id);

            for (i, col_name) in columns.iter().enumerate() {
                let cell = &row[i + 1];
                if cell.is_empty() {
                    continue;
                }
                if is_action_column[i] {
                    let symbol = if col_name == END_MARKER {
                        Symbol::EndMarker
                    } else {
                        Symbol::terminal(col_name.clone())
                    };
                    let mut cell_actions = BTreeSet::new();
                    for part in cell.split('/') {
                        let parsed = parse_action(part)?;
                        if parsed == Action::Accept {
                            accept_states.insert(state_id);
                            final_accept_state = Some(state_id);
                        }
                        cell_actions.insert(parsed);
                    }
                    action
                        .entry(state_id)
                        .or_default()
                        .entry(symbol)
                        .or_default()
                        .extend(cell_actions);
                } else {
                    let symbol = Symbol::non_terminal(col_name.clone());
                    let target: usize = cell
                        .parse()
                        .map_err(|_| EngineError::Serialisation(format!("bad goto cell {cell:?}")))?;
                    goto.entry(state_id)
                        .or_default()
                        .entry(symbol)
                        .or_default()
                        .insert(target);
                }
            }
        }

        let final_accept_state = final_accept_state
            .ok_or_else(|| EngineError::Serialisation("no accepting state in CSV".into()))?;
        let id_to_state: Vec<String> = (0..=max_state_id).map(|id| format!("Item Set {id}")).collect();
        let state_to_id: HashMap<String, usize> = id_to_state
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();

        let mut conflicts = Vec::new();
        for (&state_id, by_symbol) in &action {
            for (symbol, actions) in by_symbol {
                if actions.len() > 1 {
                    conflicts.push(Conflict {
                        state: state_id,
                        symbol: symbol.clone(),
                        kind: classify_conflict(actions),
                        actions: actions.clone(),
                    });
                }
            }
        }
        conflicts.sort_by_key(|c| (c.state, c.symbol.name().to_string()));

        Ok(SlrTable {
            state_to_id,
            id_to_state,
            grammar_to_id: HashMap::new(),
            id_to_grammar: Vec::new(),
            action,
            goto,
            start_state: 0,
            accept_states,
            final_accept_state,
            conflicts,
        })
    }
}

fn parse_action(text: &str) -> Result<Action> {
    if text == "acc" {
        Ok(Action::Accept)
    } else if let Some(rest) = text.strip_prefix('s') {
        rest.parse()
            .map(Action::Shift)
            .map_err(|_| EngineError::Serialisation(format!("bad shift action {text:?}")))
    } else if let Some(rest) = text.strip_prefix('r') {
        rest.parse()
            .map(Action::Reduce)
            .map_err(|_| EngineError::Serialisation(format!("bad reduce action {text:?}")))
    } else {
        Err(EngineError::Serialisation(format!("unrecognised action {text:?}")))
    }
}

fn classify_conflict(actions: &BTreeSet<Action>) -> ConflictKind {
    let shifts = actions.iter().filter(|a| matches!(a, Action::Shift(_))).count();
    let reduces = actions.iter().filter(|a| matches!(a, Action::Reduce(_))).count();
    if shifts >= 1 && reduces >= 1 {
        ConflictKind::ShiftReduce
    } else if reduces >= 2 {
        ConflictKind::ReduceReduce
    } else if shifts >= 2 {
        ConflictKind::ShiftShift
    } else {
        ConflictKind::Unknown
    }
}
