//! Dotted productions and the item sets built from them.

use crate::grammar::{GrammarSet, Production};
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// A production with a dot marking how much of the rhs has been
/// recognised. The dot ranges over `0..=rhs.len()`, except for an
/// epsilon production, which has exactly one item (dot = 0) that is
/// already completed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Item {
    pub production: Production,
    pub dot: usize,
}

impl Item {
    /// The initial item `[production -> • rhs]`.
    pub fn initial(production: Production) -> Self {
        Self { production, dot: 0 }
    }

    fn effective_len(&self) -> usize {
        if self.production.is_epsilon() {
            0
        } else {
            self.production.rhs.len()
        }
    }

    /// The symbol immediately after the dot, or `None` if the item is
    /// completed.
    pub fn symbol_after_dot(&self) -> Option<&Symbol> {
        if self.dot < self.effective_len() {
            self.production.rhs.get(self.dot)
        } else {
            None
        }
    }

    /// Whether the dot is at the end of the (effective) rhs.
    pub fn is_completed(&self) -> bool {
        self.dot >= self.effective_len()
    }

    /// Advances the dot past the next symbol. Panics if the item is
    /// already completed; callers check `symbol_after_dot` first.
    pub fn advanced(&self) -> Self {
        debug_assert!(!self.is_completed());
        Self {
            production: self.production.clone(),
            dot: self.dot + 1,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> ", self.production.lhs)?;
        if self.production.is_epsilon() {
            return write!(f, "•");
        }
        for (i, sym) in self.production.rhs.iter().enumerate() {
            if i == self.dot {
                write!(f, "• ")?;
            }
            write!(f, "{sym} ")?;
        }
        if self.dot == self.production.rhs.len() {
            write!(f, "•")?;
        }
        Ok(())
    }
}

/// A set of items, compared and stored by structural (set) equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSet {
    items: BTreeSet<Item>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, item: Item) -> bool {
        self.items.insert(item)
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains(item)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Items whose production has the given lhs (the grouping the spec
    /// calls "keyed by lhs for fast... lookup").
    pub fn by_lhs<'a>(&'a self, lhs: &'a Symbol) -> impl Iterator<Item = &'a Item> {
        self.items.iter().filter(move |it| &it.production.lhs == lhs)
    }

    /// The distinct symbols that appear immediately after a dot in this
    /// set, in the order produced by iteration over items.
    pub fn next_symbols(&self) -> BTreeSet<Symbol> {
        self.items
            .iter()
            .filter_map(|it| it.symbol_after_dot().cloned())
            .collect()
    }

    /// The closure of this item set under `grammar`: repeatedly expand
    /// every item whose next symbol is a non-terminal X by adding the
    /// initial items of every production of X, until no item is added.
    pub fn closure(&self, grammar: &GrammarSet) -> ItemSet {
        let mut closed = self.clone();
        let mut changed = true;
        while changed {
            changed = false;
            let pending: Vec<Symbol> = closed
                .items
                .iter()
                .filter_map(|it| it.symbol_after_dot())
                .filter(|s| s.is_non_terminal())
                .cloned()
                .collect();
            for non_terminal in pending {
                for production in grammar.productions(&non_terminal) {
                    if closed.insert(Item::initial(production.clone())) {
                        changed = true;
                    }
                }
            }
        }
        closed
    }

    /// `goto(self, symbol)`: advance every item whose next symbol is
    /// `symbol`, then close the result.
    pub fn goto(&self, symbol: &Symbol, grammar: &GrammarSet) -> ItemSet {
        let advanced: ItemSet = ItemSet::from_items(
            self.items
                .iter()
                .filter(|it| it.symbol_after_dot() == Some(symbol))
                .map(Item::advanced),
        );
        advanced.closure(grammar)
    }
}

impl fmt::Display for ItemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarSet;

    fn lines(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    fn sample_grammar() -> GrammarSet {
        GrammarSet::parse(&lines(&["E -> E + T | T", "T -> i"])).unwrap()
    }

    #[test]
    fn completed_item_has_no_next_symbol() {
        let g = sample_grammar();
        let p = g.productions(&Symbol::non_terminal("T"))[0].clone();
        let item = Item::initial(p).advanced();
        assert!(item.is_completed());
        assert_eq!(item.symbol_after_dot(), None);
    }

    #[test]
    fn epsilon_production_item_is_completed_at_dot_zero() {
        let g = GrammarSet::parse(&lines(&["A -> a | \u{3b5}"])).unwrap();
        let eps_prod = g
            .productions(&Symbol::non_terminal("A"))
            .iter()
            .find(|p| p.is_epsilon())
            .unwrap()
            .clone();
        let item = Item::initial(eps_prod);
        assert!(item.is_completed());
    }

    #[test]
    fn closure_pulls_in_productions_of_the_symbol_after_the_dot() {
        let g = sample_grammar();
        let start = g.productions(&Symbol::non_terminal("E"))[0].clone();
        let mut kernel = ItemSet::new();
        kernel.insert(Item::initial(start));
        let closed = kernel.closure(&g);
        assert!(closed.len() >= kernel.len());
        assert!(closed
            .iter()
            .any(|it| it.production.lhs == Symbol::non_terminal("T")));
    }

    #[test]
    fn goto_advances_matching_items_and_closes() {
        let g = sample_grammar();
        let t_prod = g.productions(&Symbol::non_terminal("T"))[0].clone();
        let mut kernel = ItemSet::new();
        kernel.insert(Item::initial(t_prod));
        let closed = kernel.closure(&g);
        let after = closed.goto(&Symbol::terminal("i"), &g);
        assert!(after.iter().all(|it| it.is_completed()));
    }
}
