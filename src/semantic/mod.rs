//! The semantic core: symbol-table entries, nested scopes, and the
//! global table map they are registered into.
//!
//! Entries are a tagged variant (§9 design note "Polymorphism over
//! entries") rather than a class hierarchy. Tables reference their
//! outer scope by qualified name rather than by owning pointer; the
//! [`TableMap`] is the sole owner of every table, which avoids the
//! ownership cycle an `outer` back-reference would otherwise create.

pub mod actions;
pub mod tac;

use crate::error::{EngineError, Result};
use std::collections::HashMap;
use std::fmt;

/// One symbol-table row. See spec.md §3 Data Model.
///
/// `ArrayPtr`/`FuncPtr` unify what the original source split across
/// `arrptt`/`arrayptt` naming in different revisions.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Var {
        name: String,
        r#type: String,
        offset: i64,
    },
    Array {
        name: String,
        etype: String,
        base: i64,
        dims: usize,
        dim: Vec<i64>,
    },
    /// `mytab` is the qualified name of the function's own table in the
    /// global [`TableMap`]; the return type lives there (`rtype`), not
    /// duplicated on this entry.
    Func {
        name: String,
        offset: i64,
        mytab: String,
    },
    /// Array passed by reference as a parameter.
    ArrayPtr {
        name: String,
        etype: String,
        base: i64,
    },
    /// Function passed as a parameter; its return type is known at the
    /// call site without a table handle, so it is kept inline here.
    FuncPtr {
        name: String,
        offset: i64,
        rtype: String,
    },
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Var { name, .. }
            | Entry::Array { name, .. }
            | Entry::Func { name, .. }
            | Entry::ArrayPtr { name, .. }
            | Entry::FuncPtr { name, .. } => name,
        }
    }

    /// The tag string used in the §6.6 text dump and in `size_of`.
    pub fn type_tag(&self) -> &str {
        match self {
            Entry::Var { r#type, .. } => r#type,
            Entry::Array { .. } => "array",
            Entry::Func { .. } => "func",
            Entry::ArrayPtr { .. } => "arrptt",
            Entry::FuncPtr { .. } => "funptt",
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Entry::Array { .. } | Entry::ArrayPtr { .. })
    }

    pub fn is_func(&self) -> bool {
        matches!(self, Entry::Func { .. } | Entry::FuncPtr { .. })
    }

    /// The declared dimension, for entries that carry one (bounds
    /// checking only ever applies to `Array`, whose dimension is
    /// known; `ArrayPtr` parameters have none).
    pub fn dim0(&self) -> Option<i64> {
        match self {
            Entry::Array { dim, .. } => dim.first().copied(),
            _ => None,
        }
    }
}

/// `size_of(type)`: `int=4, void=0, float=8, array|arrptt=4 (pointer
/// slot), func|funptt=8`.
pub fn size_of(type_tag: &str) -> i64 {
    match type_tag.to_ascii_lowercase().as_str() {
        "int" => 4,
        "void" => 0,
        "float" => 8,
        "array" | "arrptt" => 4,
        "func" | "funptt" => 8,
        _ => 0,
    }
}

/// One lexical scope: a nested symbol table.
///
/// `outer` is a non-owning handle (a qualified name looked up in the
/// [`TableMap`]), never an owning pointer, so inner/outer links never
/// form a reference cycle.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    pub name: String,
    pub outer: Option<String>,
    pub width: i64,
    pub argc: usize,
    pub arglist: Vec<String>,
    pub rtype: String,
    pub level: usize,
    pub code: Vec<String>,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new(name: impl Into<String>, outer: Option<String>, level: usize) -> Self {
        Self {
            name: name.into(),
            outer,
            width: 0,
            argc: 0,
            arglist: Vec::new(),
            rtype: String::new(),
            level,
            code: Vec::new(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Inserts a new entry. Fails if the name is already present in
    /// this table (redeclaration within one scope).
    pub fn add_entry(&mut self, entry: Entry) -> Result<()> {
        let name = entry.name().to_string();
        if self.index.contains_key(&name) {
            return Err(EngineError::Redeclared {
                name,
                scope: self.name.clone(),
            });
        }
        self.index.insert(name, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Looks up an entry by name in this table only (no outer chain).
    pub fn local(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// One-level qualified name, `"<name>@<outer>"`, matching the
    /// original source's `get_table_name` (which chases exactly one
    /// outer link rather than the full chain — kept deliberately; see
    /// DESIGN.md).
    pub fn qualified_name(name: &str, outer: &str) -> String {
        format!("{name}@{outer}")
    }
}

impl fmt::Display for SymbolTable {
    /// §6.6 text dump:
    /// `<qualified-name>: { width argc rtype level / arglist (…) / entries { … } / code [ … ] }`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {{ {} {} {} {} / arglist ({}) / entries {{ {} }} / code [ {} ] }}",
            self.name,
            self.width,
            self.argc,
            self.rtype,
            self.level,
            self.arglist.join(", "),
            self.entries
                .iter()
                .map(entry_to_text)
                .collect::<Vec<_>>()
                .join(", "),
            self.code.join(" ")
        )
    }
}

fn entry_to_text(entry: &Entry) -> String {
    match entry {
        Entry::Var { name, r#type, offset } => format!("{name}:{type}@{offset}"),
        Entry::Array {
            name,
            etype,
            base,
            dims,
            dim,
        } => format!("{name}:array[{etype}]@{base}(dims={dims},dim={dim:?})"),
        Entry::Func { name, offset, mytab } => format!("{name}:func@{offset}->{mytab}"),
        Entry::ArrayPtr { name, etype, base } => format!("{name}:arrptt[{etype}]@{base}"),
        Entry::FuncPtr { name, offset, rtype } => format!("{name}:funptt@{offset}->{rtype}"),
    }
}

/// Owns every table created during one compilation, keyed by
/// qualified name. `system_table` (level 0, no outer) always exists.
#[derive(Debug, Clone)]
pub struct TableMap {
    tables: HashMap<String, SymbolTable>,
}

impl TableMap {
    pub fn new() -> Self {
        let mut tables = HashMap::new();
        tables.insert(
            "system_table".to_string(),
            SymbolTable::new("system_table", None, 0),
        );
        Self { tables }
    }

    pub fn get(&self, name: &str) -> Option<&SymbolTable> {
        self.tables.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SymbolTable> {
        self.tables.get_mut(name)
    }

    pub fn insert(&mut self, table: SymbolTable) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn rename(&mut self, old_name: &str, new_name: String) -> Result<()> {
        let mut table = self
            .tables
            .remove(old_name)
            .ok_or_else(|| EngineError::Build(format!("no such table: {old_name}")))?;
        table.name = new_name.clone();
        self.tables.insert(new_name, table);
        Ok(())
    }

    /// Lexical lookup: the current table, then its outer chain.
    pub fn lookup_entry(&self, start_table: &str, name: &str) -> Option<(&str, &Entry)> {
        let mut current = Some(start_table);
        while let Some(table_name) = current {
            let table = self.tables.get(table_name)?;
            if let Some(entry) = table.local(name) {
                return Some((table_name, entry));
            }
            current = table.outer.as_deref();
        }
        None
    }

    pub fn tables(&self) -> impl Iterator<Item = &SymbolTable> {
        self.tables.values()
    }
}

impl Default for TableMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates that `name` is declared (anywhere in the outer chain
/// starting at `table`), returning its entry.
pub fn check_var<'a>(map: &'a TableMap, table: &str, name: &str) -> Result<&'a Entry> {
    map.lookup_entry(table, name)
        .map(|(_, entry)| entry)
        .ok_or_else(|| EngineError::Undeclared(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_entry_rejects_redeclaration() {
        let mut table = SymbolTable::new("system_table", None, 0);
        table
            .add_entry(Entry::Var {
                name: "a".into(),
                r#type: "int".into(),
                offset: 4,
            })
            .unwrap();
        let err = table.add_entry(Entry::Var {
            name: "a".into(),
            r#type: "int".into(),
            offset: 8,
        });
        assert!(matches!(err, Err(EngineError::Redeclared { .. })));
    }

    #[test]
    fn lookup_walks_outer_chain() {
        let mut map = TableMap::new();
        map.get_mut("system_table")
            .unwrap()
            .add_entry(Entry::Var {
                name: "a".into(),
                r#type: "int".into(),
                offset: 4,
            })
            .unwrap();
        let inner = SymbolTable::new("f@system_table", Some("system_table".into()), 1);
        map.insert(inner);
        let found = map.lookup_entry("f@system_table", "a");
        assert!(found.is_some());
    }

    #[test]
    fn size_of_matches_the_fixed_table() {
        assert_eq!(size_of("int"), 4);
        assert_eq!(size_of("void"), 0);
        assert_eq!(size_of("float"), 8);
        assert_eq!(size_of("array"), 4);
        assert_eq!(size_of("arrptt"), 4);
        assert_eq!(size_of("func"), 8);
        assert_eq!(size_of("funptt"), 8);
    }
}
