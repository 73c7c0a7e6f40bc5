//! Error types for the grammar analysis and translation engine.
//!
//! One variant family per §7 error kind. Every kind aborts the current
//! parse/build; none is recovered locally.

use thiserror::Error;

/// Errors produced while loading or analysing a grammar, building
/// tables, driving a parse, or running the semantic core.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed production line (missing `->`, empty lhs, ...).
    #[error("grammar format error: {0}")]
    GrammarFormat(String),

    /// Table/cluster construction failed structurally (no initial
    /// state, missing goto target, ...).
    #[error("build error: {0}")]
    Build(String),

    /// ACTION missing for (state, terminal) at runtime.
    #[error("parse error at state {state}: no action for lexeme {lexeme:?}")]
    Parse { state: usize, lexeme: String },

    /// `|ACTION cell| > 1` touched at runtime by the driver.
    #[error("parse conflict at state {state}, symbol {symbol}: {actions}")]
    ParseConflict {
        state: usize,
        symbol: String,
        actions: String,
    },

    /// A name was declared twice within one scope.
    #[error("redeclaration of '{name}' in scope '{scope}'")]
    Redeclared { name: String, scope: String },

    /// An identifier was used before being declared in any enclosing
    /// scope.
    #[error("undeclared identifier '{0}'")]
    Undeclared(String),

    /// A call target is not a function/function-pointer entry.
    #[error("'{0}' is not callable")]
    NotCallable(String),

    /// An index was applied to a non-array entry.
    #[error("'{0}' is not an array")]
    NotArray(String),

    /// An array subscript's static type was not `int`.
    #[error("array subscript of '{0}' has type {1}, expected int")]
    NonIntSubscript(String, String),

    /// A constant array subscript fell outside the declared dimension.
    #[error("subscript out of range: {name}[{index}], dimension {dim}")]
    SubscriptOutOfRange { name: String, index: i64, dim: i64 },

    /// A `void`-returning call was used in an expression context.
    #[error("'{0}' returns void and cannot be used as an expression")]
    VoidInExpression(String),

    /// Operand types of a binary expression disagreed.
    #[error("type mismatch: {lhs} {op} {rhs}")]
    TypeMismatch {
        lhs: String,
        op: String,
        rhs: String,
    },

    /// Constant folding attempted a division by a folded zero.
    #[error("division by zero in constant folding")]
    DivisionByZero,

    /// A file could not be opened, or JSON/CSV content was malformed.
    #[error("serialisation error: {0}")]
    Serialisation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Type alias for `Result`s in this crate.
pub type Result<T> = std::result::Result<T, EngineError>;
