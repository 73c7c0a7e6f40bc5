//! Synthesised attributes produced by semantic actions and carried on
//! the parse stack alongside states.

/// One synthesised attribute, tagged by which non-terminal (or
/// terminal) produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// A terminal leaf: its lexeme, exposed as `value`.
    Leaf { value: String },
    /// Carried type name (`int`, `void`, `float`).
    T { r#type: String },
    /// Declared name(s).
    D { place: Vec<String> },
    /// A single parameter.
    A { place: Vec<String> },
    /// Parameter-list accumulator.
    Ac { place: Vec<String> },
    /// Expression: r-value location, emitted code, inferred type, and
    /// an optional folded constant (`num`, empty when not constant).
    E {
        place: String,
        code: String,
        r#type: String,
        num: String,
    },
    /// Boolean with true-jump/false-jump label lists.
    B {
        tc: Vec<String>,
        fc: Vec<String>,
        code: String,
    },
    /// A single statement's TAC.
    S { code: String },
    /// Statement-list accumulator.
    Sc { code: Vec<String> },
    /// One actual call argument.
    R { place: String, code: String },
    /// Actual-argument-list accumulator.
    Rc { place: Vec<String>, code: Vec<String> },
    /// The whole program.
    P { code: Vec<String> },
}

impl Attribute {
    /// The lexeme of a terminal leaf attribute.
    pub fn value(&self) -> Option<&str> {
        match self {
            Attribute::Leaf { value } => Some(value),
            _ => None,
        }
    }

    pub fn as_e(&self) -> Option<(&str, &str, &str, &str)> {
        match self {
            Attribute::E {
                place,
                code,
                r#type,
                num,
            } => Some((place, code, r#type, num)),
            _ => None,
        }
    }

    pub fn as_b(&self) -> Option<(&[String], &[String], &str)> {
        match self {
            Attribute::B { tc, fc, code } => Some((tc, fc, code)),
            _ => None,
        }
    }

    pub fn as_t(&self) -> Option<&str> {
        match self {
            Attribute::T { r#type } => Some(r#type),
            _ => None,
        }
    }

    pub fn code(&self) -> String {
        match self {
            Attribute::Leaf { .. } => String::new(),
            Attribute::T { .. } | Attribute::D { .. } | Attribute::A { .. } | Attribute::Ac { .. } => {
                String::new()
            }
            Attribute::E { code, .. } => code.clone(),
            Attribute::B { code, .. } => code.clone(),
            Attribute::S { code } => code.clone(),
            Attribute::Sc { code } => code.concat(),
            Attribute::R { code, .. } => code.clone(),
            Attribute::Rc { code, .. } => code.concat(),
            Attribute::P { code } => code.concat(),
        }
    }
}
