use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar kind of the leaves of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Text,
    Bytea,
    Enum,
    Box,
    Record,
}

impl ElementKind {
    pub const ALL: [ElementKind; 12] = [
        ElementKind::Bool,
        ElementKind::Int2,
        ElementKind::Int4,
        ElementKind::Int8,
        ElementKind::Float4,
        ElementKind::Float8,
        ElementKind::Numeric,
        ElementKind::Text,
        ElementKind::Bytea,
        ElementKind::Enum,
        ElementKind::Box,
        ElementKind::Record,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Bool => "bool",
            ElementKind::Int2 => "int2",
            ElementKind::Int4 => "int4",
            ElementKind::Int8 => "int8",
            ElementKind::Float4 => "float4",
            ElementKind::Float8 => "float8",
            ElementKind::Numeric => "numeric",
            ElementKind::Text => "text",
            ElementKind::Bytea => "bytea",
            ElementKind::Enum => "enum",
            ElementKind::Box => "box",
            ElementKind::Record => "record",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared nesting depth of an array shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Exactly this many array levels; `0` is a bare element.
    Fixed(usize),
    /// Any concrete depth of at least one level.
    Unlimited,
}

impl Dimension {
    /// Whether a concrete depth is acceptable for this declaration.
    pub fn accepts(self, actual: usize) -> bool {
        match self {
            Dimension::Fixed(expected) => expected == actual,
            Dimension::Unlimited => actual >= 1,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Fixed(n) => write!(f, "{n}"),
            Dimension::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// Element kind plus dimension: everything needed to parse or produce a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ElementKind,
    pub dimension: Dimension,
}

impl Shape {
    pub fn new(kind: ElementKind, dimension: usize) -> Self {
        Self {
            kind,
            dimension: Dimension::Fixed(dimension),
        }
    }

    pub fn unlimited(kind: ElementKind) -> Self {
        Self {
            kind,
            dimension: Dimension::Unlimited,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.dimension)
    }
}
