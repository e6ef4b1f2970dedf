//! Pattern AST nodes (§4.9). Kept as a separate variant family from
//! expressions rather than sharing a `Node` base — patterns and expressions
//! have disjoint constraint-generation rules and gaining nothing from a
//! shared supertype.

use mini_bendu_common::SourceLocation;

/// A field binding inside a record pattern: `{ x = p }`.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    pub name: String,
    pub pattern: Pattern,
}

/// A pattern node, tagged with its source location.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub kind: PatternKind,
    pub location: SourceLocation,
}

impl Pattern {
    #[must_use]
    pub fn new(kind: PatternKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}

/// The closed set of pattern forms (§4.9).
#[derive(Debug, Clone)]
pub enum PatternKind {
    Wildcard,
    Var(String),
    LiteralInt(i64),
    LiteralString(String),
    LiteralBool(bool),
    Tuple(Vec<Pattern>),
    Record(Vec<FieldPattern>),
}
