//! Type-expression AST nodes (§6.1), used for surface-syntax annotations.
//!
//! This is the *only* place `LiteralStringType` arises from the surface
//! syntax side — general expression contexts always type string literals as
//! `String` (§4.6, Open Question 3).

use mini_bendu_common::SourceLocation;

/// A type-expression node, tagged with its source location.
#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub location: SourceLocation,
}

impl TypeExpr {
    #[must_use]
    pub fn new(kind: TypeExprKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}

/// The closed set of type-expression forms (§6.1).
#[derive(Debug, Clone)]
pub enum TypeExprKind {
    /// A named base type, e.g. `Int`, `String`, or `List(T)`.
    BaseType {
        name: String,
        args: Vec<TypeExpr>,
    },
    FunctionType {
        from: Box<TypeExpr>,
        to: Box<TypeExpr>,
    },
    RecordType {
        fields: Vec<(String, TypeExpr)>,
        /// Name of a row-variable extension, e.g. `{x: Int, ...r}`.
        extension: Option<String>,
    },
    UnionType {
        left: Box<TypeExpr>,
        right: Box<TypeExpr>,
    },
    IntersectionType {
        left: Box<TypeExpr>,
        right: Box<TypeExpr>,
    },
    TupleType(Vec<TypeExpr>),
    LiteralStringType(String),
}
