//! Expression AST nodes (§6.1).

use crate::pattern::Pattern;
use crate::type_expr::TypeExpr;
use mini_bendu_common::SourceLocation;

/// A single binary operator, grouped by the class the constraint generator
/// dispatches on (§4.6 `BinaryOp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Star,
    Slash,
    EqualEqual,
    NotEqual,
    And,
    Or,
}

impl BinaryOperator {
    #[must_use]
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Plus | Self::Minus | Self::Star | Self::Slash
        )
    }

    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::EqualEqual | Self::NotEqual)
    }

    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// An explicit field in a record literal: `x = 1`.
#[derive(Debug, Clone)]
pub struct FieldExpr {
    pub name: String,
    pub value: Expr,
}

/// A spread in a record literal: `...other`.
#[derive(Debug, Clone)]
pub struct SpreadExpr {
    pub value: Expr,
}

/// One entry of a record literal — either a named field or a spread.
#[derive(Debug, Clone)]
pub enum RecordField {
    Field(FieldExpr),
    Spread(SpreadExpr),
}

/// One `| pattern => body` arm of a `match`.
#[derive(Debug, Clone)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub body: Expr,
}

/// An expression node, tagged with its source location.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: SourceLocation,
}

impl Expr {
    #[must_use]
    pub fn new(kind: ExprKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}

/// The closed set of expression forms (§6.1).
#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLit(i64),
    StringLit(String),
    BoolLit(bool),
    UnitLit,
    Var(String),
    Lambda {
        param: String,
        annotation: Option<TypeExpr>,
        body: Box<Expr>,
    },
    Application {
        func: Box<Expr>,
        args: Vec<Expr>,
    },
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Let {
        name: String,
        recursive: bool,
        annotation: Option<TypeExpr>,
        value: Box<Expr>,
        body: Option<Box<Expr>>,
    },
    Record(Vec<RecordField>),
    Projection {
        target: Box<Expr>,
        field: String,
    },
    Tuple(Vec<Expr>),
    Match {
        scrutinee: Box<Expr>,
        cases: Vec<MatchCase>,
    },
}
