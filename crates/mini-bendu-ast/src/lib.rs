//! The AST and type-expression contract that the (out-of-scope) lexer/parser
//! collaborator targets and that the checker consumes.
//!
//! Nothing in this crate produces a tree from source text — there is no
//! lexer or parser here. It exists so that `mini-bendu-checker` has a closed,
//! typed interface to walk, and so that tests can build trees by hand.
//!
//! Every node carries a [`SourceLocation`] (§6.1 of the spec); the checker
//! never mutates a tree structurally, it only attaches inferred types on
//! success.

pub mod expr;
pub mod pattern;
pub mod program;
pub mod type_expr;

pub use expr::{BinaryOperator, Expr, ExprKind, FieldExpr, MatchCase, RecordField, SpreadExpr};
pub use mini_bendu_common::SourceLocation;
pub use pattern::{FieldPattern, Pattern, PatternKind};
pub use program::Program;
pub use type_expr::{TypeExpr, TypeExprKind};
