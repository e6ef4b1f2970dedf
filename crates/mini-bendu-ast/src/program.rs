//! A whole compilation unit (§6.2 `type_check_program`): a sequence of
//! top-level declarations threaded through a growing environment.
//!
//! Every declaration is itself an `Expr` — almost always a `Let` with no
//! `body` (the binding simply persists for subsequent declarations), though
//! nothing enforces that shape here; a final bare expression is a valid
//! program too; it just can't be referred to by later declarations.

use crate::expr::Expr;

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub declarations: Vec<Expr>,
}

impl Program {
    #[must_use]
    pub fn new(declarations: Vec<Expr>) -> Self {
        Self { declarations }
    }
}
