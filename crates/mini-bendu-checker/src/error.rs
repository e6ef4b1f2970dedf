//! The error taxonomy (§7): structured, `thiserror`-derived variants rather
//! than an accumulated diagnostics list, since this core is a `Result`-
//! returning, fail-fast pipeline rather than a long-lived checker session.

use mini_bendu_common::SourceLocation;
use mini_bendu_types::{display_type, AliasError, Namer, TypeId, TypeInterner};
use thiserror::Error;

/// Errors the unifier itself can raise (§4.3). A subset of `CompilerError`
/// that the solver wraps with the constraint's location before returning it.
///
/// Variants carry the raw `TypeId`s involved rather than pre-rendered
/// strings: `TypeId` alone can't be formatted without an interner, so
/// callers that print these (the CLI, golden tests) pass the interner and a
/// `Namer` to `CompilerError::render` to get the §6.3 printed form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnificationError {
    #[error("type mismatch")]
    TypeMismatch { expected: TypeId, found: TypeId },

    #[error("infinite type")]
    InfiniteType { var: TypeId, ty: TypeId },

    #[error("arity mismatch: expected {expected} element(s), found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("missing record field(s): {}", .0.join(", "))]
    MissingField(Vec<String>),

    #[error("extra record field(s): {}", .0.join(", "))]
    ExtraField(Vec<String>),

    #[error("literal string mismatch: expected \"{expected}\", found \"{found}\"")]
    LiteralMismatch { expected: String, found: String },

    #[error("no matching alternative in union/intersection unification")]
    NoMatchingAlternative,
}

/// The full taxonomy (§7). `TypeCheckFailure` pairs one of these with the
/// `SourceLocation` of the constraint or AST node that produced it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompilerError {
    #[error(transparent)]
    Unification(#[from] UnificationError),

    #[error("record field `{field}` conflicts between spread and explicit value")]
    RecordFieldConflict { field: String },

    #[error("cannot spread a non-record type")]
    CannotSpreadNonRecord(TypeId),

    #[error("expected a record type")]
    NotARecord(TypeId),

    #[error("subtyping failed")]
    SubtypingError { sub: TypeId, sup: TypeId },

    #[error("pattern is not compatible with scrutinee type")]
    UnionCompatibilityError { scrutinee: TypeId },

    #[error("type class constraint failed: {0}")]
    TypeClassError(String),

    #[error("non-exhaustive pattern match, missing: {}", .missing.join(", "))]
    NonExhaustivePatternMatch { missing: Vec<String> },

    #[error(transparent)]
    Alias(#[from] AliasError),

    #[error("identifier `{0}` is already defined in this scope")]
    IdentifierRedefinition(String),

    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    #[error("internal compiler error: {0}")]
    CompilerBug(String),
}

/// A `CompilerError` pinned to the source location it was raised at (§6.2).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error} at {location}")]
pub struct TypeCheckFailure {
    pub error: CompilerError,
    pub location: SourceLocation,
}

impl TypeCheckFailure {
    #[must_use]
    pub fn new(error: impl Into<CompilerError>, location: SourceLocation) -> Self {
        Self {
            error: error.into(),
            location,
        }
    }

    /// Renders the error with its types spelled out in the §6.3 printed
    /// format, for the CLI and golden tests.
    #[must_use]
    pub fn render(&self, interner: &TypeInterner) -> String {
        format!("{} at {}", self.error.render(interner), self.location)
    }
}

impl CompilerError {
    #[must_use]
    pub fn render(&self, interner: &TypeInterner) -> String {
        let namer = Namer::new();
        let show = |t: TypeId| display_type(interner, &namer, t);
        match self {
            CompilerError::Unification(UnificationError::TypeMismatch { expected, found }) => {
                format!("type mismatch: expected `{}`, found `{}`", show(*expected), show(*found))
            }
            CompilerError::Unification(UnificationError::InfiniteType { var, ty }) => {
                format!("infinite type: `{}` occurs in `{}`", show(*var), show(*ty))
            }
            CompilerError::Unification(other) => other.to_string(),
            CompilerError::CannotSpreadNonRecord(ty) => {
                format!("cannot spread a non-record type `{}`", show(*ty))
            }
            CompilerError::NotARecord(ty) => format!("expected a record type, found `{}`", show(*ty)),
            CompilerError::SubtypingError { sub, sup } => {
                format!("`{}` is not a subtype of `{}`", show(*sub), show(*sup))
            }
            CompilerError::UnionCompatibilityError { scrutinee } => format!(
                "pattern is not compatible with scrutinee type `{}`",
                show(*scrutinee)
            ),
            other => other.to_string(),
        }
    }
}
