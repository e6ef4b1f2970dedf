//! The type algebra, independent of any particular AST or checker: interned
//! types, substitutions, type schemes and environments, the alias registry,
//! and printed-type formatting (§3, §4.1-§4.5, §6.3).

pub mod alias;
pub mod atom;
pub mod display;
pub mod env;
pub mod fresh;
pub mod intern;
pub mod substitution;
pub mod types;

pub use alias::{AliasError, AliasRegistry};
pub use atom::Atom;
pub use display::{display_scheme, display_type, Namer};
pub use env::{Scheme, TypeEnvironment};
pub use fresh::TypeVarGenerator;
pub use intern::{apply_substitution, free_vars, structurally_equivalent, TypeInterner};
pub use substitution::Substitution;
pub use types::{
    AliasRef, PrimitiveKind, RecordShape, RecursiveShape, TypeId, TypeKey, TypeVarId,
};
