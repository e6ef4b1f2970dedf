//! Centralized limits and thresholds for the type checker.
//!
//! Centralizing these avoids duplicate magic numbers scattered across the
//! unifier, constraint generator, and alias registry, and documents why each
//! one exists. Mirrors `tsz_common::limits`.

/// Maximum depth for recursive unification (e.g. chains of alias unfoldings
/// or deeply nested record/tuple structures). Exceeding this returns
/// `UnificationError::InfiniteType` rather than overflowing the stack.
pub const MAX_UNIFICATION_DEPTH: u32 = 512;

/// Maximum number of times a type alias is unfolded while normalizing a
/// single type. Guards against a non-recursive-looking alias cycle that was
/// registered without `recursive: true`.
pub const MAX_ALIAS_UNFOLD_DEPTH: u32 = 256;

/// Maximum number of constraints solved in a single `type_check` call before
/// the solver aborts with `CompilerError::CompilerBug`. Exists purely as a
/// backstop against a constraint-generation bug that emits constraints in a
/// loop; ordinary programs are nowhere near this.
pub const MAX_CONSTRAINTS: usize = 200_000;

/// Maximum number of alternatives considered when checking match
/// exhaustiveness against a union's normalized alternatives.
pub const MAX_EXHAUSTIVENESS_ALTERNATIVES: usize = 4096;
