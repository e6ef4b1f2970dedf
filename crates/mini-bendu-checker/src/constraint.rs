//! The constraint model (§3 "Constraints", §4.6-§4.7): tagged variants, each
//! carrying a source location and dispatched by priority in the solver.

use mini_bendu_common::SourceLocation;
use mini_bendu_types::{apply_substitution, Substitution, TypeId, TypeInterner};

/// Built-in type classes recognized by `Instance` constraints (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Printable,
    Comparable,
    AddableType,
}

/// One field contributed to a record merge by an explicit `{ name = value }`
/// entry (§4.8), as opposed to a spread.
#[derive(Debug, Clone)]
pub struct ExplicitField {
    pub name: String,
    pub ty: TypeId,
}

/// What one non-catch-all `match` case contributes to covering its
/// scrutinee's enumerable alternatives (§4.9). `Bool` carries the literal
/// value directly because the type algebra has no `LiteralBool` type to key
/// on — both branches of a `Bool` scrutinee share the same `TypeId`, so the
/// underlying boolean value is the only thing that tells them apart.
/// `LiteralString` and `Structural` key on the pattern's inferred `TypeId`,
/// compared against the cover's alternatives by structural equivalence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseCover {
    Bool(bool),
    LiteralString(TypeId),
    Structural(TypeId),
}

/// A single constraint emitted by the generator (§3, §4.6). `priority`
/// governs solve order; lower runs first. Constructors fix the priority so
/// callers can't accidentally mis-order a constraint kind.
#[derive(Debug, Clone)]
pub enum Constraint {
    Equality {
        left: TypeId,
        right: TypeId,
        location: SourceLocation,
    },
    Subtyping {
        sub: TypeId,
        sup: TypeId,
        location: SourceLocation,
    },
    Instance {
        ty: TypeId,
        class: TypeClass,
        location: SourceLocation,
    },
    RecordType {
        ty: TypeId,
        location: SourceLocation,
    },
    Merge {
        result: TypeId,
        spreads: Vec<TypeId>,
        explicit: Vec<ExplicitField>,
        location: SourceLocation,
    },
    UnionCompatibility {
        scrutinee: TypeId,
        pattern: TypeId,
        location: SourceLocation,
    },
    Exhaustiveness {
        scrutinee: TypeId,
        covered: Vec<CaseCover>,
        has_catch_all: bool,
        location: SourceLocation,
    },
}

impl Constraint {
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        match self {
            Constraint::Equality { location, .. }
            | Constraint::Subtyping { location, .. }
            | Constraint::Instance { location, .. }
            | Constraint::RecordType { location, .. }
            | Constraint::Merge { location, .. }
            | Constraint::UnionCompatibility { location, .. }
            | Constraint::Exhaustiveness { location, .. } => *location,
        }
    }

    /// Solve priority: equality first, then subtyping, then instance
    /// constraints, then the remaining structural constraints (§3, §4.7).
    #[must_use]
    pub fn priority(&self) -> u8 {
        match self {
            Constraint::Equality { .. } => 0,
            Constraint::Subtyping { .. } => 1,
            Constraint::Instance { .. } => 2,
            Constraint::RecordType { .. } => 3,
            Constraint::Merge { .. } => 3,
            Constraint::UnionCompatibility { .. } => 3,
            Constraint::Exhaustiveness { .. } => 4,
        }
    }

    /// Applies `subst` to every type this constraint mentions, leaving the
    /// location untouched (§3 "supports `apply_substitution`").
    #[must_use]
    pub fn apply_substitution(&self, interner: &TypeInterner, subst: &Substitution) -> Self {
        let go = |t: TypeId| apply_substitution(interner, t, subst);
        match self {
            Constraint::Equality { left, right, location } => Constraint::Equality {
                left: go(*left),
                right: go(*right),
                location: *location,
            },
            Constraint::Subtyping { sub, sup, location } => Constraint::Subtyping {
                sub: go(*sub),
                sup: go(*sup),
                location: *location,
            },
            Constraint::Instance { ty, class, location } => Constraint::Instance {
                ty: go(*ty),
                class: *class,
                location: *location,
            },
            Constraint::RecordType { ty, location } => Constraint::RecordType {
                ty: go(*ty),
                location: *location,
            },
            Constraint::Merge {
                result,
                spreads,
                explicit,
                location,
            } => Constraint::Merge {
                result: go(*result),
                spreads: spreads.iter().map(|&s| go(s)).collect(),
                explicit: explicit
                    .iter()
                    .map(|f| ExplicitField {
                        name: f.name.clone(),
                        ty: go(f.ty),
                    })
                    .collect(),
                location: *location,
            },
            Constraint::UnionCompatibility {
                scrutinee,
                pattern,
                location,
            } => Constraint::UnionCompatibility {
                scrutinee: go(*scrutinee),
                pattern: go(*pattern),
                location: *location,
            },
            Constraint::Exhaustiveness {
                scrutinee,
                covered,
                has_catch_all,
                location,
            } => Constraint::Exhaustiveness {
                scrutinee: go(*scrutinee),
                covered: covered
                    .iter()
                    .map(|c| match c {
                        CaseCover::Bool(b) => CaseCover::Bool(*b),
                        CaseCover::LiteralString(t) => CaseCover::LiteralString(go(*t)),
                        CaseCover::Structural(t) => CaseCover::Structural(go(*t)),
                    })
                    .collect(),
                has_catch_all: *has_catch_all,
                location: *location,
            },
        }
    }
}

/// An ordered, growable constraint set (§3 "Lifecycle"). Insertion order is
/// preserved for the solver's stable `(priority, insertion_order)` sort.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn extend(&mut self, other: ConstraintSet) {
        self.constraints.extend(other.constraints);
    }

    pub fn equality(&mut self, left: TypeId, right: TypeId, location: SourceLocation) {
        self.push(Constraint::Equality { left, right, location });
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Constraint> {
        self.constraints
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }
}
