//! The constraint solver (§4.7): consumes a constraint set, composes a
//! substitution, or returns the first structured failure (§4.10 fail-fast —
//! no speculative discarding, no retrying prior constraints).

use crate::constraint::{CaseCover, Constraint, ConstraintSet, TypeClass};
use crate::error::{CompilerError, TypeCheckFailure};
use crate::exhaustiveness::check_exhaustiveness;
use crate::merge::merge_record;
use crate::options::CheckerOptions;
use crate::unify::unify;
use mini_bendu_common::limits::MAX_CONSTRAINTS;
use mini_bendu_common::SourceLocation;
use mini_bendu_types::{
    structurally_equivalent, AliasRegistry, PrimitiveKind, Substitution, TypeId, TypeInterner,
    TypeKey, TypeVarGenerator,
};

/// Solves `constraints`, returning the composed substitution or the
/// location-tagged failure of whichever constraint dispatched first.
#[tracing::instrument(level = "debug", skip_all, fields(count = constraints.len()))]
pub fn solve(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    options: &CheckerOptions,
    constraints: ConstraintSet,
) -> Result<Substitution, TypeCheckFailure> {
    let mut items: Vec<Constraint> = constraints.into_vec();
    if items.len() > MAX_CONSTRAINTS {
        return Err(TypeCheckFailure::new(
            CompilerError::CompilerBug("constraint set exceeds the solver's size limit".to_string()),
            items.first().map_or(SourceLocation::synthetic(), Constraint::location),
        ));
    }
    items.sort_by_key(Constraint::priority);

    let mut sigma = Substitution::empty();
    for i in 0..items.len() {
        let constraint = items[i].apply_substitution(interner, &sigma);
        let location = constraint.location();
        tracing::debug!(priority = constraint.priority(), ?location, "dispatching constraint");
        let step = dispatch(interner, aliases, gen, options, &constraint)
            .map_err(|error| TypeCheckFailure::new(error, location))?;
        sigma = Substitution::compose(interner, &step, &sigma);
        for later in items.iter_mut().skip(i + 1) {
            *later = later.apply_substitution(interner, &step);
        }
    }
    Ok(sigma)
}

fn dispatch(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    options: &CheckerOptions,
    constraint: &Constraint,
) -> Result<Substitution, CompilerError> {
    let _ = options;
    match constraint {
        Constraint::Equality { left, right, .. } => unify(interner, aliases, gen, *left, *right).map_err(CompilerError::from),
        Constraint::Subtyping { sub, sup, .. } => solve_subtyping(interner, aliases, gen, *sub, *sup),
        Constraint::Instance { ty, class, .. } => solve_instance(interner, *ty, *class),
        Constraint::RecordType { ty, .. } => solve_record_type(interner, gen, *ty),
        Constraint::Merge { result, spreads, explicit, .. } => {
            let (merged, merge_subst) = merge_record(interner, aliases, gen, spreads, explicit)?;
            let result_subst = unify(interner, aliases, gen, *result, merged)?;
            Ok(Substitution::compose(interner, &result_subst, &merge_subst))
        }
        Constraint::UnionCompatibility { scrutinee, pattern, .. } => {
            solve_union_compatibility(interner, aliases, gen, *scrutinee, *pattern)
        }
        Constraint::Exhaustiveness { scrutinee, covered, has_catch_all, .. } => {
            match check_exhaustiveness(interner, aliases, *scrutinee, covered, *has_catch_all) {
                Ok(()) => Ok(Substitution::empty()),
                Err(missing) => Err(CompilerError::NonExhaustivePatternMatch { missing }),
            }
        }
    }
}

fn solve_subtyping(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    sub: TypeId,
    sup: TypeId,
) -> Result<Substitution, CompilerError> {
    if structurally_equivalent(interner, sub, sup) {
        return Ok(Substitution::empty());
    }

    let sub_key = interner.lookup(sub);
    let sup_key = interner.lookup(sup);
    let mismatch = || CompilerError::SubtypingError { sub, sup };

    if let TypeKey::Union(members) = &sup_key {
        for &m in members {
            if let Ok(s) = unify(interner, aliases, gen, sub, m) {
                return Ok(s);
            }
        }
        return Err(mismatch());
    }
    if let TypeKey::Union(members) = &sub_key {
        let mut acc = Substitution::empty();
        for &m in members {
            let s = unify(interner, aliases, gen, m, sup).map_err(|_| mismatch())?;
            acc = Substitution::compose(interner, &s, &acc);
        }
        return Ok(acc);
    }
    if let TypeKey::Intersection(members) = &sub_key {
        for &m in members {
            if let Ok(s) = unify(interner, aliases, gen, m, sup) {
                return Ok(s);
            }
        }
        return Err(mismatch());
    }
    if let TypeKey::Intersection(members) = &sup_key {
        let mut acc = Substitution::empty();
        for &m in members {
            let s = unify(interner, aliases, gen, sub, m).map_err(|_| mismatch())?;
            acc = Substitution::compose(interner, &s, &acc);
        }
        return Ok(acc);
    }

    if matches!(sub_key, TypeKey::Var(_)) || matches!(sup_key, TypeKey::Var(_)) {
        return unify(interner, aliases, gen, sub, sup).map_err(CompilerError::from);
    }

    match (&sub_key, &sup_key) {
        (TypeKey::Record(sub_shape), TypeKey::Record(sup_shape)) => {
            let mut acc = Substitution::empty();
            for (name, sup_field_ty) in &sup_shape.fields {
                let sub_field_ty = sub_shape.get(name.as_str()).ok_or_else(mismatch)?;
                let s = unify(interner, aliases, gen, sub_field_ty, *sup_field_ty).map_err(|_| mismatch())?;
                acc = Substitution::compose(interner, &s, &acc);
            }
            Ok(acc)
        }
        (TypeKey::Function(sub_dom, sub_cod), TypeKey::Function(sup_dom, sup_cod)) => {
            let dom_subst = unify(interner, aliases, gen, *sup_dom, *sub_dom).map_err(|_| mismatch())?;
            let cod_subst = unify(interner, aliases, gen, *sub_cod, *sup_cod).map_err(|_| mismatch())?;
            Ok(Substitution::compose(interner, &cod_subst, &dom_subst))
        }
        _ => Err(mismatch()),
    }
}

fn solve_instance(interner: &TypeInterner, ty: TypeId, class: TypeClass) -> Result<Substitution, CompilerError> {
    match class {
        TypeClass::Printable => Ok(Substitution::empty()),
        TypeClass::Comparable => {
            if matches!(interner.lookup(ty), TypeKey::Primitive(_)) {
                Ok(Substitution::empty())
            } else {
                Err(CompilerError::TypeClassError("`Comparable` requires a primitive type".to_string()))
            }
        }
        TypeClass::AddableType => match interner.lookup(ty) {
            TypeKey::Primitive(PrimitiveKind::Int) | TypeKey::Primitive(PrimitiveKind::String) => Ok(Substitution::empty()),
            TypeKey::Var(v) => Ok(Substitution::single(v, TypeId::INT)),
            _ => Err(CompilerError::TypeClassError("`AddableType` requires Int or String".to_string())),
        },
    }
}

fn solve_record_type(interner: &TypeInterner, gen: &TypeVarGenerator, ty: TypeId) -> Result<Substitution, CompilerError> {
    match interner.lookup(ty) {
        TypeKey::Record(_) => Ok(Substitution::empty()),
        TypeKey::Var(v) => {
            let row = gen.fresh();
            let open = interner.record(Vec::new(), Some(row));
            Ok(Substitution::single(v, open))
        }
        _ => Err(CompilerError::NotARecord(ty)),
    }
}

fn solve_union_compatibility(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    scrutinee: TypeId,
    pattern: TypeId,
) -> Result<Substitution, CompilerError> {
    match interner.lookup(scrutinee) {
        TypeKey::Var(v) => Ok(Substitution::single(v, pattern)),
        TypeKey::Union(members) => {
            for &m in &members {
                if let Ok(s) = unify(interner, aliases, gen, m, pattern) {
                    return Ok(s);
                }
            }
            Err(CompilerError::UnionCompatibilityError { scrutinee })
        }
        _ if discriminated_compatible(interner, scrutinee, pattern) => Ok(Substitution::empty()),
        _ => unify(interner, aliases, gen, scrutinee, pattern).map_err(CompilerError::from),
    }
}

/// Two record types "coexist in a discriminated union" (§4.7) when they
/// share the same field names and every field unifies except ones that are
/// both `LiteralString`, which are allowed to differ (the discriminator).
fn discriminated_compatible(interner: &TypeInterner, a: TypeId, b: TypeId) -> bool {
    let (TypeKey::Record(ra), TypeKey::Record(rb)) = (interner.lookup(a), interner.lookup(b)) else {
        return false;
    };
    if ra.fields.len() != rb.fields.len() {
        return false;
    }
    ra.fields.iter().all(|(name, ta)| match rb.get(name.as_str()) {
        Some(tb) => {
            structurally_equivalent(interner, *ta, tb)
                || matches!(
                    (interner.lookup(*ta), interner.lookup(tb)),
                    (TypeKey::LiteralString(_), TypeKey::LiteralString(_))
                )
        }
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mini_bendu_common::SourceLocation;

    fn setup() -> (TypeInterner, AliasRegistry, TypeVarGenerator, CheckerOptions) {
        (TypeInterner::new(), AliasRegistry::new(), TypeVarGenerator::new(), CheckerOptions::default())
    }

    #[test]
    fn equality_constraints_solve_through_the_unifier() {
        let (interner, aliases, gen, options) = setup();
        let var = gen.fresh();
        let mut constraints = ConstraintSet::new();
        constraints.equality(interner.var(var), TypeId::INT, SourceLocation::synthetic());

        let subst = solve(&interner, &aliases, &gen, &options, constraints).unwrap();
        assert_eq!(subst.apply(&interner, interner.var(var)), TypeId::INT);
    }

    #[test]
    fn addable_type_defaults_unresolved_variable_to_int() {
        let (interner, aliases, gen, options) = setup();
        let var = gen.fresh();
        let mut constraints = ConstraintSet::new();
        constraints.push(Constraint::Instance {
            ty: interner.var(var),
            class: TypeClass::AddableType,
            location: SourceLocation::synthetic(),
        });

        let subst = solve(&interner, &aliases, &gen, &options, constraints).unwrap();
        assert_eq!(subst.apply(&interner, interner.var(var)), TypeId::INT);
    }

    #[test]
    fn record_width_subtyping_succeeds_when_the_wider_record_has_every_field() {
        let (interner, aliases, gen, options) = setup();
        let wide = interner.record(vec![("x".into(), TypeId::INT), ("y".into(), TypeId::BOOL)], None);
        let narrow = interner.record(vec![("x".into(), TypeId::INT)], None);

        let mut constraints = ConstraintSet::new();
        constraints.push(Constraint::Subtyping {
            sub: wide,
            sup: narrow,
            location: SourceLocation::synthetic(),
        });
        assert!(solve(&interner, &aliases, &gen, &options, constraints).is_ok());
    }

    #[test]
    fn exhaustiveness_failure_surfaces_as_non_exhaustive_pattern_match() {
        let (interner, aliases, gen, options) = setup();
        let mut constraints = ConstraintSet::new();
        constraints.push(Constraint::Exhaustiveness {
            scrutinee: TypeId::BOOL,
            covered: vec![CaseCover::Bool(true)],
            has_catch_all: false,
            location: SourceLocation::synthetic(),
        });

        let err = solve(&interner, &aliases, &gen, &options, constraints).unwrap_err();
        assert!(matches!(err.error, CompilerError::NonExhaustivePatternMatch { .. }));
    }
}
