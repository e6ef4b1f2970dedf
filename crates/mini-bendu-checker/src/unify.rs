//! The unifier (§4.3): computes a most-general substitution between two
//! types, or a structured `UnificationError`. Cases are tried in the exact
//! order §4.3 lists them.

use crate::error::UnificationError;
use mini_bendu_common::limits::MAX_UNIFICATION_DEPTH;
use mini_bendu_types::{
    apply_substitution, free_vars, structurally_equivalent, AliasRegistry, PrimitiveKind,
    RecordShape, RecursiveShape, Substitution, TypeId, TypeInterner, TypeKey, TypeVarGenerator,
    TypeVarId,
};

pub type UnifyResult = Result<Substitution, UnificationError>;

/// Unifies `a` and `b`, consulting `aliases` to unfold `TypeAlias`
/// references one level at a time (§4.3 case 2). `gen` supplies the fresh
/// row variable row unification needs (§4.3 case 10, both-open branch) — the
/// unifier holds no generator of its own (§5, §9: the fresh-variable counter
/// is the caller's state, passed in rather than global).
pub fn unify(interner: &TypeInterner, aliases: &AliasRegistry, gen: &TypeVarGenerator, a: TypeId, b: TypeId) -> UnifyResult {
    unify_depth(interner, aliases, gen, a, b, 0)
}

fn unify_depth(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    a: TypeId,
    b: TypeId,
    depth: u32,
) -> UnifyResult {
    if depth > MAX_UNIFICATION_DEPTH {
        return Err(UnificationError::InfiniteType { var: a, ty: b });
    }

    // Case 1: identical by structural equivalence.
    if structurally_equivalent(interner, a, b) {
        return Ok(Substitution::empty());
    }

    let key_a = interner.lookup(a);
    let key_b = interner.lookup(b);

    // Case 2: alias or recursive-type unfolding.
    if let TypeKey::Alias(_) = &key_a {
        let unfolded = aliases
            .normalize_type(interner, a)
            .map_err(|_| UnificationError::TypeMismatch { expected: a, found: b })?;
        return unify_depth(interner, aliases, gen, unfolded, b, depth + 1);
    }
    if let TypeKey::Alias(_) = &key_b {
        let unfolded = aliases
            .normalize_type(interner, b)
            .map_err(|_| UnificationError::TypeMismatch { expected: a, found: b })?;
        return unify_depth(interner, aliases, gen, a, unfolded, depth + 1);
    }
    if let TypeKey::Recursive(shape) = &key_a {
        let unfolded = unfold_recursive(interner, a, shape);
        return unify_depth(interner, aliases, gen, unfolded, b, depth + 1);
    }
    if let TypeKey::Recursive(shape) = &key_b {
        let unfolded = unfold_recursive(interner, b, shape);
        return unify_depth(interner, aliases, gen, a, unfolded, depth + 1);
    }

    // Cases 3-4: a type variable against anything.
    if let TypeKey::Var(v) = &key_a {
        return bind_var(interner, *v, b);
    }
    if let TypeKey::Var(v) = &key_b {
        return bind_var(interner, *v, a);
    }

    match (key_a, key_b) {
        // Case 5: primitives.
        (TypeKey::Primitive(x), TypeKey::Primitive(y)) => {
            if x == y {
                Ok(Substitution::empty())
            } else {
                Err(UnificationError::TypeMismatch { expected: a, found: b })
            }
        }

        // Case 6: literal strings.
        (TypeKey::LiteralString(x), TypeKey::LiteralString(y)) => {
            if x == y {
                Ok(Substitution::empty())
            } else {
                Err(UnificationError::LiteralMismatch {
                    expected: x.to_string(),
                    found: y.to_string(),
                })
            }
        }

        // Case 7: a literal string is subsumed by `String` in either position.
        (TypeKey::LiteralString(_), TypeKey::Primitive(PrimitiveKind::String))
        | (TypeKey::Primitive(PrimitiveKind::String), TypeKey::LiteralString(_)) => {
            Ok(Substitution::empty())
        }

        // Case 8: functions.
        (TypeKey::Function(a1, b1), TypeKey::Function(a2, b2)) => {
            let s1 = unify_depth(interner, aliases, gen, a1, a2, depth + 1)?;
            let b1p = s1.apply(interner, b1);
            let b2p = s1.apply(interner, b2);
            let s2 = unify_depth(interner, aliases, gen, b1p, b2p, depth + 1)?;
            Ok(Substitution::compose(interner, &s2, &s1))
        }

        // Case 9: tuples.
        (TypeKey::Tuple(xs), TypeKey::Tuple(ys)) => {
            if xs.len() != ys.len() {
                return Err(UnificationError::ArityMismatch {
                    expected: xs.len(),
                    found: ys.len(),
                });
            }
            unify_pointwise(interner, aliases, gen, &xs, &ys, depth)
        }

        // Case 10: records, row unification.
        (TypeKey::Record(r1), TypeKey::Record(r2)) => unify_records(interner, aliases, gen, &r1, &r2, depth),

        // Case 11: union vs union.
        (TypeKey::Union(xs), TypeKey::Union(ys)) => unify_bijection(interner, aliases, gen, &xs, &ys, depth),

        // Case 12: union vs non-union — exactly one alternative must unify.
        (TypeKey::Union(alts), _) => unify_one_alternative(interner, aliases, gen, &alts, b, depth),
        (_, TypeKey::Union(alts)) => unify_one_alternative(interner, aliases, gen, &alts, a, depth),

        // Case 13: intersection — every member must unify with the counterpart.
        (TypeKey::Intersection(members), _) => unify_every_member(interner, aliases, gen, &members, b, depth),
        (_, TypeKey::Intersection(members)) => unify_every_member(interner, aliases, gen, &members, a, depth),

        // Case 14: nothing else matches.
        _ => Err(UnificationError::TypeMismatch { expected: a, found: b }),
    }
}

/// One-step unfolding of `μ self_var . body`: substitutes `self_var` with
/// the recursive type itself, the standard equi-recursive unfold (§4.3 case
/// 2, §9). No alpha-renaming is needed — `self_var`'s identity is stable and
/// hash-consing means re-unfolding the same recursive type always produces
/// the same `TypeId`, so two unfoldings along one derivation never alias.
fn unfold_recursive(interner: &TypeInterner, original: TypeId, shape: &RecursiveShape) -> TypeId {
    let subst = Substitution::single(shape.self_var, original);
    apply_substitution(interner, shape.body, &subst)
}

fn bind_var(interner: &TypeInterner, var: TypeVarId, ty: TypeId) -> UnifyResult {
    if interner.var(var) == ty {
        return Ok(Substitution::empty());
    }
    if occurs(interner, var, ty) {
        return Err(UnificationError::InfiniteType { var: interner.var(var), ty });
    }
    Ok(Substitution::single(var, ty))
}

/// The occurs check (§3, §4.3 case 3, §8 property 3): `var` may appear
/// inside `ty` only behind a `RecursiveType` that already binds it as its
/// own `self_var` — any other appearance would build an infinite type.
fn occurs(interner: &TypeInterner, var: TypeVarId, ty: TypeId) -> bool {
    match interner.lookup(ty) {
        TypeKey::Recursive(shape) if shape.self_var == var => false,
        _ => free_vars(interner, ty).contains(&var),
    }
}

fn unify_pointwise(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    xs: &[TypeId],
    ys: &[TypeId],
    depth: u32,
) -> UnifyResult {
    let mut subst = Substitution::empty();
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let x = subst.apply(interner, x);
        let y = subst.apply(interner, y);
        let next = unify_depth(interner, aliases, gen, x, y, depth + 1)?;
        subst = Substitution::compose(interner, &next, &subst);
    }
    Ok(subst)
}

fn unify_records(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    r1: &RecordShape,
    r2: &RecordShape,
    depth: u32,
) -> UnifyResult {
    let mut subst = Substitution::empty();

    for (name, t1) in &r1.fields {
        if let Some(t2) = r2.get(name.as_str()) {
            let t1 = subst.apply(interner, *t1);
            let t2 = subst.apply(interner, t2);
            let next = unify_depth(interner, aliases, gen, t1, t2, depth + 1)?;
            subst = Substitution::compose(interner, &next, &subst);
        }
    }

    let only1: Vec<_> = r1
        .fields
        .iter()
        .filter(|(name, _)| r2.get(name.as_str()).is_none())
        .cloned()
        .collect();
    let only2: Vec<_> = r2
        .fields
        .iter()
        .filter(|(name, _)| r1.get(name.as_str()).is_none())
        .cloned()
        .collect();

    match (r1.row, r2.row) {
        (None, None) => {
            if only1.is_empty() && only2.is_empty() {
                Ok(subst)
            } else {
                let mut missing: Vec<String> =
                    only1.iter().chain(only2.iter()).map(|(n, _)| n.to_string()).collect();
                missing.sort();
                missing.dedup();
                Err(UnificationError::MissingField(missing))
            }
        }
        (Some(row1), None) => {
            if !only1.is_empty() {
                Err(UnificationError::ExtraField(
                    only1.iter().map(|(n, _)| n.to_string()).collect(),
                ))
            } else {
                let closed = interner.record(only2, None);
                let binding = bind_var(interner, row1, closed)?;
                Ok(Substitution::compose(interner, &binding, &subst))
            }
        }
        (None, Some(row2)) => {
            if !only2.is_empty() {
                Err(UnificationError::ExtraField(
                    only2.iter().map(|(n, _)| n.to_string()).collect(),
                ))
            } else {
                let closed = interner.record(only1, None);
                let binding = bind_var(interner, row2, closed)?;
                Ok(Substitution::compose(interner, &binding, &subst))
            }
        }
        (Some(row1), Some(row2)) => {
            let fresh_row = gen.fresh();
            let bind1 = bind_var(interner, row1, interner.record(only2, Some(fresh_row)))?;
            let bind2 = bind_var(interner, row2, interner.record(only1, Some(fresh_row)))?;
            let composed = Substitution::compose(interner, &bind2, &bind1);
            Ok(Substitution::compose(interner, &composed, &subst))
        }
    }
}

fn unify_bijection(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    xs: &[TypeId],
    ys: &[TypeId],
    depth: u32,
) -> UnifyResult {
    if xs.len() != ys.len() {
        return Err(UnificationError::NoMatchingAlternative);
    }
    match_bijection(interner, aliases, gen, xs, ys, depth, &mut vec![false; ys.len()])
        .ok_or(UnificationError::NoMatchingAlternative)
}

/// Greedy backtracking search for a bijection between `xs` and the
/// not-yet-used elements of `ys` under unification (§4.3 case 11).
fn match_bijection(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    xs: &[TypeId],
    ys: &[TypeId],
    depth: u32,
    used: &mut Vec<bool>,
) -> Option<Substitution> {
    let Some((x, rest)) = xs.split_first() else {
        return Some(Substitution::empty());
    };
    for (i, &y) in ys.iter().enumerate() {
        if used[i] {
            continue;
        }
        if let Ok(subst) = unify_depth(interner, aliases, gen, *x, y, depth + 1) {
            used[i] = true;
            if let Some(rest_subst) = match_bijection(interner, aliases, gen, rest, ys, depth, used) {
                return Some(Substitution::compose(interner, &rest_subst, &subst));
            }
            used[i] = false;
        }
    }
    None
}

fn unify_one_alternative(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    alts: &[TypeId],
    other: TypeId,
    depth: u32,
) -> UnifyResult {
    for &alt in alts {
        if let Ok(subst) = unify_depth(interner, aliases, gen, alt, other, depth + 1) {
            return Ok(subst);
        }
    }
    Err(UnificationError::NoMatchingAlternative)
}

fn unify_every_member(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    members: &[TypeId],
    other: TypeId,
    depth: u32,
) -> UnifyResult {
    let mut subst = Substitution::empty();
    for &member in members {
        let member = subst.apply(interner, member);
        let other_applied = subst.apply(interner, other);
        let next = unify_depth(interner, aliases, gen, member, other_applied, depth + 1)?;
        subst = Substitution::compose(interner, &next, &subst);
    }
    Ok(subst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (TypeInterner, AliasRegistry, TypeVarGenerator) {
        (TypeInterner::new(), AliasRegistry::new(), TypeVarGenerator::new())
    }

    #[test]
    fn identical_primitives_unify_with_empty_substitution() {
        let (interner, aliases, gen) = setup();
        let subst = unify(&interner, &aliases, &gen, TypeId::INT, TypeId::INT).unwrap();
        assert!(subst.is_empty());
    }

    #[test]
    fn mismatched_primitives_fail() {
        let (interner, aliases, gen) = setup();
        let err = unify(&interner, &aliases, &gen, TypeId::INT, TypeId::STRING).unwrap_err();
        assert!(matches!(err, UnificationError::TypeMismatch { .. }));
    }

    #[test]
    fn variable_binds_to_concrete_type() {
        let (interner, aliases, gen) = setup();
        let v = gen.fresh();
        let subst = unify(&interner, &aliases, &gen, interner.var(v), TypeId::INT).unwrap();
        assert_eq!(subst.get(v), Some(TypeId::INT));
    }

    #[test]
    fn occurs_check_rejects_infinite_types() {
        let (interner, aliases, gen) = setup();
        let v = gen.fresh();
        let cyclic = interner.function(interner.var(v), TypeId::INT);
        let err = unify(&interner, &aliases, &gen, interner.var(v), cyclic).unwrap_err();
        assert!(matches!(err, UnificationError::InfiniteType { .. }));
    }

    #[test]
    fn occurs_check_permits_recursive_type_self_reference() {
        let (interner, aliases, gen) = setup();
        let v = gen.fresh();
        let body = interner.record(vec![("next".into(), interner.var(v))], None);
        let rec = interner.recursive("R", v, body);
        assert!(!occurs(&interner, v, rec));
    }

    #[test]
    fn literal_string_is_subsumed_by_string() {
        let (interner, aliases, gen) = setup();
        let lit = interner.literal_string("ok");
        let subst = unify(&interner, &aliases, &gen, lit, TypeId::STRING).unwrap();
        assert!(subst.is_empty());
    }

    #[test]
    fn functions_unify_contravariantly_in_structure() {
        let (interner, aliases, gen) = setup();
        let v = gen.fresh();
        let f1 = interner.function(interner.var(v), TypeId::INT);
        let f2 = interner.function(TypeId::BOOL, TypeId::INT);
        let subst = unify(&interner, &aliases, &gen, f1, f2).unwrap();
        assert_eq!(subst.get(v), Some(TypeId::BOOL));
    }

    #[test]
    fn closed_records_require_exact_field_sets() {
        let (interner, aliases, gen) = setup();
        let r1 = interner.record(vec![("x".into(), TypeId::INT)], None);
        let r2 = interner.record(vec![("x".into(), TypeId::INT), ("y".into(), TypeId::BOOL)], None);
        let err = unify(&interner, &aliases, &gen, r1, r2).unwrap_err();
        assert!(matches!(err, UnificationError::MissingField(_)));
    }

    #[test]
    fn open_record_absorbs_extra_fields_from_closed_record() {
        let (interner, aliases, gen) = setup();
        let row = gen.fresh();
        let open = interner.record(vec![("x".into(), TypeId::INT)], Some(row));
        let closed = interner.record(vec![("x".into(), TypeId::INT), ("y".into(), TypeId::BOOL)], None);
        let subst = unify(&interner, &aliases, &gen, open, closed).unwrap();
        let bound = subst.get(row).expect("row variable bound");
        let TypeKey::Record(shape) = interner.lookup(bound) else {
            panic!("expected a record");
        };
        assert_eq!(shape.get("y"), Some(TypeId::BOOL));
    }

    #[test]
    fn two_open_records_unify_by_exchanging_their_extra_fields() {
        let (interner, aliases, gen) = setup();
        let row1 = gen.fresh();
        let row2 = gen.fresh();
        let r1 = interner.record(vec![("x".into(), TypeId::INT)], Some(row1));
        let r2 = interner.record(vec![("y".into(), TypeId::BOOL)], Some(row2));
        let subst = unify(&interner, &aliases, &gen, r1, r2).unwrap();
        assert!(subst.get(row1).is_some());
        assert!(subst.get(row2).is_some());
    }

    #[test]
    fn union_against_non_union_matches_exactly_one_alternative() {
        let (interner, aliases, gen) = setup();
        let union = interner.union(vec![TypeId::INT, TypeId::BOOL]);
        let subst = unify(&interner, &aliases, &gen, union, TypeId::INT).unwrap();
        assert!(subst.is_empty());
    }

    #[test]
    fn recursive_types_unfold_and_unify_against_their_own_shape() {
        let (interner, aliases, gen) = setup();
        let v1 = gen.fresh();
        let body1 = interner.union(vec![
            TypeId::UNIT,
            interner.record(vec![("tail".into(), interner.var(v1))], None),
        ]);
        let r1 = interner.recursive("List", v1, body1);

        let v2 = gen.fresh();
        let body2 = interner.union(vec![
            TypeId::UNIT,
            interner.record(vec![("tail".into(), interner.var(v2))], None),
        ]);
        let r2 = interner.recursive("List", v2, body2);

        let subst = unify(&interner, &aliases, &gen, r1, r2).unwrap();
        assert!(subst.is_empty());
    }
}
