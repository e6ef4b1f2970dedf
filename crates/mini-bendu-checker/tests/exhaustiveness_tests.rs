//! Exhaustiveness coverage (§4.9) beyond `exhaustiveness::tests`'s bare
//! `Bool`/union cases: a wrapping alias, a genuinely recursive alias (the
//! one-step unfolding the alias registry now produces via `Recursive`
//! rather than looping), and a structural-member union.

use mini_bendu_checker::constraint::CaseCover;
use mini_bendu_checker::exhaustiveness::{check_exhaustiveness, enumerable_cover};
use mini_bendu_types::{AliasRegistry, TypeId, TypeInterner, TypeVarGenerator};

#[test]
fn an_alias_to_a_union_is_covered_through_one_level_of_unfolding() {
    let interner = TypeInterner::new();
    let gen = TypeVarGenerator::new();
    let mut aliases = AliasRegistry::new();

    let ok = interner.literal_string("ok");
    let err = interner.literal_string("err");
    let body = interner.union(vec![ok, err]);
    aliases.register(&interner, &gen, "Status", vec![], body, false);

    let instance = interner.alias("Status", vec![]);
    let covered = [CaseCover::LiteralString(ok), CaseCover::LiteralString(err)];
    assert!(check_exhaustiveness(&interner, &aliases, instance, &covered, false).is_ok());
}

/// `type Tri<a> = { head: a, tail: Tri<a> } | Unit` registered as recursive:
/// its enumerable cover is the union's two alternatives (a record shape and
/// `Unit`), reached through the `Recursive` node's one-step unfolding
/// (§4.9's `RecursiveType` case) rather than exhausting `MAX_ALIAS_UNFOLD_DEPTH`
/// re-deriving the same alias.
#[test]
fn a_recursive_alias_has_an_enumerable_cover_of_its_own_unfolding() {
    let interner = TypeInterner::new();
    let gen = TypeVarGenerator::new();
    let mut aliases = AliasRegistry::new();

    let a = gen.fresh();
    let self_ref = interner.alias("Tri", vec![interner.var(a)]);
    let cons = interner.record(vec![("head".into(), interner.var(a)), ("tail".into(), self_ref)], None);
    let body = interner.union(vec![cons, TypeId::UNIT]);
    aliases.register(&interner, &gen, "Tri", vec![a], body, true);

    let instance = interner.alias("Tri", vec![TypeId::INT]);
    let cover = enumerable_cover(&interner, &aliases, instance).expect("recursive alias should have a finite cover");
    assert_eq!(cover.len(), 2);
}

#[test]
fn a_structural_union_is_exhaustive_once_every_member_is_matched_by_shape() {
    let interner = TypeInterner::new();
    let aliases = AliasRegistry::new();

    let circle = interner.record(vec![("radius".into(), TypeId::INT)], None);
    let square = interner.record(vec![("side".into(), TypeId::INT)], None);
    let scrutinee = interner.union(vec![circle, square]);

    let covered = [CaseCover::Structural(circle)];
    let missing = check_exhaustiveness(&interner, &aliases, scrutinee, &covered, false).unwrap_err();
    assert_eq!(missing.len(), 1);

    let covered_both = [CaseCover::Structural(circle), CaseCover::Structural(square)];
    assert!(check_exhaustiveness(&interner, &aliases, scrutinee, &covered_both, false).is_ok());
}
