//! Exhaustiveness checking over patterns (§4.9).
//!
//! A scrutinee type has an enumerable cover only when it's a closed,
//! finite-alternative shape: `Bool`, a single `LiteralString`, a normalized
//! `Union`, or a `RecursiveType` whose one-step unfolding is one of those.
//! Anything else (`Int`, `String`, `Unit`, functions, tuples, general
//! records, bare type variables) has no enumerable cover and is skipped —
//! match arms over those types are accepted without an exhaustiveness
//! check, the same way the generator only ever emits one `Exhaustiveness`
//! constraint per `match` and lets the solver decide whether it applies.

use crate::constraint::CaseCover;
use mini_bendu_common::limits::{MAX_ALIAS_UNFOLD_DEPTH, MAX_EXHAUSTIVENESS_ALTERNATIVES};
use mini_bendu_types::{AliasRegistry, Substitution, TypeId, TypeInterner, TypeKey};

/// One concrete alternative a scrutinee's enumerable cover can take,
/// carried alongside a human-readable label for error reporting (§6.3,
/// §7 `NonExhaustivePatternMatch{missing}`). `key` is what a case pattern's
/// `CaseCover` is compared against; it's tracked separately from a bare
/// `TypeId` because `Bool`'s two alternatives share one `TypeId` and can
/// only be told apart by the literal value itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverAlternative {
    pub label: String,
    pub key: CaseCover,
}

/// Computes the scrutinee's enumerable cover, or `None` if the type has no
/// finite cover and exhaustiveness doesn't apply.
#[must_use]
pub fn enumerable_cover(interner: &TypeInterner, aliases: &AliasRegistry, ty: TypeId) -> Option<Vec<CoverAlternative>> {
    enumerable_cover_depth(interner, aliases, ty, 0)
}

fn enumerable_cover_depth(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    ty: TypeId,
    depth: u32,
) -> Option<Vec<CoverAlternative>> {
    if depth > MAX_ALIAS_UNFOLD_DEPTH {
        return None;
    }
    match interner.lookup(ty) {
        TypeKey::Primitive(mini_bendu_types::PrimitiveKind::Bool) => Some(vec![
            CoverAlternative {
                label: "True".to_string(),
                key: CaseCover::Bool(true),
            },
            CoverAlternative {
                label: "False".to_string(),
                key: CaseCover::Bool(false),
            },
        ]),
        TypeKey::LiteralString(s) => Some(vec![CoverAlternative {
            label: format!("\"{s}\""),
            key: CaseCover::LiteralString(ty),
        }]),
        TypeKey::Union(members) => {
            if members.len() > MAX_EXHAUSTIVENESS_ALTERNATIVES {
                return None;
            }
            let mut alts = Vec::with_capacity(members.len());
            for m in members {
                let key = match interner.lookup(m) {
                    TypeKey::Primitive(mini_bendu_types::PrimitiveKind::Bool) => {
                        // A bare `Bool` alternative inside a union can't be split into
                        // True/False here; treat the whole union member structurally.
                        CaseCover::Structural(m)
                    }
                    TypeKey::LiteralString(_) => CaseCover::LiteralString(m),
                    _ => CaseCover::Structural(m),
                };
                alts.push(CoverAlternative { label: cover_label(interner, m), key });
            }
            Some(alts)
        }
        TypeKey::Recursive(shape) => {
            let subst = Substitution::single(shape.self_var, ty);
            let unfolded = subst.apply(interner, shape.body);
            enumerable_cover_depth(interner, aliases, unfolded, depth + 1)
        }
        TypeKey::Alias(_) => {
            let unfolded = aliases.normalize_type(interner, ty).ok()?;
            if unfolded == ty {
                None
            } else {
                enumerable_cover_depth(interner, aliases, unfolded, depth + 1)
            }
        }
        _ => None,
    }
}

fn cover_label(interner: &TypeInterner, ty: TypeId) -> String {
    match interner.lookup(ty) {
        TypeKey::Primitive(mini_bendu_types::PrimitiveKind::Bool) => "Bool".to_string(),
        TypeKey::LiteralString(s) => format!("\"{s}\""),
        _ => {
            let namer = mini_bendu_types::Namer::new();
            mini_bendu_types::display_type(interner, &namer, ty)
        }
    }
}

/// Decides whether `covered` (the case patterns' types, one per non-
/// catch-all case) covers the scrutinee's enumerable alternatives, and if
/// not, returns the missing alternatives' labels (§4.9, §8 property 6).
///
/// A `has_catch_all` case (a `Wildcard` or bound `Var` pattern) always
/// makes the match exhaustive, for any scrutinee type — including ones with
/// no enumerable cover at all.
pub fn check_exhaustiveness(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    scrutinee: TypeId,
    covered: &[CaseCover],
    has_catch_all: bool,
) -> Result<(), Vec<String>> {
    if has_catch_all {
        return Ok(());
    }

    let Some(alternatives) = enumerable_cover(interner, aliases, scrutinee) else {
        // No enumerable cover: nothing to check (§4.9 "not applied to...").
        return Ok(());
    };

    let is_covered = |alt_key: &CaseCover| {
        covered.iter().any(|c| match (c, alt_key) {
            (CaseCover::Bool(a), CaseCover::Bool(b)) => a == b,
            (CaseCover::LiteralString(a), CaseCover::LiteralString(b))
            | (CaseCover::Structural(a), CaseCover::Structural(b)) => {
                mini_bendu_types::structurally_equivalent(interner, *a, *b)
            }
            _ => false,
        })
    };

    let missing: Vec<String> = alternatives
        .into_iter()
        .filter(|alt| !is_covered(&alt.key))
        .map(|alt| alt.label)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (TypeInterner, AliasRegistry) {
        (TypeInterner::new(), AliasRegistry::new())
    }

    #[test]
    fn wildcard_case_is_exhaustive_for_any_type() {
        let (interner, aliases) = setup();
        let result = check_exhaustiveness(&interner, &aliases, TypeId::INT, &[], true);
        assert!(result.is_ok());
    }

    #[test]
    fn bool_requires_both_branches() {
        let (interner, aliases) = setup();
        let result = check_exhaustiveness(&interner, &aliases, TypeId::BOOL, &[CaseCover::Bool(true)], false);
        assert!(result.is_err());
        let missing = result.unwrap_err();
        assert_eq!(missing, vec!["False".to_string()]);
    }

    #[test]
    fn bool_is_exhaustive_when_both_branches_are_matched() {
        let (interner, aliases) = setup();
        let covered = [CaseCover::Bool(true), CaseCover::Bool(false)];
        let result = check_exhaustiveness(&interner, &aliases, TypeId::BOOL, &covered, false);
        assert!(result.is_ok());
    }

    #[test]
    fn union_of_literal_strings_is_exhaustive_when_every_alternative_is_covered() {
        let (interner, aliases) = setup();
        let ok = interner.literal_string("ok");
        let err = interner.literal_string("err");
        let scrutinee = interner.union(vec![ok, err]);

        let covered = [CaseCover::LiteralString(ok), CaseCover::LiteralString(err)];
        let result = check_exhaustiveness(&interner, &aliases, scrutinee, &covered, false);
        assert!(result.is_ok());
    }

    #[test]
    fn int_has_no_enumerable_cover_and_is_always_accepted() {
        let (interner, aliases) = setup();
        let result = check_exhaustiveness(&interner, &aliases, TypeId::INT, &[], false);
        assert!(result.is_ok());
    }
}
