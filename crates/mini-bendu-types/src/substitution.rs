//! Substitutions: finite maps from type-variable identities to types (§3,
//! §4.2). Values, not state — composition is explicit and there is no
//! global mutable substitution anywhere in the core.

use crate::intern::{apply_substitution, TypeInterner};
use crate::types::{TypeId, TypeVarId};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Clone, Debug, Default)]
pub struct Substitution {
    map: FxHashMap<TypeVarId, TypeId>,
}

impl Substitution {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A substitution binding a single variable. The occurs check belongs to
    /// the unifier (§4.2 "Failure: none; illegal single-assignments raise an
    /// occurs-check error at the unifier boundary") — this constructor never
    /// fails.
    #[must_use]
    pub fn single(var: TypeVarId, ty: TypeId) -> Self {
        let mut map = FxHashMap::default();
        map.insert(var, ty);
        Self { map }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn get(&self, var: TypeVarId) -> Option<TypeId> {
        self.map.get(&var).copied()
    }

    pub fn insert(&mut self, var: TypeVarId, ty: TypeId) {
        self.map.insert(var, ty);
    }

    /// All bindings except `var`. Used when applying a substitution to the
    /// body of a `RecursiveType`, where `self_var` must never be rewritten
    /// even if a caller's substitution happens to mention it.
    #[must_use]
    pub fn restrict_remove(&self, var: TypeVarId) -> Self {
        Self {
            map: self
                .map
                .iter()
                .filter(|(k, _)| **k != var)
                .map(|(k, v)| (*k, *v))
                .collect(),
        }
    }

    /// Only the bindings whose key is in `keep`.
    #[must_use]
    pub fn restrict(&self, keep: &FxHashSet<TypeVarId>) -> Self {
        Self {
            map: self
                .map
                .iter()
                .filter(|(k, _)| keep.contains(k))
                .map(|(k, v)| (*k, *v))
                .collect(),
        }
    }

    #[must_use]
    pub fn apply(&self, interner: &TypeInterner, ty: TypeId) -> TypeId {
        apply_substitution(interner, ty, self)
    }

    /// `compose(newer, older)` satisfies `compose(newer, older)(T) ==
    /// newer(older(T))` (§4.2). Applying the result twice is a no-op because
    /// `apply_substitution` already chases a variable's binding through to a
    /// fixed point at apply-time, so there is nothing left for a second pass
    /// to change (testable property 2).
    #[must_use]
    pub fn compose(interner: &TypeInterner, newer: &Substitution, older: &Substitution) -> Self {
        let mut map: FxHashMap<TypeVarId, TypeId> = older
            .map
            .iter()
            .map(|(&k, &v)| (k, apply_substitution(interner, v, newer)))
            .collect();
        for (&k, &v) in &newer.map {
            map.entry(k).or_insert(v);
        }
        Self { map }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVarId, TypeId)> + '_ {
        self.map.iter().map(|(&k, &v)| (k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fresh::TypeVarGenerator;

    #[test]
    fn compose_matches_sequential_application() {
        let interner = TypeInterner::new();
        let gen = TypeVarGenerator::new();
        let a = gen.fresh();
        let b = gen.fresh();

        let older = Substitution::single(a, interner.var(b));
        let newer = Substitution::single(b, TypeId::INT);

        let composed = Substitution::compose(&interner, &newer, &older);
        let via_compose = composed.apply(&interner, interner.var(a));

        let sequential = newer.apply(&interner, older.apply(&interner, interner.var(a)));
        assert_eq!(via_compose, sequential);
        assert_eq!(via_compose, TypeId::INT);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let interner = TypeInterner::new();
        let gen = TypeVarGenerator::new();
        let a = gen.fresh();
        let subst = Substitution::single(a, TypeId::STRING);

        let ty = interner.function(interner.var(a), TypeId::BOOL);
        let once = subst.apply(&interner, ty);
        let twice = subst.apply(&interner, once);
        assert_eq!(once, twice);
    }

    #[test]
    fn restrict_remove_drops_only_the_named_variable() {
        let gen = TypeVarGenerator::new();
        let a = gen.fresh();
        let b = gen.fresh();
        let mut subst = Substitution::empty();
        subst.insert(a, TypeId::INT);
        subst.insert(b, TypeId::BOOL);

        let restricted = subst.restrict_remove(a);
        assert_eq!(restricted.get(a), None);
        assert_eq!(restricted.get(b), Some(TypeId::BOOL));
    }
}
