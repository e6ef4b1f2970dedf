//! The type-alias registry (§4.5): `type Name<params> = body` declarations,
//! resolved by one-level unfolding on demand rather than eagerly expanded
//! everywhere they're mentioned — this is what lets a recursive alias like
//! `type List<a> = { head: a, tail: List<a> } | Unit` exist without the
//! registry itself looping.

use crate::atom::Atom;
use crate::fresh::TypeVarGenerator;
use crate::substitution::Substitution;
use crate::types::{TypeId, TypeKey, TypeVarId};
use crate::intern::TypeInterner;
use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AliasError {
    #[error("unknown type alias `{0}`")]
    UnknownAlias(Atom),

    #[error("type alias `{name}` expects {expected} argument(s), found {found}")]
    ArityMismatch {
        name: Atom,
        expected: usize,
        found: usize,
    },
}

#[derive(Clone, Debug)]
struct AliasDef {
    params: Vec<TypeVarId>,
    body: TypeId,
}

/// Maps alias names to their parameters and body. Registration is one-shot:
/// there's no API to mutate a definition after `register`, since aliases are
/// collected once per compilation unit before checking begins (§4.5).
#[derive(Default)]
pub struct AliasRegistry {
    defs: FxHashMap<Atom, AliasDef>,
}

impl AliasRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name<params> = body`. When `recursive` is set, every
    /// self-reference inside `body` (an occurrence of `name` itself, via
    /// `TypeKey::Alias`) is rewritten to a fresh self-variable and the whole
    /// thing is wrapped in a `TypeKey::Recursive` node before being stored
    /// (§4.5 "Recursive aliases are represented as `RecursiveType` after
    /// registration so the unifier treats them correctly", §9). Without
    /// this, `normalize_type` would unfold a self-referential alias through
    /// itself forever, one level at a time, instead of handing the unifier a
    /// single equi-recursive node it already knows how to unify by its
    /// occurs-check-guarded case.
    pub fn register(
        &mut self,
        interner: &TypeInterner,
        gen: &TypeVarGenerator,
        name: impl Into<Atom>,
        params: Vec<TypeVarId>,
        body: TypeId,
        recursive: bool,
    ) {
        let name = name.into();
        let stored_body = if recursive {
            let self_var = gen.fresh();
            let bound_body = bind_self_references(interner, body, &name, self_var);
            interner.recursive(name.clone(), self_var, bound_body)
        } else {
            body
        };

        self.defs.insert(
            name,
            AliasDef {
                params,
                body: stored_body,
            },
        );
    }

    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// Unfolds exactly one level: if `ty` is `TypeKey::Alias(name, args)`,
    /// substitutes `args` for the alias's parameters in its body and
    /// returns the result. Any `Alias` occurring inside that body is left
    /// as-is — callers that need to see through a chain of aliases call
    /// this repeatedly (§4.5 "normalization is one level; callers that need
    /// a head normal form loop until the result is no longer `Alias`").
    ///
    /// A `recursive` alias's stored body is already a `TypeKey::Recursive`
    /// node, so the substitution below only ever touches the alias's
    /// parameters — `self_var` is a fresh variable disjoint from `params`
    /// and is never captured by it.
    ///
    /// Non-`Alias` types are returned unchanged.
    pub fn normalize_type(
        &self,
        interner: &TypeInterner,
        ty: TypeId,
    ) -> Result<TypeId, AliasError> {
        let TypeKey::Alias(alias_ref) = interner.lookup(ty) else {
            return Ok(ty);
        };

        let def = self
            .defs
            .get(&alias_ref.name)
            .ok_or_else(|| AliasError::UnknownAlias(alias_ref.name.clone()))?;

        if def.params.len() != alias_ref.args.len() {
            return Err(AliasError::ArityMismatch {
                name: alias_ref.name.clone(),
                expected: def.params.len(),
                found: alias_ref.args.len(),
            });
        }

        let mut subst = Substitution::empty();
        for (&param, &arg) in def.params.iter().zip(alias_ref.args.iter()) {
            subst.insert(param, arg);
        }
        Ok(subst.apply(interner, def.body))
    }

    /// Repeatedly unfolds until the result is not an alias reference, or
    /// `max_depth` unfoldings have happened (`mini_bendu_common::limits`
    /// bounds a self-referential registry from looping forever).
    pub fn normalize_to_head(
        &self,
        interner: &TypeInterner,
        mut ty: TypeId,
        max_depth: u32,
    ) -> Result<TypeId, AliasError> {
        for _ in 0..max_depth {
            let next = self.normalize_type(interner, ty)?;
            if next == ty {
                return Ok(ty);
            }
            ty = next;
        }
        Ok(ty)
    }
}

/// Rewrites every occurrence of `TypeKey::Alias { name, .. }` inside `ty`
/// into `TypeKey::Var(self_var)`. Mirrors `intern::apply_substitution`'s
/// walk over every type form; the only difference is what triggers a
/// rewrite (a matching alias name, rather than a matching variable).
fn bind_self_references(interner: &TypeInterner, ty: TypeId, name: &Atom, self_var: TypeVarId) -> TypeId {
    match interner.lookup(ty) {
        TypeKey::Primitive(_) | TypeKey::LiteralString(_) | TypeKey::Var(_) => ty,
        TypeKey::Function(domain, codomain) => interner.function(
            bind_self_references(interner, domain, name, self_var),
            bind_self_references(interner, codomain, name, self_var),
        ),
        TypeKey::Tuple(elems) => interner.tuple(
            elems
                .iter()
                .map(|&e| bind_self_references(interner, e, name, self_var))
                .collect(),
        ),
        TypeKey::Record(shape) => {
            let fields = shape
                .fields
                .iter()
                .map(|(field_name, t)| (field_name.clone(), bind_self_references(interner, *t, name, self_var)))
                .collect();
            interner.record(fields, shape.row)
        }
        TypeKey::Union(members) => interner.union(
            members
                .iter()
                .map(|&m| bind_self_references(interner, m, name, self_var))
                .collect(),
        ),
        TypeKey::Intersection(members) => interner.intersection(
            members
                .iter()
                .map(|&m| bind_self_references(interner, m, name, self_var))
                .collect(),
        ),
        TypeKey::Recursive(shape) => interner.recursive(
            shape.name,
            shape.self_var,
            bind_self_references(interner, shape.body, name, self_var),
        ),
        TypeKey::Alias(alias_ref) if &alias_ref.name == name => interner.var(self_var),
        TypeKey::Alias(alias_ref) => interner.alias(
            alias_ref.name,
            alias_ref
                .args
                .iter()
                .map(|&a| bind_self_references(interner, a, name, self_var))
                .collect(),
        ),
    }
}
