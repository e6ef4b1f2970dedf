//! Type schemes and the type environment (§3 "Type Schemes", §4.4).
//!
//! The environment is an immutable, innermost-first scope chain built from
//! `Rc`-linked nodes — `bind` never mutates an existing environment, it
//! returns a new one sharing the old one's tail. This is the same
//! structural-sharing discipline the spec asks of substitutions and
//! constraint sets (§5 "Resources").

use crate::fresh::TypeVarGenerator;
use crate::intern::{apply_substitution, free_vars, TypeInterner};
use crate::substitution::Substitution;
use crate::types::{TypeId, TypeVarId};
use rustc_hash::FxHashSet;
use std::rc::Rc;

/// A universally quantified type, `∀ α₁ … αₙ . T` (§3).
#[derive(Clone, Debug)]
pub struct Scheme {
    pub quantifiers: Vec<TypeVarId>,
    pub ty: TypeId,
}

impl Scheme {
    /// A scheme with no quantifiers — the monomorphic case used for
    /// lambda parameters, non-top-level `let` bindings, and pattern
    /// variables (§4.6 `monomorphic`).
    #[must_use]
    pub fn monomorphic(ty: TypeId) -> Self {
        Self {
            quantifiers: Vec::new(),
            ty,
        }
    }

    #[must_use]
    pub fn free_vars(&self, interner: &TypeInterner) -> FxHashSet<TypeVarId> {
        let mut vars = free_vars(interner, self.ty);
        for q in &self.quantifiers {
            vars.remove(q);
        }
        vars
    }

    #[must_use]
    pub fn instantiate(&self, interner: &TypeInterner, gen: &TypeVarGenerator) -> TypeId {
        let mut subst = Substitution::empty();
        for &q in &self.quantifiers {
            subst.insert(q, interner.var(gen.fresh()));
        }
        apply_substitution(interner, self.ty, &subst)
    }
}

struct EnvNode {
    name: String,
    scheme: Scheme,
    parent: Option<Rc<EnvNode>>,
}

/// Scoped bindings from identifier names to type schemes (§4.4). Cloning a
/// `TypeEnvironment` is an `Rc` clone: O(1) and shares the whole chain.
#[derive(Clone, Default)]
pub struct TypeEnvironment {
    node: Option<Rc<EnvNode>>,
}

impl TypeEnvironment {
    #[must_use]
    pub fn empty() -> Self {
        Self { node: None }
    }

    /// Extends `self` with `name ↦ scheme`, shadowing any outer binding of
    /// the same name. Does not mutate `self`.
    #[must_use]
    pub fn bind(&self, name: impl Into<String>, scheme: Scheme) -> Self {
        Self {
            node: Some(Rc::new(EnvNode {
                name: name.into(),
                scheme,
                parent: self.node.clone(),
            })),
        }
    }

    /// Innermost-first lookup.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Scheme> {
        let mut current = self.node.as_deref();
        while let Some(node) = current {
            if node.name == name {
                return Some(&node.scheme);
            }
            current = node.parent.as_deref();
        }
        None
    }

    /// Free variables of every scheme reachable from this environment
    /// (§4.4 "Generalization quantifies precisely those free variables of
    /// `T` that are not free in the current environment").
    #[must_use]
    pub fn free_vars(&self, interner: &TypeInterner) -> FxHashSet<TypeVarId> {
        let mut out = FxHashSet::default();
        let mut current = self.node.as_deref();
        while let Some(node) = current {
            out.extend(node.scheme.free_vars(interner));
            current = node.parent.as_deref();
        }
        out
    }

    /// Quantifies exactly the free variables of `ty` not free in `self`.
    #[must_use]
    pub fn generalize(&self, interner: &TypeInterner, ty: TypeId) -> Scheme {
        let ty_vars = free_vars(interner, ty);
        let env_vars = self.free_vars(interner);
        let quantifiers: Vec<TypeVarId> = ty_vars.difference(&env_vars).copied().collect();
        Scheme { quantifiers, ty }
    }
}
