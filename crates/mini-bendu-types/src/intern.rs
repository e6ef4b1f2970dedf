//! The type interner: hash-consing arena plus the normalizing smart
//! constructors for every type form, and the structural operations defined
//! over them (`free_vars`, `apply_substitution`, `structurally_equivalent`)
//! from §4.1.
//!
//! Hash-consing means structural equality for most type forms collapses to
//! a `TypeId` comparison; the one place that doesn't fall out for free is
//! equi-recursive alpha-equivalence (§3), handled explicitly in
//! `structurally_equivalent`.

use crate::atom::Atom;
use crate::substitution::Substitution;
use crate::types::{AliasRef, PrimitiveKind, RecordShape, RecursiveShape, TypeId, TypeKey, TypeVarId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;

pub struct TypeInterner {
    arena: RefCell<Vec<TypeKey>>,
    map: RefCell<FxHashMap<TypeKey, TypeId>>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    #[must_use]
    pub fn new() -> Self {
        let interner = Self {
            arena: RefCell::new(Vec::new()),
            map: RefCell::new(FxHashMap::default()),
        };
        // Must be inserted in this exact order: TypeId::{INT,STRING,BOOL,UNIT}
        // are reserved indices into the freshly created arena.
        assert_eq!(
            interner.intern(TypeKey::Primitive(PrimitiveKind::Int)),
            TypeId::INT
        );
        assert_eq!(
            interner.intern(TypeKey::Primitive(PrimitiveKind::String)),
            TypeId::STRING
        );
        assert_eq!(
            interner.intern(TypeKey::Primitive(PrimitiveKind::Bool)),
            TypeId::BOOL
        );
        assert_eq!(
            interner.intern(TypeKey::Primitive(PrimitiveKind::Unit)),
            TypeId::UNIT
        );
        interner
    }

    fn intern(&self, key: TypeKey) -> TypeId {
        if let Some(&id) = self.map.borrow().get(&key) {
            return id;
        }
        let id = {
            let mut arena = self.arena.borrow_mut();
            let id = TypeId(arena.len() as u32);
            arena.push(key.clone());
            id
        };
        self.map.borrow_mut().insert(key, id);
        id
    }

    #[must_use]
    pub fn lookup(&self, id: TypeId) -> TypeKey {
        self.arena.borrow()[id.index()].clone()
    }

    // ---- smart constructors -------------------------------------------------

    #[must_use]
    pub fn function(&self, domain: TypeId, codomain: TypeId) -> TypeId {
        self.intern(TypeKey::Function(domain, codomain))
    }

    #[must_use]
    pub fn tuple(&self, elements: Vec<TypeId>) -> TypeId {
        self.intern(TypeKey::Tuple(elements))
    }

    #[must_use]
    pub fn literal_string(&self, s: impl Into<Atom>) -> TypeId {
        self.intern(TypeKey::LiteralString(s.into()))
    }

    #[must_use]
    pub fn var(&self, id: TypeVarId) -> TypeId {
        self.intern(TypeKey::Var(id))
    }

    /// A closed or open record with a canonical (name-sorted) field list.
    /// Duplicate names keep the last occurrence, matching a left-to-right
    /// record-merge fold (§4.8) applying explicit fields after spreads.
    #[must_use]
    pub fn record(&self, fields: Vec<(Atom, TypeId)>, row: Option<TypeVarId>) -> TypeId {
        let mut by_name: Vec<(Atom, TypeId)> = Vec::with_capacity(fields.len());
        for (name, ty) in fields {
            if let Some(slot) = by_name.iter_mut().find(|(n, _)| *n == name) {
                slot.1 = ty;
            } else {
                by_name.push((name, ty));
            }
        }
        by_name.sort_by(|a, b| a.0.cmp(&b.0));
        self.intern(TypeKey::Record(RecordShape {
            fields: by_name,
            row,
        }))
    }

    #[must_use]
    pub fn recursive(&self, name: impl Into<Atom>, self_var: TypeVarId, body: TypeId) -> TypeId {
        self.intern(TypeKey::Recursive(RecursiveShape {
            name: name.into(),
            self_var,
            body,
        }))
    }

    #[must_use]
    pub fn alias(&self, name: impl Into<Atom>, args: Vec<TypeId>) -> TypeId {
        self.intern(TypeKey::Alias(AliasRef {
            name: name.into(),
            args,
        }))
    }

    /// The normalizing factory for unions (§3, §4.1, testable property 4):
    /// flattens nested unions, removes structural duplicates, collapses a
    /// singleton to its member, and drops `LiteralString(_)` alternatives
    /// when `String` is also present.
    #[must_use]
    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat = Vec::with_capacity(members.len());
        flatten(self, &members, true, &mut flat);

        let has_string = flat.iter().any(|&t| t == TypeId::STRING);
        if has_string {
            flat.retain(|&t| !matches!(self.lookup(t), TypeKey::LiteralString(_)));
        }

        let deduped = dedup_structural(self, flat);
        match deduped.len() {
            0 => TypeId::UNIT, // empty union: no information; callers never build this directly
            1 => deduped[0],
            _ => {
                let mut sorted = deduped;
                sorted.sort();
                self.intern(TypeKey::Union(sorted))
            }
        }
    }

    /// The normalizing factory for intersections (§3, §4.1): flattens nested
    /// intersections, removes structural duplicates, collapses a singleton
    /// to its member.
    #[must_use]
    pub fn intersection(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat = Vec::with_capacity(members.len());
        flatten(self, &members, false, &mut flat);

        let deduped = dedup_structural(self, flat);
        match deduped.len() {
            0 => TypeId::UNIT,
            1 => deduped[0],
            _ => {
                let mut sorted = deduped;
                sorted.sort();
                self.intern(TypeKey::Intersection(sorted))
            }
        }
    }
}

fn flatten(interner: &TypeInterner, members: &[TypeId], is_union: bool, out: &mut Vec<TypeId>) {
    for &m in members {
        match interner.lookup(m) {
            TypeKey::Union(alts) if is_union => flatten(interner, &alts, is_union, out),
            TypeKey::Intersection(members) if !is_union => {
                flatten(interner, &members, is_union, out);
            }
            _ => out.push(m),
        }
    }
}

fn dedup_structural(interner: &TypeInterner, members: Vec<TypeId>) -> Vec<TypeId> {
    let mut result: Vec<TypeId> = Vec::with_capacity(members.len());
    for m in members {
        if !result
            .iter()
            .any(|&r| r == m || structurally_equivalent(interner, r, m))
        {
            result.push(m);
        }
    }
    result
}

/// Free type variables of `ty` (§3, §4.1): excludes a `RecursiveType`'s own
/// `self_var`.
#[must_use]
pub fn free_vars(interner: &TypeInterner, ty: TypeId) -> FxHashSet<TypeVarId> {
    let mut out = FxHashSet::default();
    collect_free_vars(interner, ty, &mut out);
    out
}

fn collect_free_vars(interner: &TypeInterner, ty: TypeId, out: &mut FxHashSet<TypeVarId>) {
    match interner.lookup(ty) {
        TypeKey::Primitive(_) | TypeKey::LiteralString(_) => {}
        TypeKey::Var(v) => {
            out.insert(v);
        }
        TypeKey::Function(domain, codomain) => {
            collect_free_vars(interner, domain, out);
            collect_free_vars(interner, codomain, out);
        }
        TypeKey::Tuple(elems) => {
            for e in elems {
                collect_free_vars(interner, e, out);
            }
        }
        TypeKey::Record(shape) => {
            for (_, t) in &shape.fields {
                collect_free_vars(interner, *t, out);
            }
            if let Some(row) = shape.row {
                out.insert(row);
            }
        }
        TypeKey::Union(members) | TypeKey::Intersection(members) => {
            for m in members {
                collect_free_vars(interner, m, out);
            }
        }
        TypeKey::Recursive(shape) => {
            let mut inner = FxHashSet::default();
            collect_free_vars(interner, shape.body, &mut inner);
            inner.remove(&shape.self_var);
            out.extend(inner);
        }
        TypeKey::Alias(alias_ref) => {
            for a in &alias_ref.args {
                collect_free_vars(interner, *a, out);
            }
        }
    }
}

/// Applies a substitution through every subterm (§4.1, §4.2).
///
/// Record rows get special treatment: substituting a row variable with
/// another record type *merges* the two field maps rather than nesting one
/// record inside another (row-polymorphic width extension, §4.3 case 10).
#[must_use]
pub fn apply_substitution(interner: &TypeInterner, ty: TypeId, subst: &Substitution) -> TypeId {
    match interner.lookup(ty) {
        TypeKey::Primitive(_) | TypeKey::LiteralString(_) => ty,
        TypeKey::Var(v) => match subst.get(v) {
            Some(replacement) => apply_substitution(interner, replacement, subst),
            None => ty,
        },
        TypeKey::Function(domain, codomain) => {
            let new_domain = apply_substitution(interner, domain, subst);
            let new_codomain = apply_substitution(interner, codomain, subst);
            interner.function(new_domain, new_codomain)
        }
        TypeKey::Tuple(elems) => {
            let new_elems = elems
                .iter()
                .map(|&e| apply_substitution(interner, e, subst))
                .collect();
            interner.tuple(new_elems)
        }
        TypeKey::Record(shape) => apply_substitution_to_record(interner, &shape, subst),
        TypeKey::Union(members) => {
            let new_members = members
                .iter()
                .map(|&m| apply_substitution(interner, m, subst))
                .collect();
            interner.union(new_members)
        }
        TypeKey::Intersection(members) => {
            let new_members = members
                .iter()
                .map(|&m| apply_substitution(interner, m, subst))
                .collect();
            interner.intersection(new_members)
        }
        TypeKey::Recursive(shape) => {
            let inner_subst = subst.restrict_remove(shape.self_var);
            let new_body = apply_substitution(interner, shape.body, &inner_subst);
            interner.recursive(shape.name, shape.self_var, new_body)
        }
        TypeKey::Alias(alias_ref) => {
            let new_args = alias_ref
                .args
                .iter()
                .map(|&a| apply_substitution(interner, a, subst))
                .collect();
            interner.alias(alias_ref.name, new_args)
        }
    }
}

fn apply_substitution_to_record(
    interner: &TypeInterner,
    shape: &RecordShape,
    subst: &Substitution,
) -> TypeId {
    let new_fields: Vec<(Atom, TypeId)> = shape
        .fields
        .iter()
        .map(|(name, t)| (name.clone(), apply_substitution(interner, *t, subst)))
        .collect();

    let Some(row) = shape.row else {
        return interner.record(new_fields, None);
    };

    let Some(replacement) = subst.get(row) else {
        return interner.record(new_fields, Some(row));
    };

    let resolved = apply_substitution(interner, replacement, subst);
    match interner.lookup(resolved) {
        TypeKey::Record(other) => {
            let mut merged = new_fields;
            merged.extend(other.fields.iter().cloned());
            interner.record(merged, other.row)
        }
        TypeKey::Var(other_row) => interner.record(new_fields, Some(other_row)),
        _ => interner.record(new_fields, Some(row)),
    }
}

/// Structural equivalence (§3, §4.1): field order in records doesn't matter,
/// union/intersection compare as sets, and recursive types compare modulo
/// alpha-renaming of `self_var`.
#[must_use]
pub fn structurally_equivalent(interner: &TypeInterner, a: TypeId, b: TypeId) -> bool {
    if a == b {
        return true;
    }
    match (interner.lookup(a), interner.lookup(b)) {
        (TypeKey::Primitive(x), TypeKey::Primitive(y)) => x == y,
        (TypeKey::LiteralString(x), TypeKey::LiteralString(y)) => x == y,
        (TypeKey::Var(x), TypeKey::Var(y)) => x == y,
        (TypeKey::Function(d1, c1), TypeKey::Function(d2, c2)) => {
            structurally_equivalent(interner, d1, d2) && structurally_equivalent(interner, c1, c2)
        }
        (TypeKey::Tuple(xs), TypeKey::Tuple(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(&x, &y)| structurally_equivalent(interner, x, y))
        }
        (TypeKey::Record(r1), TypeKey::Record(r2)) => {
            r1.row == r2.row
                && r1.fields.len() == r2.fields.len()
                && r1.fields.iter().all(|(name, t1)| {
                    r2.get(name.as_str())
                        .is_some_and(|t2| structurally_equivalent(interner, *t1, t2))
                })
        }
        (TypeKey::Union(xs), TypeKey::Union(ys)) | (TypeKey::Intersection(xs), TypeKey::Intersection(ys)) => {
            sets_equivalent(interner, &xs, &ys)
        }
        (TypeKey::Alias(x), TypeKey::Alias(y)) => {
            x.name == y.name
                && x.args.len() == y.args.len()
                && x.args
                    .iter()
                    .zip(y.args.iter())
                    .all(|(&p, &q)| structurally_equivalent(interner, p, q))
        }
        (TypeKey::Recursive(r1), TypeKey::Recursive(r2)) => {
            let renamed = Substitution::single(r2.self_var, interner.var(r1.self_var));
            let renamed_body = apply_substitution(interner, r2.body, &renamed);
            structurally_equivalent(interner, r1.body, renamed_body)
        }
        _ => false,
    }
}

fn sets_equivalent(interner: &TypeInterner, xs: &[TypeId], ys: &[TypeId]) -> bool {
    if xs.len() != ys.len() {
        return false;
    }
    let mut used = vec![false; ys.len()];
    for &x in xs {
        let Some(slot) = ys
            .iter()
            .enumerate()
            .find(|(i, &y)| !used[*i] && structurally_equivalent(interner, x, y))
        else {
            return false;
        };
        used[slot.0] = true;
    }
    true
}
