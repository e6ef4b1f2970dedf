//! Printed type syntax (§6.3): the format a diagnostic or a REPL shows a
//! user, distinct from the internal `TypeKey` shape. Type variables print as
//! reused letters (`a`, `b`, ... `z`, `a1`, `b1`, ...) assigned in order of
//! first appearance within one call, the same scheme
//! `other_examples`'s `escalier` Hindley-Milner implementation uses for its
//! `Namer`.

use crate::env::Scheme;
use crate::intern::TypeInterner;
use crate::types::{PrimitiveKind, TypeId, TypeKey, TypeVarId};
use rustc_hash::FxHashMap;
use std::cell::RefCell;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Assigns short, reusable names to type variables for one print job.
/// Built fresh per call site — it is not meant to persist across prints of
/// unrelated types, since letter `a` in one scheme has no relation to
/// letter `a` in another.
#[derive(Default)]
pub struct Namer {
    assigned: RefCell<FxHashMap<TypeVarId, String>>,
    next: RefCell<u32>,
}

impl Namer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self, var: TypeVarId) -> String {
        if let Some(existing) = self.assigned.borrow().get(&var) {
            return existing.clone();
        }
        let mut next = self.next.borrow_mut();
        let index = *next;
        *next += 1;
        let letter = LETTERS[(index % 26) as usize] as char;
        let suffix = index / 26;
        let name = if suffix == 0 {
            letter.to_string()
        } else {
            format!("{letter}{suffix}")
        };
        self.assigned.borrow_mut().insert(var, name.clone());
        name
    }
}

#[must_use]
pub fn display_type(interner: &TypeInterner, namer: &Namer, ty: TypeId) -> String {
    render(interner, namer, ty)
}

#[must_use]
pub fn display_scheme(interner: &TypeInterner, namer: &Namer, scheme: &Scheme) -> String {
    if scheme.quantifiers.is_empty() {
        return render(interner, namer, scheme.ty);
    }
    let names: Vec<String> = scheme.quantifiers.iter().map(|&v| namer.name(v)).collect();
    format!("[{}] {}", names.join(", "), render(interner, namer, scheme.ty))
}

fn render(interner: &TypeInterner, namer: &Namer, ty: TypeId) -> String {
    match interner.lookup(ty) {
        TypeKey::Primitive(kind) => primitive_name(kind).to_string(),
        TypeKey::LiteralString(s) => format!("\"{s}\""),
        TypeKey::Var(v) => namer.name(v),
        TypeKey::Function(domain, codomain) => {
            format!(
                "({}) -> {}",
                render(interner, namer, domain),
                render(interner, namer, codomain)
            )
        }
        TypeKey::Tuple(elements) => elements
            .iter()
            .map(|&e| render_tuple_member(interner, namer, e))
            .collect::<Vec<_>>()
            .join(" * "),
        TypeKey::Record(shape) => {
            let mut fields: Vec<String> = shape
                .fields
                .iter()
                .map(|(name, field_ty)| format!("{name}: {}", render(interner, namer, *field_ty)))
                .collect();
            if let Some(row) = shape.row {
                fields.push(format!("...{}", namer.name(row)));
            }
            format!("{{{}}}", fields.join(", "))
        }
        TypeKey::Union(members) => members
            .iter()
            .map(|&m| render_union_member(interner, namer, m))
            .collect::<Vec<_>>()
            .join(" | "),
        TypeKey::Intersection(members) => members
            .iter()
            .map(|&m| render_intersection_member(interner, namer, m))
            .collect::<Vec<_>>()
            .join(" & "),
        TypeKey::Recursive(shape) => shape.name.to_string(),
        TypeKey::Alias(alias_ref) => {
            if alias_ref.args.is_empty() {
                alias_ref.name.to_string()
            } else {
                let args: Vec<String> = alias_ref
                    .args
                    .iter()
                    .map(|&a| render(interner, namer, a))
                    .collect();
                format!("{}<{}>", alias_ref.name, args.join(", "))
            }
        }
    }
}

fn primitive_name(kind: PrimitiveKind) -> &'static str {
    kind.name()
}

fn render_union_member(interner: &TypeInterner, namer: &Namer, ty: TypeId) -> String {
    let rendered = render(interner, namer, ty);
    match interner.lookup(ty) {
        TypeKey::Function(..) | TypeKey::Intersection(..) => format!("({rendered})"),
        _ => rendered,
    }
}

fn render_intersection_member(interner: &TypeInterner, namer: &Namer, ty: TypeId) -> String {
    let rendered = render(interner, namer, ty);
    match interner.lookup(ty) {
        TypeKey::Function(..) | TypeKey::Union(..) => format!("({rendered})"),
        _ => rendered,
    }
}

fn render_tuple_member(interner: &TypeInterner, namer: &Namer, ty: TypeId) -> String {
    let rendered = render(interner, namer, ty);
    match interner.lookup(ty) {
        TypeKey::Function(..) | TypeKey::Union(..) | TypeKey::Intersection(..) | TypeKey::Tuple(..) => {
            format!("({rendered})")
        }
        _ => rendered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fresh::TypeVarGenerator;

    #[test]
    fn primitives_and_literals_print_plainly() {
        let interner = TypeInterner::new();
        let namer = Namer::new();
        assert_eq!(display_type(&interner, &namer, TypeId::INT), "Int");
        let lit = interner.literal_string("ok");
        assert_eq!(display_type(&interner, &namer, lit), "\"ok\"");
    }

    #[test]
    fn function_types_parenthesize_the_domain() {
        let interner = TypeInterner::new();
        let namer = Namer::new();
        let ty = interner.function(TypeId::INT, TypeId::STRING);
        assert_eq!(display_type(&interner, &namer, ty), "(Int) -> String");
    }

    #[test]
    fn type_variables_reuse_letters_within_one_print() {
        let interner = TypeInterner::new();
        let namer = Namer::new();
        let gen = TypeVarGenerator::new();
        let a = gen.fresh();
        let ty = interner.function(interner.var(a), interner.var(a));
        assert_eq!(display_type(&interner, &namer, ty), "(a) -> a");
    }

    #[test]
    fn records_print_fields_in_sorted_order_with_open_row() {
        let interner = TypeInterner::new();
        let namer = Namer::new();
        let gen = TypeVarGenerator::new();
        let row = gen.fresh();
        let ty = interner.record(
            vec![("y".into(), TypeId::BOOL), ("x".into(), TypeId::INT)],
            Some(row),
        );
        assert_eq!(display_type(&interner, &namer, ty), "{x: Int, y: Bool, ...a}");
    }

    #[test]
    fn union_members_needing_parens_get_them() {
        let interner = TypeInterner::new();
        let namer = Namer::new();
        let intersection = interner.intersection(vec![TypeId::INT, TypeId::STRING]);
        let ty = interner.union(vec![intersection, TypeId::BOOL]);
        assert_eq!(display_type(&interner, &namer, ty), "Bool | (Int & String)");
    }
}
