//! Record merging (§4.8): folds spread types and explicit fields into one
//! open record, used by the solver's `Merge` dispatch (§4.7).

use crate::constraint::ExplicitField;
use crate::error::CompilerError;
use crate::unify::unify;
use mini_bendu_types::{AliasRegistry, Atom, Substitution, TypeId, TypeInterner, TypeKey, TypeVarGenerator};

/// Folds `spreads` left-to-right, then applies `explicit` on top, producing
/// an always-open record plus the substitution accumulated along the way.
pub fn merge_record(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    spreads: &[TypeId],
    explicit: &[ExplicitField],
) -> Result<(TypeId, Substitution), CompilerError> {
    let mut fields: Vec<(Atom, TypeId)> = Vec::new();
    let mut subst = Substitution::empty();

    for &spread in spreads {
        let spread = subst.apply(interner, spread);
        match interner.lookup(spread) {
            TypeKey::Record(shape) => {
                for (name, ty) in shape.fields {
                    fold_field(interner, aliases, gen, &mut fields, &mut subst, name, ty)?;
                }
            }
            TypeKey::Var(v) => {
                let fresh_row = gen.fresh();
                let open = interner.record(Vec::new(), Some(fresh_row));
                subst = Substitution::compose(interner, &Substitution::single(v, open), &subst);
            }
            _ => return Err(CompilerError::CannotSpreadNonRecord(spread)),
        }
    }

    for field in explicit {
        let ty = subst.apply(interner, field.ty);
        if let Some(slot) = fields.iter().position(|(name, _)| name.as_str() == field.name) {
            let existing = fields[slot].1;
            match unify(interner, aliases, gen, existing, ty) {
                Ok(next) => subst = Substitution::compose(interner, &next, &subst),
                Err(_) => {
                    return Err(CompilerError::RecordFieldConflict {
                        field: field.name.clone(),
                    })
                }
            }
            fields[slot].1 = ty;
        } else {
            fields.push((field.name.as_str().into(), ty));
        }
    }

    let fresh_row = gen.fresh();
    Ok((interner.record(fields, Some(fresh_row)), subst))
}

/// One spread's field folded into the accumulator (§4.8): a later spread's
/// record-typed field overrides an earlier one outright; anything else must
/// unify with what's already there.
fn fold_field(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    fields: &mut Vec<(Atom, TypeId)>,
    subst: &mut Substitution,
    name: Atom,
    ty: TypeId,
) -> Result<(), CompilerError> {
    let Some(slot) = fields.iter().position(|(n, _)| *n == name) else {
        fields.push((name, ty));
        return Ok(());
    };

    let is_record_valued = matches!(interner.lookup(ty), TypeKey::Record(_));
    if is_record_valued {
        fields[slot].1 = ty;
        return Ok(());
    }

    let existing = fields[slot].1;
    match unify(interner, aliases, gen, existing, ty) {
        Ok(next) => {
            *subst = Substitution::compose(interner, &next, subst);
            Ok(())
        }
        Err(err) => Err(CompilerError::Unification(err)),
    }
}
