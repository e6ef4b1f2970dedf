//! The constraint generator (§4.6): walks an AST expression under an
//! environment, producing a result type and a constraint set, or a
//! structured failure for the few errors that must surface immediately
//! rather than as a deferred constraint (`UndefinedVariable`).
//!
//! Generalization (§9 Open Question 2, resolved): a non-recursive `let`
//! nested inside a `Lambda` body keeps a monomorphic scheme for its bound
//! name, matching the spec's "monomorphic in the constraint phase" default.
//! A `let` that is *not* nested under a lambda — including the outermost
//! `let` of a whole program, per S3's `identity` — and an explicit `let rec`
//! both cross "the scheme-binding boundary": their value's constraints are
//! solved locally (via `crate::solver::solve`) right there, and the
//! resulting substituted type is generalized against the environment before
//! the bound name is extended for the continuation. This is the narrowest
//! reading of §4.6's "generalization happens at the scheme-binding boundary
//! if implemented" that still produces S3's `∀a. (a) -> a` for `identity`.

use crate::constraint::{CaseCover, Constraint, ConstraintSet, ExplicitField, TypeClass};
use crate::error::{CompilerError, TypeCheckFailure};
use crate::options::CheckerOptions;
use crate::solver::solve;
use mini_bendu_ast::{
    BinaryOperator, Expr, ExprKind, Pattern, PatternKind, RecordField, TypeExpr, TypeExprKind,
};
use mini_bendu_types::{
    AliasRegistry, Scheme, TypeEnvironment, TypeId, TypeInterner, TypeVarGenerator, TypeVarId,
};
use rustc_hash::FxHashMap;

/// One `infer` call's result: the expression's inferred type plus the
/// constraints emitted while inferring it.
pub type InferResult = Result<(TypeId, ConstraintSet), TypeCheckFailure>;

/// Converts a surface-syntax type annotation into an interned type (§6.1).
/// `Int`/`String`/`Bool`/`Unit` resolve to the primitives; any other
/// lowercase, argument-less name is a type variable (consistent within one
/// annotation via `scope`, so `(a) -> a` reuses one variable for both `a`s);
/// anything else is a reference into `aliases`.
pub fn type_expr_to_type(
    interner: &TypeInterner,
    scope: &mut FxHashMap<String, TypeVarId>,
    gen: &TypeVarGenerator,
    expr: &TypeExpr,
) -> TypeId {
    match &expr.kind {
        TypeExprKind::BaseType { name, args } => {
            if args.is_empty() {
                match name.as_str() {
                    "Int" => return TypeId::INT,
                    "String" => return TypeId::STRING,
                    "Bool" => return TypeId::BOOL,
                    "Unit" => return TypeId::UNIT,
                    _ => {}
                }
                if name.chars().next().is_some_and(char::is_lowercase) {
                    let var = *scope
                        .entry(name.clone())
                        .or_insert_with(|| gen.fresh());
                    return interner.var(var);
                }
            }
            let resolved_args = args
                .iter()
                .map(|a| type_expr_to_type(interner, scope, gen, a))
                .collect();
            interner.alias(name.as_str(), resolved_args)
        }
        TypeExprKind::FunctionType { from, to } => {
            let domain = type_expr_to_type(interner, scope, gen, from);
            let codomain = type_expr_to_type(interner, scope, gen, to);
            interner.function(domain, codomain)
        }
        TypeExprKind::RecordType { fields, extension } => {
            let resolved_fields = fields
                .iter()
                .map(|(name, t)| (name.as_str().into(), type_expr_to_type(interner, scope, gen, t)))
                .collect();
            let row = extension.as_ref().map(|name| {
                *scope.entry(name.clone()).or_insert_with(|| gen.fresh())
            });
            interner.record(resolved_fields, row)
        }
        TypeExprKind::UnionType { left, right } => {
            let l = type_expr_to_type(interner, scope, gen, left);
            let r = type_expr_to_type(interner, scope, gen, right);
            interner.union(vec![l, r])
        }
        TypeExprKind::IntersectionType { left, right } => {
            let l = type_expr_to_type(interner, scope, gen, left);
            let r = type_expr_to_type(interner, scope, gen, right);
            interner.intersection(vec![l, r])
        }
        TypeExprKind::TupleType(elems) => {
            let resolved = elems
                .iter()
                .map(|e| type_expr_to_type(interner, scope, gen, e))
                .collect();
            interner.tuple(resolved)
        }
        TypeExprKind::LiteralStringType(s) => interner.literal_string(s.as_str()),
    }
}

/// Infers `expr`'s type under `env`, per §4.6. `in_function` is true once
/// generation has descended into a `Lambda`'s body — it decides whether a
/// nested non-recursive `let` generalizes its binding.
pub fn infer(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    options: &CheckerOptions,
    env: &TypeEnvironment,
    expr: &Expr,
    in_function: bool,
) -> InferResult {
    let location = expr.location;
    match &expr.kind {
        ExprKind::IntLit(_) => Ok((TypeId::INT, ConstraintSet::new())),
        ExprKind::StringLit(_) => Ok((TypeId::STRING, ConstraintSet::new())),
        ExprKind::BoolLit(_) => Ok((TypeId::BOOL, ConstraintSet::new())),
        ExprKind::UnitLit => Ok((TypeId::UNIT, ConstraintSet::new())),

        ExprKind::Var(name) => {
            let Some(scheme) = env.lookup(name) else {
                return Err(TypeCheckFailure::new(CompilerError::UndefinedVariable(name.clone()), location));
            };
            let ty = scheme.instantiate(interner, gen);
            Ok((ty, ConstraintSet::new()))
        }

        ExprKind::Lambda { param, annotation, body } => {
            let param_ty = match annotation {
                Some(ann) => {
                    let mut scope = FxHashMap::default();
                    type_expr_to_type(interner, &mut scope, gen, ann)
                }
                None => interner.var(gen.fresh()),
            };
            let body_env = env.bind(param.as_str(), Scheme::monomorphic(param_ty));
            let (body_ty, body_constraints) = infer(interner, aliases, gen, options, &body_env, body, true)?;
            Ok((interner.function(param_ty, body_ty), body_constraints))
        }

        ExprKind::Application { func, args } => {
            let (func_ty, mut constraints) = infer(interner, aliases, gen, options, env, func, in_function)?;
            let mut arg_types = Vec::with_capacity(args.len());
            for arg in args {
                let (arg_ty, arg_constraints) = infer(interner, aliases, gen, options, env, arg, in_function)?;
                arg_types.push(arg_ty);
                constraints.extend(arg_constraints);
            }

            let result = interner.var(gen.fresh());
            let expected = if arg_types.is_empty() {
                interner.function(TypeId::UNIT, result)
            } else {
                let mut built = result;
                for &arg_ty in arg_types.iter().rev() {
                    built = interner.function(arg_ty, built);
                }
                built
            };
            constraints.equality(func_ty, expected, location);
            Ok((result, constraints))
        }

        ExprKind::If { condition, then_branch, else_branch } => {
            let (cond_ty, mut constraints) = infer(interner, aliases, gen, options, env, condition, in_function)?;
            let (then_ty, then_constraints) = infer(interner, aliases, gen, options, env, then_branch, in_function)?;
            let (else_ty, else_constraints) = infer(interner, aliases, gen, options, env, else_branch, in_function)?;
            constraints.extend(then_constraints);
            constraints.extend(else_constraints);
            constraints.equality(cond_ty, TypeId::BOOL, location);
            constraints.equality(then_ty, else_ty, location);
            Ok((then_ty, constraints))
        }

        ExprKind::BinaryOp { op, left, right } => {
            let (left_ty, mut constraints) = infer(interner, aliases, gen, options, env, left, in_function)?;
            let (right_ty, right_constraints) = infer(interner, aliases, gen, options, env, right, in_function)?;
            constraints.extend(right_constraints);
            Ok((infer_binary_op(interner, gen, options, &mut constraints, *op, left_ty, right_ty, location), constraints))
        }

        ExprKind::Let { name, recursive, annotation, value, body } => {
            infer_let(interner, aliases, gen, options, env, *recursive, name, annotation.as_ref(), value, body.as_deref(), in_function, location)
        }

        ExprKind::Record(fields) => {
            let mut constraints = ConstraintSet::new();
            let mut spreads = Vec::new();
            let mut explicit = Vec::new();
            for field in fields {
                match field {
                    RecordField::Field(f) => {
                        let (ty, field_constraints) = infer(interner, aliases, gen, options, env, &f.value, in_function)?;
                        constraints.extend(field_constraints);
                        explicit.push(ExplicitField { name: f.name.clone(), ty });
                    }
                    RecordField::Spread(s) => {
                        let (ty, spread_constraints) = infer(interner, aliases, gen, options, env, &s.value, in_function)?;
                        constraints.extend(spread_constraints);
                        constraints.push(Constraint::RecordType { ty, location });
                        spreads.push(ty);
                    }
                }
            }
            let result = interner.var(gen.fresh());
            constraints.push(Constraint::Merge { result, spreads, explicit, location });
            Ok((result, constraints))
        }

        ExprKind::Projection { target, field } => {
            let (target_ty, mut constraints) = infer(interner, aliases, gen, options, env, target, in_function)?;
            let field_ty = interner.var(gen.fresh());
            let row = gen.fresh();
            let expected = interner.record(vec![(field.as_str().into(), field_ty)], Some(row));
            constraints.equality(target_ty, expected, location);
            Ok((field_ty, constraints))
        }

        ExprKind::Tuple(elements) => {
            let mut constraints = ConstraintSet::new();
            let mut elem_types = Vec::with_capacity(elements.len());
            for e in elements {
                let (ty, elem_constraints) = infer(interner, aliases, gen, options, env, e, in_function)?;
                constraints.extend(elem_constraints);
                elem_types.push(ty);
            }
            let result = interner.var(gen.fresh());
            constraints.equality(result, interner.tuple(elem_types), location);
            Ok((result, constraints))
        }

        ExprKind::Match { scrutinee, cases } => {
            let (scrutinee_ty, mut constraints) = infer(interner, aliases, gen, options, env, scrutinee, in_function)?;

            let mut has_catch_all = false;
            let mut covered = Vec::new();
            let mut case_types = Vec::new();

            for case in cases {
                let (case_env, pattern_constraints, cover) =
                    infer_pattern(interner, gen, env, &case.pattern, scrutinee_ty);
                constraints.extend(pattern_constraints);
                match cover {
                    Some(c) => covered.push(c),
                    None => has_catch_all = true,
                }
                let (body_ty, body_constraints) = infer(interner, aliases, gen, options, &case_env, &case.body, in_function)?;
                constraints.extend(body_constraints);
                case_types.push(body_ty);
            }

            let result = case_types.first().copied().unwrap_or(TypeId::UNIT);
            for &ty in case_types.iter().skip(1) {
                constraints.equality(result, ty, location);
            }

            constraints.push(Constraint::Exhaustiveness {
                scrutinee: scrutinee_ty,
                covered,
                has_catch_all,
                location,
            });

            Ok((result, constraints))
        }
    }
}

fn infer_binary_op(
    interner: &TypeInterner,
    gen: &TypeVarGenerator,
    options: &CheckerOptions,
    constraints: &mut ConstraintSet,
    op: BinaryOperator,
    left_ty: TypeId,
    right_ty: TypeId,
    location: mini_bendu_common::SourceLocation,
) -> TypeId {
    if op.is_equality() {
        constraints.equality(left_ty, right_ty, location);
        return TypeId::BOOL;
    }
    if op.is_logical() {
        constraints.equality(left_ty, TypeId::BOOL, location);
        constraints.equality(right_ty, TypeId::BOOL, location);
        return TypeId::BOOL;
    }
    // Arithmetic.
    if op == BinaryOperator::Plus && options.addable_strings {
        let result = interner.var(gen.fresh());
        constraints.push(Constraint::Instance { ty: left_ty, class: TypeClass::AddableType, location });
        constraints.equality(left_ty, right_ty, location);
        constraints.equality(result, left_ty, location);
        return result;
    }
    constraints.equality(left_ty, TypeId::INT, location);
    constraints.equality(right_ty, TypeId::INT, location);
    TypeId::INT
}

#[allow(clippy::too_many_arguments)]
fn infer_let(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    options: &CheckerOptions,
    env: &TypeEnvironment,
    recursive: bool,
    name: &str,
    annotation: Option<&TypeExpr>,
    value: &Expr,
    body: Option<&Expr>,
    in_function: bool,
    location: mini_bendu_common::SourceLocation,
) -> InferResult {
    let (scheme, mut constraints) =
        bind_let(interner, aliases, gen, options, env, recursive, name, annotation, value, in_function, location)?;
    let body_env = env.bind(name, scheme.clone());

    match body {
        Some(body_expr) => {
            let (body_ty, body_constraints) = infer(interner, aliases, gen, options, &body_env, body_expr, in_function)?;
            constraints.extend(body_constraints);
            Ok((body_ty, constraints))
        }
        None => Ok((scheme.ty, constraints)),
    }
}

/// The shared core of `let` binding (§4.6, §9 Open Question 2): infers
/// `value`, folds in the recursive self-equality and annotation if present,
/// and either generalizes the result into a scheme (solving its constraints
/// locally) or leaves it monomorphic with its constraints deferred to the
/// caller. Used both by `infer`'s `Let` case (which also threads a `body`)
/// and directly by `type_check_program` for top-level declarations, which
/// have no AST `body` of their own — the continuation is the next
/// declaration in the program.
#[allow(clippy::too_many_arguments)]
pub(crate) fn bind_let(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    options: &CheckerOptions,
    env: &TypeEnvironment,
    recursive: bool,
    name: &str,
    annotation: Option<&TypeExpr>,
    value: &Expr,
    in_function: bool,
    location: mini_bendu_common::SourceLocation,
) -> Result<(Scheme, ConstraintSet), TypeCheckFailure> {
    let recursive_var = if recursive { Some(gen.fresh()) } else { None };

    let value_env = match recursive_var {
        Some(tau_r) => env.bind(name, Scheme::monomorphic(interner.var(tau_r))),
        None => env.clone(),
    };

    let (value_ty, mut value_constraints) = infer(interner, aliases, gen, options, &value_env, value, in_function)?;

    let bound_ty = match recursive_var {
        Some(tau_r) => {
            let tau_r_ty = interner.var(tau_r);
            value_constraints.equality(tau_r_ty, value_ty, location);
            tau_r_ty
        }
        None => value_ty,
    };

    if let Some(ann) = annotation {
        let mut scope = FxHashMap::default();
        let ann_ty = type_expr_to_type(interner, &mut scope, gen, ann);
        value_constraints.equality(bound_ty, ann_ty, location);
    }

    let generalizes = recursive || !in_function;
    if generalizes {
        let subst = solve(interner, aliases, gen, options, value_constraints)?;
        let resolved = subst.apply(interner, bound_ty);
        Ok((env.generalize(interner, resolved), ConstraintSet::new()))
    } else {
        Ok((Scheme::monomorphic(bound_ty), value_constraints))
    }
}

/// Pattern constraint generation against the target type `τ` (§4.9).
/// Returns the case's extended environment, the constraints generated, and
/// `Some(cover)` naming what this pattern contributes to the scrutinee's
/// enumerable cover — `None` means the pattern is a catch-all (`Wildcard`
/// or `Var`), which the caller treats as making the whole match exhaustive.
fn infer_pattern(
    interner: &TypeInterner,
    gen: &TypeVarGenerator,
    env: &TypeEnvironment,
    pattern: &Pattern,
    target: TypeId,
) -> (TypeEnvironment, ConstraintSet, Option<CaseCover>) {
    let location = pattern.location;
    let mut constraints = ConstraintSet::new();
    match &pattern.kind {
        PatternKind::Wildcard => (env.clone(), constraints, None),
        PatternKind::Var(name) => {
            let extended = env.bind(name.as_str(), Scheme::monomorphic(target));
            (extended, constraints, None)
        }
        PatternKind::LiteralInt(_) => {
            constraints.equality(target, TypeId::INT, location);
            (env.clone(), constraints, Some(CaseCover::Structural(target)))
        }
        PatternKind::LiteralBool(b) => {
            constraints.equality(target, TypeId::BOOL, location);
            (env.clone(), constraints, Some(CaseCover::Bool(*b)))
        }
        PatternKind::LiteralString(s) => {
            let literal_ty = interner.literal_string(s.as_str());
            constraints.push(Constraint::UnionCompatibility {
                scrutinee: target,
                pattern: literal_ty,
                location,
            });
            (env.clone(), constraints, Some(CaseCover::LiteralString(literal_ty)))
        }
        PatternKind::Tuple(patterns) => {
            let elem_types: Vec<TypeId> = patterns.iter().map(|_| interner.var(gen.fresh())).collect();
            constraints.equality(target, interner.tuple(elem_types.clone()), location);
            let mut extended = env.clone();
            for (sub_pattern, elem_ty) in patterns.iter().zip(elem_types.iter()) {
                let (next_env, sub_constraints, _) = infer_pattern(interner, gen, &extended, sub_pattern, *elem_ty);
                extended = next_env;
                constraints.extend(sub_constraints);
            }
            (extended, constraints, Some(CaseCover::Structural(target)))
        }
        PatternKind::Record(fields) => {
            let field_types: Vec<(mini_bendu_types::Atom, TypeId)> = fields
                .iter()
                .map(|f| (f.name.as_str().into(), interner.var(gen.fresh())))
                .collect();
            let row = gen.fresh();
            constraints.equality(target, interner.record(field_types.clone(), Some(row)), location);
            let mut extended = env.clone();
            for (field, (_, field_ty)) in fields.iter().zip(field_types.iter()) {
                let (next_env, sub_constraints, _) = infer_pattern(interner, gen, &extended, &field.pattern, *field_ty);
                extended = next_env;
                constraints.extend(sub_constraints);
            }
            (extended, constraints, Some(CaseCover::Structural(target)))
        }
    }
}
