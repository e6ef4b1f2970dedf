//! The type-checking core: constraint generation (§4.6), solving (§4.7),
//! record merging (§4.8), exhaustiveness (§4.9), and the public entry points
//! a driver calls into (§6.2).
//!
//! Nothing in this crate parses source text — callers hand it an
//! already-built `mini_bendu_ast::Expr` (or `Program`) together with the
//! shared `TypeInterner`/`AliasRegistry`/`TypeVarGenerator` for the
//! compilation unit it belongs to.

pub mod constraint;
pub mod error;
pub mod exhaustiveness;
pub mod generator;
pub mod merge;
pub mod options;
pub mod solver;
pub mod unify;

pub use constraint::{CaseCover, Constraint, ConstraintSet, ExplicitField, TypeClass};
pub use error::{CompilerError, TypeCheckFailure, UnificationError};
pub use options::CheckerOptions;

use generator::{bind_let, infer};
use mini_bendu_ast::{Expr, ExprKind, Program};
use mini_bendu_types::{AliasRegistry, Scheme, TypeEnvironment, TypeId, TypeInterner, TypeVarGenerator};
use solver::solve;

/// The result of successfully checking one expression (§6.2): its final
/// type, with the solver's substitution already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCheckSuccess {
    pub ty: TypeId,
}

/// Type-checks a single expression under `env` (§6.2 `type_check`):
/// generates its constraints, solves them, and returns the
/// substitution-applied result type.
#[tracing::instrument(level = "debug", skip_all)]
pub fn type_check(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    options: &CheckerOptions,
    env: &TypeEnvironment,
    expr: &Expr,
) -> Result<TypeCheckSuccess, TypeCheckFailure> {
    let (ty, constraints) = infer(interner, aliases, gen, options, env, expr, false)?;
    tracing::debug!(constraint_count = constraints.len(), "constraints generated");
    let subst = solve(interner, aliases, gen, options, constraints)?;
    Ok(TypeCheckSuccess {
        ty: subst.apply(interner, ty),
    })
}

/// The outcome of type-checking a whole program (§6.2 `type_check_program`):
/// one result per declaration, in order. The default short-circuit policy
/// applies — a failing declaration stops the walk, so `results` never holds
/// more than one `Err`, and it is always the last entry.
#[derive(Debug, Default)]
pub struct ProgramResult {
    pub results: Vec<Result<TypeCheckSuccess, TypeCheckFailure>>,
}

impl ProgramResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.results.iter().all(Result::is_ok)
    }
}

/// Type-checks every declaration in `program` in order, threading a single
/// growing environment: each top-level, body-less `let` persists its
/// generalized scheme for the declarations that follow it (§6.2). A
/// declaration that redefines an already-bound top-level name fails with
/// `IdentifierRedefinition` rather than shadowing it, since a program's
/// declarations are one flat scope, not nested lexical scopes.
#[tracing::instrument(level = "debug", skip_all, fields(declarations = program.declarations.len()))]
pub fn type_check_program(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    options: &CheckerOptions,
    program: &Program,
) -> ProgramResult {
    let mut env = TypeEnvironment::empty();
    let mut result = ProgramResult::default();

    for (index, decl) in program.declarations.iter().enumerate() {
        match check_declaration(interner, aliases, gen, options, &env, decl) {
            Ok((success, new_env)) => {
                env = new_env;
                result.results.push(Ok(success));
            }
            Err(failure) => {
                tracing::debug!(declaration = index, "declaration failed, short-circuiting program");
                result.results.push(Err(failure));
                break;
            }
        }
    }

    result
}

/// Checks one program declaration, returning the environment the next
/// declaration should see. A body-less top-level `let` binds its name into
/// that environment; anything else (a bare expression, or a `let ... in`
/// that is itself a whole declaration) leaves the environment untouched.
fn check_declaration(
    interner: &TypeInterner,
    aliases: &AliasRegistry,
    gen: &TypeVarGenerator,
    options: &CheckerOptions,
    env: &TypeEnvironment,
    decl: &Expr,
) -> Result<(TypeCheckSuccess, TypeEnvironment), TypeCheckFailure> {
    if let ExprKind::Let {
        name,
        recursive,
        annotation,
        value,
        body: None,
    } = &decl.kind
    {
        if env.lookup(name).is_some() {
            return Err(TypeCheckFailure::new(
                CompilerError::IdentifierRedefinition(name.clone()),
                decl.location,
            ));
        }
        let (scheme, _leftover): (Scheme, _) = bind_let(
            interner,
            aliases,
            gen,
            options,
            env,
            *recursive,
            name,
            annotation.as_ref(),
            value,
            false,
            decl.location,
        )?;
        let extended = env.bind(name, scheme.clone());
        return Ok((TypeCheckSuccess { ty: scheme.ty }, extended));
    }

    let success = type_check(interner, aliases, gen, options, env, decl)?;
    Ok((success, env.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mini_bendu_ast::{BinaryOperator, SourceLocation};

    fn setup() -> (TypeInterner, AliasRegistry, TypeVarGenerator, CheckerOptions) {
        (TypeInterner::new(), AliasRegistry::new(), TypeVarGenerator::new(), CheckerOptions::default())
    }

    fn synth(kind: ExprKind) -> Expr {
        Expr {
            kind,
            location: SourceLocation::synthetic(),
        }
    }

    #[test]
    fn type_checks_a_literal_expression() {
        let (interner, aliases, gen, options) = setup();
        let env = TypeEnvironment::empty();
        let expr = synth(ExprKind::IntLit(1));

        let success = type_check(&interner, &aliases, &gen, &options, &env, &expr).unwrap();
        assert_eq!(success.ty, TypeId::INT);
    }

    #[test]
    fn undefined_variable_surfaces_immediately() {
        let (interner, aliases, gen, options) = setup();
        let env = TypeEnvironment::empty();
        let expr = synth(ExprKind::Var("missing".to_string()));

        let err = type_check(&interner, &aliases, &gen, &options, &env, &expr).unwrap_err();
        assert!(matches!(err.error, CompilerError::UndefinedVariable(name) if name == "missing"));
    }

    #[test]
    fn program_threads_a_top_level_binding_into_later_declarations() {
        let (interner, aliases, gen, options) = setup();

        let identity = synth(ExprKind::Lambda {
            param: "x".to_string(),
            annotation: None,
            body: Box::new(synth(ExprKind::Var("x".to_string()))),
        });
        let binding = synth(ExprKind::Let {
            name: "identity".to_string(),
            recursive: false,
            annotation: None,
            value: Box::new(identity),
            body: None,
        });
        let usage = synth(ExprKind::Application {
            func: Box::new(synth(ExprKind::Var("identity".to_string()))),
            args: vec![synth(ExprKind::IntLit(1))],
        });
        let program = Program::new(vec![binding, usage]);

        let result = type_check_program(&interner, &aliases, &gen, &options, &program);
        assert!(result.is_ok());
        assert_eq!(result.results[1].as_ref().unwrap().ty, TypeId::INT);
    }

    #[test]
    fn redefining_a_top_level_name_fails() {
        let (interner, aliases, gen, options) = setup();

        let first = synth(ExprKind::Let {
            name: "x".to_string(),
            recursive: false,
            annotation: None,
            value: Box::new(synth(ExprKind::IntLit(1))),
            body: None,
        });
        let second = synth(ExprKind::Let {
            name: "x".to_string(),
            recursive: false,
            annotation: None,
            value: Box::new(synth(ExprKind::IntLit(2))),
            body: None,
        });
        let program = Program::new(vec![first, second]);

        let result = type_check_program(&interner, &aliases, &gen, &options, &program);
        assert!(!result.is_ok());
        assert!(matches!(
            result.results.last().unwrap().as_ref().unwrap_err().error,
            CompilerError::IdentifierRedefinition(_)
        ));
    }

    #[test]
    fn a_failing_declaration_short_circuits_the_program() {
        let (interner, aliases, gen, options) = setup();

        let bad = synth(ExprKind::BinaryOp {
            op: BinaryOperator::And,
            left: Box::new(synth(ExprKind::IntLit(1))),
            right: Box::new(synth(ExprKind::BoolLit(true))),
        });
        let never_reached = synth(ExprKind::IntLit(1));
        let program = Program::new(vec![bad, never_reached]);

        let result = type_check_program(&interner, &aliases, &gen, &options, &program);
        assert_eq!(result.results.len(), 1);
        assert!(result.results[0].is_err());
    }
}
