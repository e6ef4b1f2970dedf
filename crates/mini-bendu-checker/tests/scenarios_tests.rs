//! Golden scenario tests: the ten worked examples a type checker for this
//! language is expected to get right, covering literals, let-polymorphism,
//! records, row-polymorphic merges, discriminated matches, a type mismatch,
//! a recursive binding, and non-exhaustive matching.

use mini_bendu_ast::{
    BinaryOperator, Expr, ExprKind, FieldExpr, MatchCase, Pattern, PatternKind, Program,
    RecordField, SourceLocation, SpreadExpr, TypeExpr, TypeExprKind,
};
use mini_bendu_checker::{CompilerError, TypeCheckFailure, UnificationError};
use mini_bendu_types::{display_type, AliasRegistry, Namer, TypeEnvironment, TypeId, TypeInterner, TypeVarGenerator};

fn here() -> SourceLocation {
    SourceLocation::synthetic()
}

fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, here())
}

fn pattern(kind: PatternKind) -> Pattern {
    Pattern::new(kind, here())
}

fn type_expr(kind: TypeExprKind) -> TypeExpr {
    TypeExpr::new(kind, here())
}

fn var(name: &str) -> Expr {
    expr(ExprKind::Var(name.to_string()))
}

struct Checker {
    interner: TypeInterner,
    aliases: AliasRegistry,
    gen: TypeVarGenerator,
    options: mini_bendu_checker::CheckerOptions,
}

impl Checker {
    fn new() -> Self {
        Self {
            interner: TypeInterner::new(),
            aliases: AliasRegistry::new(),
            gen: TypeVarGenerator::new(),
            options: mini_bendu_checker::CheckerOptions::default(),
        }
    }

    fn check(&self, expr: &Expr) -> Result<mini_bendu_checker::TypeCheckSuccess, TypeCheckFailure> {
        mini_bendu_checker::type_check(&self.interner, &self.aliases, &self.gen, &self.options, &TypeEnvironment::empty(), expr)
    }

    fn render(&self, ty: TypeId) -> String {
        display_type(&self.interner, &Namer::new(), ty)
    }
}

/// S1: `42` checks as `Int`.
#[test]
fn int_literal_is_int() {
    let checker = Checker::new();
    let result = checker.check(&expr(ExprKind::IntLit(42))).unwrap();
    assert_eq!(result.ty, TypeId::INT);
}

/// S2: `"hello"` checks as `String` outside an annotation context.
#[test]
fn string_literal_is_string() {
    let checker = Checker::new();
    let result = checker.check(&expr(ExprKind::StringLit("hello".to_string()))).unwrap();
    assert_eq!(result.ty, TypeId::STRING);
}

/// S3: `let identity = \x => x in identity(42)` checks as `Int`, and
/// `identity` alone (bound at the top level, so it generalizes) has scheme
/// `[a] (a) -> a`.
#[test]
fn identity_let_polymorphism() {
    let checker = Checker::new();

    let identity = expr(ExprKind::Lambda {
        param: "x".to_string(),
        annotation: None,
        body: Box::new(var("x")),
    });
    let applied = expr(ExprKind::Let {
        name: "identity".to_string(),
        recursive: false,
        annotation: None,
        value: Box::new(identity.clone()),
        body: Some(Box::new(expr(ExprKind::Application {
            func: Box::new(var("identity")),
            args: vec![expr(ExprKind::IntLit(42))],
        }))),
    });
    let result = checker.check(&applied).unwrap();
    assert_eq!(result.ty, TypeId::INT);

    let program = Program::new(vec![expr(ExprKind::Let {
        name: "identity".to_string(),
        recursive: false,
        annotation: None,
        value: Box::new(identity),
        body: None,
    })]);
    let program_result = mini_bendu_checker::type_check_program(&checker.interner, &checker.aliases, &checker.gen, &checker.options, &program);
    assert!(program_result.is_ok());
    let scheme_ty = program_result.results[0].as_ref().unwrap().ty;
    assert_eq!(checker.render(scheme_ty), "(a) -> a");
}

/// S4: `if True then 1 else 2` checks as `Int`.
#[test]
fn if_branches_unify_to_int() {
    let checker = Checker::new();
    let if_expr = expr(ExprKind::If {
        condition: Box::new(expr(ExprKind::BoolLit(true))),
        then_branch: Box::new(expr(ExprKind::IntLit(1))),
        else_branch: Box::new(expr(ExprKind::IntLit(2))),
    });
    let result = checker.check(&if_expr).unwrap();
    assert_eq!(result.ty, TypeId::INT);
}

/// S5: `{ x = 1, y = "a" }` checks as `{x: Int, y: String}`.
#[test]
fn record_literal_infers_closed_fields() {
    let checker = Checker::new();
    let record = expr(ExprKind::Record(vec![
        RecordField::Field(FieldExpr {
            name: "x".to_string(),
            value: expr(ExprKind::IntLit(1)),
        }),
        RecordField::Field(FieldExpr {
            name: "y".to_string(),
            value: expr(ExprKind::StringLit("a".to_string())),
        }),
    ]));
    let result = checker.check(&record).unwrap();
    assert_eq!(checker.render(result.ty), "{x: Int, y: String}");
}

/// S6: `{ ...({ x = 1 }), ...({ y = 2 }) }` checks as `{x: Int, y: Int, ...r}`
/// — merging two closed records leaves the result open (§4.8).
#[test]
fn record_merge_of_two_spreads_is_open() {
    let checker = Checker::new();
    let merged = expr(ExprKind::Record(vec![
        RecordField::Spread(SpreadExpr {
            value: expr(ExprKind::Record(vec![RecordField::Field(FieldExpr {
                name: "x".to_string(),
                value: expr(ExprKind::IntLit(1)),
            })])),
        }),
        RecordField::Spread(SpreadExpr {
            value: expr(ExprKind::Record(vec![RecordField::Field(FieldExpr {
                name: "y".to_string(),
                value: expr(ExprKind::IntLit(2)),
            })])),
        }),
    ]));
    let result = checker.check(&merged).unwrap();
    assert_eq!(checker.render(result.ty), "{x: Int, y: Int, ...a}");
}

/// S7: matching a `"ok" | "err"`-typed scrutinee over both literal cases
/// checks as `Int` and is exhaustive.
#[test]
fn literal_string_union_match_is_exhaustive() {
    let checker = Checker::new();
    let let_and_match = expr(ExprKind::Let {
        name: "value".to_string(),
        recursive: false,
        annotation: Some(type_expr(TypeExprKind::UnionType {
            left: Box::new(type_expr(TypeExprKind::LiteralStringType("ok".to_string()))),
            right: Box::new(type_expr(TypeExprKind::LiteralStringType("err".to_string()))),
        })),
        value: Box::new(expr(ExprKind::StringLit("ok".to_string()))),
        body: Some(Box::new(expr(ExprKind::Match {
            scrutinee: Box::new(var("value")),
            cases: vec![
                MatchCase {
                    pattern: pattern(PatternKind::LiteralString("ok".to_string())),
                    body: expr(ExprKind::IntLit(1)),
                },
                MatchCase {
                    pattern: pattern(PatternKind::LiteralString("err".to_string())),
                    body: expr(ExprKind::IntLit(0)),
                },
            ],
        }))),
    });
    let result = checker.check(&let_and_match).unwrap();
    assert_eq!(result.ty, TypeId::INT);
}

/// S8: `42 == "hello"` fails with a type mismatch between `Int` and `String`.
#[test]
fn equality_of_int_and_string_is_a_type_mismatch() {
    let checker = Checker::new();
    let mismatch = expr(ExprKind::BinaryOp {
        op: BinaryOperator::EqualEqual,
        left: Box::new(expr(ExprKind::IntLit(42))),
        right: Box::new(expr(ExprKind::StringLit("hello".to_string()))),
    });
    let failure = checker.check(&mismatch).unwrap_err();
    assert!(matches!(
        failure.error,
        CompilerError::Unification(UnificationError::TypeMismatch { expected, found })
            if (expected, found) == (TypeId::INT, TypeId::STRING) || (expected, found) == (TypeId::STRING, TypeId::INT)
    ));
}

/// S9: `let rec loop = \x => loop(x) in loop(0)` checks successfully,
/// producing a fresh, unconstrained result type.
#[test]
fn recursive_loop_checks_with_a_fresh_result_type() {
    let checker = Checker::new();
    let loop_binding = expr(ExprKind::Let {
        name: "loop".to_string(),
        recursive: true,
        annotation: None,
        value: Box::new(expr(ExprKind::Lambda {
            param: "x".to_string(),
            annotation: None,
            body: Box::new(expr(ExprKind::Application {
                func: Box::new(var("loop")),
                args: vec![var("x")],
            })),
        })),
        body: Some(Box::new(expr(ExprKind::Application {
            func: Box::new(var("loop")),
            args: vec![expr(ExprKind::IntLit(0))],
        }))),
    });
    let result = checker.check(&loop_binding).unwrap();
    // A bare letter name confirms it's an unconstrained type variable, not
    // some concrete primitive the solver shouldn't have been able to pin.
    assert_eq!(checker.render(result.ty), "a");
}

/// S10: matching only `True` on a `Bool`-typed scrutinee is non-exhaustive,
/// naming `False` as the missing alternative.
#[test]
fn non_exhaustive_bool_match_names_the_missing_case() {
    let checker = Checker::new();
    let partial_match = expr(ExprKind::Let {
        name: "b".to_string(),
        recursive: false,
        annotation: Some(type_expr(TypeExprKind::BaseType {
            name: "Bool".to_string(),
            args: Vec::new(),
        })),
        value: Box::new(expr(ExprKind::BoolLit(true))),
        body: Some(Box::new(expr(ExprKind::Match {
            scrutinee: Box::new(var("b")),
            cases: vec![MatchCase {
                pattern: pattern(PatternKind::LiteralBool(true)),
                body: expr(ExprKind::IntLit(1)),
            }],
        }))),
    });
    let failure = checker.check(&partial_match).unwrap_err();
    assert!(matches!(
        failure.error,
        CompilerError::NonExhaustivePatternMatch { ref missing } if missing == &vec!["False".to_string()]
    ));
}
