//! The built-in battery of sample programs this binary type-checks. Parsing
//! is out of scope for the workspace, so each sample builds its `Expr` tree
//! directly rather than being read from a source file.

use mini_bendu_ast::{
    BinaryOperator, Expr, ExprKind, FieldExpr, MatchCase, Pattern, PatternKind, RecordField,
    SourceLocation, SpreadExpr, TypeExpr, TypeExprKind,
};

/// One named sample and the `Expr` it type-checks.
pub struct Sample {
    pub name: &'static str,
    pub source: &'static str,
    pub expr: Expr,
}

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

/// All ten golden scenarios, in order.
#[must_use]
pub fn all() -> Vec<Sample> {
    vec![
        Sample {
            name: "int-literal",
            source: "42",
            expr: expr(ExprKind::IntLit(42)),
        },
        Sample {
            name: "string-literal",
            source: r#""hello""#,
            expr: expr(ExprKind::StringLit("hello".to_string())),
        },
        Sample {
            name: "identity-application",
            source: "let identity = \\x => x in identity(42)",
            expr: expr(ExprKind::Let {
                name: "identity".to_string(),
                recursive: false,
                annotation: None,
                value: Box::new(expr(ExprKind::Lambda {
                    param: "x".to_string(),
                    annotation: None,
                    body: Box::new(var("x")),
                })),
                body: Some(Box::new(expr(ExprKind::Application {
                    func: Box::new(var("identity")),
                    args: vec![expr(ExprKind::IntLit(42))],
                }))),
            }),
        },
        Sample {
            name: "if-branches",
            source: "if True then 1 else 2",
            expr: expr(ExprKind::If {
                condition: Box::new(expr(ExprKind::BoolLit(true))),
                then_branch: Box::new(expr(ExprKind::IntLit(1))),
                else_branch: Box::new(expr(ExprKind::IntLit(2))),
            }),
        },
        Sample {
            name: "record-literal",
            source: r#"{ x = 1, y = "a" }"#,
            expr: expr(ExprKind::Record(vec![
                RecordField::Field(FieldExpr {
                    name: "x".to_string(),
                    value: expr(ExprKind::IntLit(1)),
                }),
                RecordField::Field(FieldExpr {
                    name: "y".to_string(),
                    value: expr(ExprKind::StringLit("a".to_string())),
                }),
            ])),
        },
        Sample {
            name: "record-merge",
            source: "{ ...({ x = 1 }), ...({ y = 2 }) }",
            expr: expr(ExprKind::Record(vec![
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
            ])),
        },
        Sample {
            name: "literal-string-union-match",
            source: r#"let value : "ok" | "err" = "ok" in match value with | "ok" => 1 | "err" => 0"#,
            expr: expr(ExprKind::Let {
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
            }),
        },
        Sample {
            name: "int-string-mismatch",
            source: r#"42 == "hello""#,
            expr: expr(ExprKind::BinaryOp {
                op: BinaryOperator::EqualEqual,
                left: Box::new(expr(ExprKind::IntLit(42))),
                right: Box::new(expr(ExprKind::StringLit("hello".to_string()))),
            }),
        },
        Sample {
            name: "recursive-loop",
            source: "let rec loop = \\x => loop(x) in loop(0)",
            expr: expr(ExprKind::Let {
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
            }),
        },
        Sample {
            name: "non-exhaustive-bool-match",
            source: "match b with | True => 1",
            expr: expr(ExprKind::Let {
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
            }),
        },
    ]
}
