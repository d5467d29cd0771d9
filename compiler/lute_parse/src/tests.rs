//! Parser tests driven by real source text.

#![expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]

use lute_ir::{BinaryOp, ExprKind, Module, StmtKind, StringInterner, UnaryOp};

use crate::{parse, ParseError};

fn parse_source(source: &str) -> (Module, StringInterner) {
    let interner = StringInterner::new();
    let tokens = lute_lexer::lex(source, &interner).unwrap();
    let module = parse(&tokens, &interner).unwrap();
    (module, interner)
}

fn parse_err(source: &str) -> ParseError {
    let interner = StringInterner::new();
    let tokens = lute_lexer::lex(source, &interner).unwrap();
    match parse(&tokens, &interner) {
        Ok(_) => panic!("expected parse error for {source:?}"),
        Err(e) => e,
    }
}

mod statements {
    use super::*;

    #[test]
    fn typed_declaration_with_init() {
        let (module, interner) = parse_source("int x = 1;");
        let top = module.stmt_list(module.top_level());
        assert_eq!(top.len(), 1);
        match module.stmt(top[0]).kind {
            StmtKind::Declare { name, init, .. } => {
                assert_eq!(interner.lookup(name), "x");
                assert!(init.is_some());
            }
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn bare_declaration_without_init() {
        let (module, _) = parse_source("float y;");
        let top = module.stmt_list(module.top_level());
        assert!(matches!(
            module.stmt(top[0]).kind,
            StmtKind::Declare { init: None, .. }
        ));
    }

    #[test]
    fn array_and_function_type_declarations() {
        let (module, _) = parse_source("int[] xs; function(int, int) -> int f;");
        let top = module.stmt_list(module.top_level());
        assert_eq!(top.len(), 2);
        assert!(matches!(module.stmt(top[0]).kind, StmtKind::Declare { .. }));
        assert!(matches!(module.stmt(top[1]).kind, StmtKind::Declare { .. }));
    }

    #[test]
    fn named_type_declaration_vs_expression() {
        // `Point p;` is a declaration; `point;` is an expression.
        let (module, _) = parse_source("Point p; point;");
        let top = module.stmt_list(module.top_level());
        assert!(matches!(module.stmt(top[0]).kind, StmtKind::Declare { .. }));
        assert!(matches!(module.stmt(top[1]).kind, StmtKind::Expr(_)));
    }

    #[test]
    fn assignment_targets() {
        let (module, _) = parse_source("x = 1; a[0] = 2; p.x = 3;");
        let top = module.stmt_list(module.top_level());
        for &stmt in top {
            assert!(matches!(module.stmt(stmt).kind, StmtKind::Assign { .. }));
        }
    }

    #[test]
    fn invalid_assignment_target_is_rejected() {
        let err = parse_err("1 + 2 = 3;");
        assert!(err.message.contains("assignment target"));
    }

    #[test]
    fn else_if_chain_nests() {
        let (module, _) = parse_source(
            "if (a) { print(1); } else if (b) { print(2); } else { print(3); }",
        );
        let top = module.stmt_list(module.top_level());
        let StmtKind::If { else_body, .. } = module.stmt(top[0]).kind else {
            panic!("expected if");
        };
        let else_body = else_body.unwrap();
        let nested = module.stmt_list(else_body);
        assert_eq!(nested.len(), 1);
        assert!(matches!(module.stmt(nested[0]).kind, StmtKind::If { .. }));
    }

    #[test]
    fn function_declaration_shape() {
        let (module, interner) =
            parse_source("function add(int x, int y) -> int { return x + y; }");
        let top = module.stmt_list(module.top_level());
        let StmtKind::Function { name, params, body, .. } = module.stmt(top[0]).kind else {
            panic!("expected function declaration");
        };
        assert_eq!(interner.lookup(name), "add");
        assert_eq!(module.param_list(params).len(), 2);
        assert_eq!(module.stmt_list(body).len(), 1);
    }

    #[test]
    fn struct_declaration_shape() {
        let (module, interner) = parse_source("struct Point { int x; int y; }");
        let top = module.stmt_list(module.top_level());
        let StmtKind::StructDecl { name, fields } = module.stmt(top[0]).kind else {
            panic!("expected struct declaration");
        };
        assert_eq!(interner.lookup(name), "Point");
        assert_eq!(module.field_def_list(fields).len(), 2);
    }
}

mod desugaring {
    use super::*;

    #[test]
    fn subtraction_becomes_add_of_negation() {
        let (module, _) = parse_source("a - b;");
        let top = module.stmt_list(module.top_level());
        let StmtKind::Expr(expr) = module.stmt(top[0]).kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { op, right, .. } = module.expr(expr).kind else {
            panic!("expected binary node");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(
            module.expr(right).kind,
            ExprKind::Unary {
                op: UnaryOp::Neg,
                ..
            }
        ));
    }

    #[test]
    fn not_equal_becomes_not_of_equal() {
        let (module, _) = parse_source("a != b;");
        let top = module.stmt_list(module.top_level());
        let StmtKind::Expr(expr) = module.stmt(top[0]).kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Unary {
            op: UnaryOp::Not,
            operand,
        } = module.expr(expr).kind
        else {
            panic!("expected not node");
        };
        assert!(matches!(
            module.expr(operand).kind,
            ExprKind::Binary {
                op: BinaryOp::Eq,
                ..
            }
        ));
    }

    #[test]
    fn no_sub_or_noteq_survives_parsing() {
        let (module, _) = parse_source("a - b != c - 1;");
        for idx in 0..module.expr_count() {
            let expr = module.expr(lute_ir::ExprId::new(u32::try_from(idx).unwrap()));
            if let ExprKind::Binary { op, .. } = expr.kind {
                assert_ne!(op, BinaryOp::Sub);
                assert_ne!(op, BinaryOp::NotEq);
            }
        }
    }
}

mod expressions {
    use super::*;

    #[test]
    fn precedence_mul_binds_tighter_than_add() {
        let (module, _) = parse_source("1 + 2 * 3;");
        let top = module.stmt_list(module.top_level());
        let StmtKind::Expr(expr) = module.stmt(top[0]).kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { op, right, .. } = module.expr(expr).kind else {
            panic!("expected binary node");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(
            module.expr(right).kind,
            ExprKind::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn grouping_is_transparent_tuple_is_not() {
        let (module, _) = parse_source("(1); (1, 2);");
        let top = module.stmt_list(module.top_level());
        let StmtKind::Expr(grouped) = module.stmt(top[0]).kind else {
            panic!("expected expression statement");
        };
        assert!(matches!(module.expr(grouped).kind, ExprKind::Int(1)));
        let StmtKind::Expr(tuple) = module.stmt(top[1]).kind else {
            panic!("expected expression statement");
        };
        assert!(matches!(module.expr(tuple).kind, ExprKind::TupleLit(_)));
    }

    #[test]
    fn array_literal_and_range() {
        let (module, _) = parse_source("[1, 2, 3]; [0..10]; [];");
        let top = module.stmt_list(module.top_level());
        let kinds: Vec<_> = top
            .iter()
            .map(|&s| match module.stmt(s).kind {
                StmtKind::Expr(e) => module.expr(e).kind,
                other => panic!("expected expression statement, got {other:?}"),
            })
            .collect();
        assert!(matches!(kinds[0], ExprKind::ArrayLit(r) if r.len() == 3));
        assert!(matches!(kinds[1], ExprKind::Range { .. }));
        assert!(matches!(kinds[2], ExprKind::ArrayLit(r) if r.is_empty()));
    }

    #[test]
    fn calls_chain_and_curry() {
        let (module, _) = parse_source("f(1)(2);");
        let top = module.stmt_list(module.top_level());
        let StmtKind::Expr(outer) = module.stmt(top[0]).kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Call { callee, .. } = module.expr(outer).kind else {
            panic!("expected call");
        };
        assert!(matches!(module.expr(callee).kind, ExprKind::Call { .. }));
    }

    #[test]
    fn struct_literal_parses_fields() {
        let (module, _) = parse_source("Point { x: 1, y: 2 };");
        let top = module.stmt_list(module.top_level());
        let StmtKind::Expr(expr) = module.stmt(top[0]).kind else {
            panic!("expected expression statement");
        };
        let ExprKind::StructLit { fields, .. } = module.expr(expr).kind else {
            panic!("expected struct literal");
        };
        assert_eq!(module.field_init_list(fields).len(), 2);
    }

    #[test]
    fn short_circuit_operators_parse() {
        let (module, _) = parse_source("a && b || c;");
        let top = module.stmt_list(module.top_level());
        let StmtKind::Expr(expr) = module.stmt(top[0]).kind else {
            panic!("expected expression statement");
        };
        // `||` is loosest, so it is the root.
        assert!(matches!(
            module.expr(expr).kind,
            ExprKind::Binary {
                op: BinaryOp::Or,
                ..
            }
        ));
    }
}
