use crate::ast::*;
use crate::parse_source;

fn single(source: &str) -> Expr {
    let mut program = parse_source(source).unwrap();
    assert_eq!(program.statements.len(), 1, "expected one statement in {:?}", source);
    program.statements.remove(0)
}

#[test]
fn test_parse_empty_program() {
    assert!(parse_source("").unwrap().statements.is_empty());
    assert!(parse_source(" ;\n; ").unwrap().statements.is_empty());
}

#[test]
fn test_parse_left_assignment() {
    match single("i <- i + 1") {
        Expr::Assign(name, value, _) => {
            assert_eq!(name, "i");
            assert!(matches!(*value, Expr::BinOp(_, BinOp::Add, _, _)));
        }
        other => panic!("Expected assignment, got {:?}", other),
    }
}

#[test]
fn test_parse_right_assignment() {
    match single("1 + 2 -> total") {
        Expr::Assign(name, value, _) => {
            assert_eq!(name, "total");
            assert!(matches!(*value, Expr::BinOp(_, BinOp::Add, _, _)));
        }
        other => panic!("Expected assignment, got {:?}", other),
    }
}

#[test]
fn test_parse_super_assignment() {
    match single("total <<- total + 1") {
        Expr::Assign(name, value, _) => {
            assert_eq!(name, "total");
            assert!(matches!(*value, Expr::BinOp(_, BinOp::Add, _, _)));
        }
        other => panic!("Expected assignment, got {:?}", other),
    }
}

#[test]
fn test_parse_assignment_is_right_associative() {
    match single("a <- b <- 3") {
        Expr::Assign(name, value, _) => {
            assert_eq!(name, "a");
            assert!(matches!(*value, Expr::Assign(ref inner, _, _) if inner == "b"));
        }
        other => panic!("Expected assignment, got {:?}", other),
    }
}

#[test]
fn test_parse_invalid_assignment_target() {
    let err = parse_source("1 <- 2").unwrap_err();
    assert!(matches!(err, crate::ExprError::ParserError { .. }));
}

#[test]
fn test_parse_named_arguments() {
    match single("paste('a', 'b', sep = '-')") {
        Expr::Call(name, args, _) => {
            assert_eq!(name, "paste");
            assert_eq!(args.len(), 3);
            assert_eq!(args[0].name, None);
            assert_eq!(args[2].name.as_deref(), Some("sep"));
        }
        other => panic!("Expected call, got {:?}", other),
    }
}

#[test]
fn test_parse_power_binds_tighter_than_unary_minus() {
    match single("-2^2") {
        Expr::UnOp(UnOp::Neg, operand, _) => {
            assert!(matches!(*operand, Expr::BinOp(_, BinOp::Pow, _, _)));
        }
        other => panic!("Expected negation, got {:?}", other),
    }
}

#[test]
fn test_parse_range_binds_tighter_than_arithmetic() {
    match single("1:n - 1") {
        Expr::BinOp(lhs, BinOp::Sub, _, _) => {
            assert!(matches!(*lhs, Expr::BinOp(_, BinOp::Range, _, _)));
        }
        other => panic!("Expected subtraction, got {:?}", other),
    }
}

#[test]
fn test_parse_index() {
    match single("x[2]") {
        Expr::Index(target, index, _) => {
            assert!(matches!(*target, Expr::Var(ref name, _) if name == "x"));
            assert!(matches!(*index, Expr::Literal(Literal::Number(n), _) if n == 2.0));
        }
        other => panic!("Expected index, got {:?}", other),
    }
}

#[test]
fn test_parse_if_else_across_lines() {
    match single("if (x > 1) {\n  'big'\n} else {\n  'small'\n}") {
        Expr::If(_, then_branch, else_branch, _) => {
            assert!(matches!(*then_branch, Expr::Block(ref body, _) if body.len() == 1));
            assert!(else_branch.is_some());
        }
        other => panic!("Expected if, got {:?}", other),
    }
}

#[test]
fn test_parse_block_statements() {
    match single("{ a <- 1\n b <- 2; a + b }") {
        Expr::Block(body, _) => assert_eq!(body.len(), 3),
        other => panic!("Expected block, got {:?}", other),
    }
}

#[test]
fn test_parse_call_span_covers_arguments() {
    let expr = single("f(1, 2)");
    assert_eq!(expr.span(), crate::Span::new(0, 7));
}

#[test]
fn test_parse_unclosed_paren() {
    let err = parse_source("(1 + 2").unwrap_err();
    assert!(matches!(err, crate::ExprError::ParserError { .. }));
}

#[test]
fn test_parse_trailing_garbage() {
    assert!(parse_source("1 2").is_err());
}

#[test]
fn test_parse_only_named_functions_callable() {
    assert!(parse_source("x[1](2)").is_err());
}
