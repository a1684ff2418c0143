use crate::*;

fn run(source: &str) -> Evaluation {
    let mut scope = Scope::new(Environment::new());
    evaluate(source, &mut scope).unwrap()
}

fn lines(source: &str) -> Vec<String> {
    run(source).lines()
}

#[test]
fn test_counter_across_calls_shares_scope() {
    let mut scope = Scope::new(Environment::new().with("i", 0.0));
    let interpreter = Interpreter::new();
    let first = interpreter.eval_source("i <- i + 1; i", &mut scope).unwrap();
    let second = interpreter.eval_source("i <- i + 1; i", &mut scope).unwrap();
    assert_eq!(first.lines(), vec!["1"]);
    assert_eq!(second.lines(), vec!["2"]);
    assert_eq!(scope.explicit().get("i"), Some(&Value::number(2.0)));
}

#[test]
fn test_assignment_does_not_touch_ambient() {
    let ambient = Environment::new().with("x", "outer");
    let mut scope = Scope::with_ambient(Environment::new(), &ambient);
    assert_eq!(evaluate("x", &mut scope).unwrap().lines(), vec!["outer"]);

    evaluate("x <- 'inner'", &mut scope).unwrap();
    assert_eq!(evaluate("x", &mut scope).unwrap().lines(), vec!["inner"]);
    assert_eq!(ambient.get("x"), Some(&Value::text("outer")));
}

#[test]
fn test_vector_renders_one_line_per_element() {
    assert_eq!(lines("1:3"), vec!["1", "2", "3"]);
    assert_eq!(lines("c('a', 'b')"), vec!["a", "b"]);
}

#[test]
fn test_null_and_empty_render_nothing() {
    assert!(lines("NULL").is_empty());
    assert!(lines("c()").is_empty());
}

#[test]
fn test_arithmetic_recycles() {
    assert_eq!(
        run("c(1, 2, 3, 4) * c(10, 100)").value,
        Value::Number(vec![10.0, 200.0, 30.0, 400.0])
    );
    assert_eq!(run("1:3 + 1").value, Value::Number(vec![2.0, 3.0, 4.0]));
}

#[test]
fn test_division_and_non_integers() {
    assert_eq!(lines("1 / 4"), vec!["0.25"]);
    assert_eq!(lines("1 / 3"), vec!["0.333333333333333"]);
    assert_eq!(lines("1 / 0"), vec!["Inf"]);
    assert_eq!(lines("10 / 2"), vec!["5"]);
}

#[test]
fn test_logical_values_render_upper_case() {
    assert_eq!(lines("1 < 2"), vec!["TRUE"]);
    assert_eq!(lines("c(1, 5) > 3"), vec!["FALSE", "TRUE"]);
    assert_eq!(lines("!TRUE"), vec!["FALSE"]);
}

#[test]
fn test_logical_arithmetic_coerces() {
    assert_eq!(run("TRUE + TRUE").value, Value::number(2.0));
}

#[test]
fn test_text_comparison() {
    assert_eq!(run("'abc' == 'abc'").value, Value::logical(true));
    assert_eq!(run("'a' < 'b'").value, Value::logical(true));
}

#[test]
fn test_short_circuit_skips_right_side() {
    // `undefined` would fail if evaluated
    assert_eq!(run("FALSE && undefined").value, Value::logical(false));
    assert_eq!(run("TRUE || undefined").value, Value::logical(true));
}

#[test]
fn test_if_else() {
    assert_eq!(lines("x <- 5; if (x > 3) 'big' else 'small'"), vec!["big"]);
    assert_eq!(lines("x <- 1; if (x > 3) 'big' else 'small'"), vec!["small"]);
    assert!(lines("if (FALSE) 'never'").is_empty());
}

#[test]
fn test_block_value_is_last_statement() {
    assert_eq!(lines("{ a <- 2; b <- 3; a * b }"), vec!["6"]);
}

#[test]
fn test_indexing() {
    assert_eq!(run("x <- c(10, 20, 30); x[2]").value, Value::number(20.0));
    assert_eq!(run("x <- c(10, 20, 30); x[-1]").value, Value::Number(vec![20.0, 30.0]));
    assert_eq!(run("x <- c(10, 20, 30); x[x > 15]").value, Value::Number(vec![20.0, 30.0]));
    assert_eq!(
        run("letters <- c('a', 'b', 'c'); letters[c(3, 1)]").value,
        Value::Text(vec!["c".into(), "a".into()])
    );
}

#[test]
fn test_index_out_of_bounds() {
    let mut scope = Scope::new(Environment::new());
    let err = evaluate("c(1, 2)[5]", &mut scope).unwrap_err();
    assert!(matches!(err, ExprError::EvaluationError { .. }));
}

#[test]
fn test_huge_negative_index_excludes_nothing() {
    assert_eq!(run("c(1, 2)[-1e300]").value, Value::Number(vec![1.0, 2.0]));
    assert_eq!(run("c(1, 2)[-Inf]").value, Value::Number(vec![1.0, 2.0]));
}

#[test]
fn test_oversized_or_missing_index_is_an_error() {
    let mut scope = Scope::new(Environment::new());
    for source in ["c(1, 2)[1e300]", "c(1, 2)[Inf]", "c(1, 2)[NaN]"] {
        let err = evaluate(source, &mut scope).unwrap_err();
        assert!(matches!(err, ExprError::EvaluationError { .. }), "{}", source);
    }
}

#[test]
fn test_long_range_is_rejected_before_allocating() {
    let mut scope = Scope::new(Environment::new());
    let err = evaluate("length(1:1e18)", &mut scope).unwrap_err();
    assert!(err.to_string().contains("too long a vector"));
    assert!(evaluate("-1e18:1", &mut scope).is_err());
    assert_eq!(run("length(1:1000)").lines(), vec!["1000"]);
}

#[test]
fn test_super_assignment_writes_explicit_scope() {
    let ambient = Environment::new().with("total", 1.0);
    let mut scope = Scope::with_ambient(Environment::new(), &ambient);
    evaluate("total <<- total + 1", &mut scope).unwrap();
    assert_eq!(scope.explicit().get("total"), Some(&Value::number(2.0)));
    assert_eq!(ambient.get("total"), Some(&Value::number(1.0)));
}

#[test]
fn test_unbound_identifier() {
    let mut scope = Scope::new(Environment::new());
    let err = evaluate("1 + missing", &mut scope).unwrap_err();
    match err {
        ExprError::UnboundIdentifier { name, span } => {
            assert_eq!(name, "missing");
            assert_eq!(span, Span::new(4, 11));
        }
        other => panic!("Expected unbound identifier, got {:?}", other),
    }
}

#[test]
fn test_unknown_function() {
    let mut scope = Scope::new(Environment::new());
    let err = evaluate("system('ls')", &mut scope).unwrap_err();
    assert!(matches!(err, ExprError::UnknownFunction { ref name, .. } if name == "system"));
}

#[test]
fn test_text_arithmetic_is_type_error() {
    let mut scope = Scope::new(Environment::new());
    let err = evaluate("'a' + 1", &mut scope).unwrap_err();
    assert!(matches!(err, ExprError::TypeError { .. }));
}

#[test]
fn test_invisible_call_renders_nothing() {
    let result = run("invisible(5)");
    assert!(!result.visible);
    assert_eq!(result.value, Value::number(5.0));
}

#[test]
fn test_string_assignment_target() {
    assert_eq!(lines("'name' <- 'knit'; name"), vec!["knit"]);
}

#[test]
fn test_last_statement_decides_visibility() {
    assert!(lines("x <- 1; y <- 2").is_empty());
    assert_eq!(lines("x <- 1\nx + 1"), vec!["2"]);
}
