use crate::*;

fn lines(source: &str) -> Vec<String> {
    let mut scope = Scope::new(Environment::new());
    evaluate(source, &mut scope).unwrap().lines()
}

fn fails(source: &str) -> ExprError {
    let mut scope = Scope::new(Environment::new());
    evaluate(source, &mut scope).unwrap_err()
}

#[test]
fn test_paste_recycles_and_separates() {
    assert_eq!(lines("paste('a', 1:2)"), vec!["a 1", "a 2"]);
    assert_eq!(lines("paste('x', 'y', sep = '-')"), vec!["x-y"]);
    assert_eq!(lines("paste0('chunk', 1:3, collapse = ',')"), vec!["chunk1,chunk2,chunk3"]);
}

#[test]
fn test_c_promotes_types() {
    assert_eq!(lines("c(1, TRUE)"), vec!["1", "1"]);
    assert_eq!(lines("c(1, 'a', TRUE)"), vec!["1", "a", "TRUE"]);
    assert_eq!(lines("c(NULL, 2)"), vec!["2"]);
}

#[test]
fn test_length_and_sums() {
    assert_eq!(lines("length(1:10)"), vec!["10"]);
    assert_eq!(lines("length(NULL)"), vec!["0"]);
    assert_eq!(lines("sum(1:4, 10)"), vec!["20"]);
    assert_eq!(lines("mean(c(1, 2, 3, 4))"), vec!["2.5"]);
    assert_eq!(lines("min(3, 1:5)"), vec!["1"]);
    assert_eq!(lines("max(c(2, 9), 4)"), vec!["9"]);
}

#[test]
fn test_seq_forms() {
    assert_eq!(lines("seq(3)"), vec!["1", "2", "3"]);
    assert_eq!(lines("seq(2, 4)"), vec!["2", "3", "4"]);
    assert_eq!(lines("seq(0, 1, by = 0.25)"), vec!["0", "0.25", "0.5", "0.75", "1"]);
    assert_eq!(lines("seq(10, 1, by = -3)"), vec!["10", "7", "4", "1"]);
    assert_eq!(lines("seq_len(3)"), vec!["1", "2", "3"]);
    assert!(lines("seq_len(0)").is_empty());
}

#[test]
fn test_seq_wrong_sign() {
    assert!(matches!(fails("seq(1, 5, by = -1)"), ExprError::EvaluationError { .. }));
}

#[test]
fn test_rep_and_rev() {
    assert_eq!(lines("rep('a', 3)"), vec!["a", "a", "a"]);
    assert_eq!(lines("rep(1:2, times = 2)"), vec!["1", "2", "1", "2"]);
    assert_eq!(lines("rep(1:2, each = 2)"), vec!["1", "1", "2", "2"]);
    assert_eq!(lines("rev(c('x', 'y', 'z'))"), vec!["z", "y", "x"]);
}

#[test]
fn test_round_half_to_even() {
    assert_eq!(lines("round(2.5)"), vec!["2"]);
    assert_eq!(lines("round(3.5)"), vec!["4"]);
    assert_eq!(lines("round(3.14159, 2)"), vec!["3.14"]);
    assert_eq!(lines("round(3.14159, digits = 3)"), vec!["3.142"]);
}

#[test]
fn test_math_functions() {
    assert_eq!(lines("sqrt(c(4, 9))"), vec!["2", "3"]);
    assert_eq!(lines("abs(-3:-1)"), vec!["3", "2", "1"]);
}

#[test]
fn test_text_functions() {
    assert_eq!(lines("nchar(c('knit', ''))"), vec!["4", "0"]);
    assert_eq!(lines("toupper('abc')"), vec!["ABC"]);
    assert_eq!(lines("tolower('ABC')"), vec!["abc"]);
    assert_eq!(lines("as.character(1:2)"), vec!["1", "2"]);
    assert_eq!(lines("as.numeric('4.5') * 2"), vec!["9"]);
}

#[test]
fn test_as_numeric_rejects_words() {
    assert!(matches!(fails("as.numeric('four')"), ExprError::TypeError { .. }));
}

#[test]
fn test_format_nsmall() {
    assert_eq!(lines("format(2, nsmall = 2)"), vec!["2.00"]);
    assert_eq!(lines("format(3.14159, nsmall = 2)"), vec!["3.14159"]);
    assert_eq!(lines("format(TRUE)"), vec!["TRUE"]);
}

#[test]
fn test_sprintf_conversions() {
    assert_eq!(lines("sprintf('%d items', 3)"), vec!["3 items"]);
    assert_eq!(lines("sprintf('%.2f', 3.14159)"), vec!["3.14"]);
    assert_eq!(lines("sprintf('%5s|%-5s|', 'ab', 'cd')"), vec!["   ab|cd   |"]);
    assert_eq!(lines("sprintf('%03d', 7)"), vec!["007"]);
    assert_eq!(lines("sprintf('%+d', 5)"), vec!["+5"]);
    assert_eq!(lines("sprintf('%e', 12345.678)"), vec!["1.234568e+04"]);
    assert_eq!(lines("sprintf('100%%')"), vec!["100%"]);
    assert_eq!(lines("sprintf('x%d', 1:3)"), vec!["x1", "x2", "x3"]);
    assert_eq!(lines("sprintf(fmt = '%s-%s', 'a', 'b')"), vec!["a-b"]);
}

#[test]
fn test_sprintf_rejects_fractional_integer() {
    assert!(matches!(fails("sprintf('%d', 1.5)"), ExprError::TypeError { .. }));
    assert!(matches!(fails("sprintf('%d %d', 1)"), ExprError::EvaluationError { .. }));
}

#[test]
fn test_sprintf_width_is_bounded() {
    assert!(matches!(
        fails("sprintf('%99999999999999999999999d', 1)"),
        ExprError::EvaluationError { .. }
    ));
    assert!(matches!(
        fails("sprintf('%.99999999999999999999f', 1)"),
        ExprError::EvaluationError { .. }
    ));
    assert!(matches!(fails("sprintf('%9000s', 'x')"), ExprError::EvaluationError { .. }));
    assert_eq!(lines("sprintf('%8s', 'x')"), vec!["       x"]);
}

#[test]
fn test_oversized_vectors_are_errors() {
    for source in [
        "seq_len(1e19)",
        "seq_len(NaN)",
        "seq(1e18)",
        "seq(1, 1e18)",
        "seq(0, 1, by = 1e-18)",
        "seq(1, Inf, by = 1)",
        "rep(1, 1e18)",
        "rep(1:10, times = 1e6, each = 1e6)",
        "rep(1, Inf)",
    ] {
        let err = fails(source);
        assert!(matches!(err, ExprError::EvaluationError { .. }), "{}: {:?}", source, err);
    }
    assert!(lines("rep(NULL, 1e18)").is_empty());
    assert!(lines("rep(1, times = 1e18, each = 0)").is_empty());
}

#[test]
fn test_format_nsmall_range() {
    assert!(matches!(fails("format(1, nsmall = 1e9)"), ExprError::EvaluationError { .. }));
}

#[test]
fn test_ifelse() {
    assert_eq!(lines("ifelse(1:4 %% 2 == 0, 'even', 'odd')"), vec!["odd", "even", "odd", "even"]);
    assert_eq!(lines("ifelse(c(TRUE, FALSE), 1, 'no')"), vec!["1", "no"]);
}

#[test]
fn test_exists_sees_both_scopes() {
    let ambient = Environment::new().with("outer", 1.0);
    let mut scope = Scope::with_ambient(Environment::new().with("inner", 2.0), &ambient);
    let check = |source: &str, scope: &mut Scope<'_>| evaluate(source, scope).unwrap().lines();
    assert_eq!(check("exists('outer')", &mut scope), vec!["TRUE"]);
    assert_eq!(check("exists('inner')", &mut scope), vec!["TRUE"]);
    assert_eq!(check("exists('nowhere')", &mut scope), vec!["FALSE"]);
}

#[test]
fn test_is_null_and_identity() {
    assert_eq!(lines("is.null(NULL)"), vec!["TRUE"]);
    assert_eq!(lines("is.null(0)"), vec!["FALSE"]);
    assert_eq!(lines("identity('same')"), vec!["same"]);
}

#[test]
fn test_unknown_named_argument() {
    assert!(matches!(fails("sqrt(y = 4)"), ExprError::EvaluationError { .. }));
}

#[test]
fn test_missing_required_argument() {
    assert!(matches!(fails("nchar()"), ExprError::EvaluationError { .. }));
}
