//! Tree-walking evaluator for tag expressions.
//!
//! Values are vectors; arithmetic and comparison work element-wise and
//! recycle the shorter operand. Every evaluation also reports whether its
//! result is visible, so a bare assignment renders as nothing.

use crate::ast::{BinOp, Expr, Literal, Program, UnOp};
use crate::builtins::{pick, unit_steps, Builtins, CallArgs};
use crate::error::{ExprError, Result, Span};
use crate::lexer::tokenize;
use crate::parser::parse;
use stitchwork_types::{format_number, Scope, Value};

/// A value together with its visibility
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: Value,
    pub visible: bool,
}

impl Evaluation {
    pub fn visible(value: Value) -> Self {
        Self {
            value,
            visible: true,
        }
    }

    pub fn invisible(value: Value) -> Self {
        Self {
            value,
            visible: false,
        }
    }

    /// Output lines for a tag: nothing when invisible, one line per element otherwise
    pub fn lines(&self) -> Vec<String> {
        if self.visible {
            self.value.to_strings()
        } else {
            Vec::new()
        }
    }
}

/// Expression interpreter
pub struct Interpreter {
    builtins: Builtins,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            builtins: Builtins::standard(),
        }
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    /// Tokenize, parse, and evaluate `source` against `scope`
    pub fn eval_source(&self, source: &str, scope: &mut Scope<'_>) -> Result<Evaluation> {
        tracing::trace!("Evaluating {:?}", source);
        let tokens = tokenize(source)?;
        let program = parse(&tokens)?;
        self.eval_program(&program, scope)
    }

    /// Evaluate every statement in order; the last one is the result
    pub fn eval_program(&self, program: &Program, scope: &mut Scope<'_>) -> Result<Evaluation> {
        let mut last = Evaluation::invisible(Value::Null);
        for statement in &program.statements {
            last = self.eval(statement, scope)?;
        }
        Ok(last)
    }

    pub fn eval(&self, expr: &Expr, scope: &mut Scope<'_>) -> Result<Evaluation> {
        match expr {
            Expr::Literal(lit, _) => Ok(Evaluation::visible(literal_value(lit))),

            Expr::Var(name, span) => scope
                .get(name)
                .cloned()
                .map(Evaluation::visible)
                .ok_or_else(|| ExprError::UnboundIdentifier {
                    span: *span,
                    name: name.clone(),
                }),

            Expr::Assign(name, value, _) => {
                let value = self.eval(value, scope)?.value;
                scope.set(name.clone(), value.clone());
                Ok(Evaluation::invisible(value))
            }

            Expr::UnOp(op, operand, span) => {
                let value = self.eval(operand, scope)?.value;
                unary(*op, value, *span).map(Evaluation::visible)
            }

            Expr::BinOp(lhs, BinOp::AndAnd, rhs, _) => {
                let left = self.eval_condition(lhs, scope, "&&")?;
                if !left {
                    return Ok(Evaluation::visible(Value::logical(false)));
                }
                let right = self.eval_condition(rhs, scope, "&&")?;
                Ok(Evaluation::visible(Value::logical(right)))
            }

            Expr::BinOp(lhs, BinOp::OrOr, rhs, _) => {
                let left = self.eval_condition(lhs, scope, "||")?;
                if left {
                    return Ok(Evaluation::visible(Value::logical(true)));
                }
                let right = self.eval_condition(rhs, scope, "||")?;
                Ok(Evaluation::visible(Value::logical(right)))
            }

            Expr::BinOp(lhs, op, rhs, span) => {
                let left = self.eval(lhs, scope)?.value;
                let right = self.eval(rhs, scope)?.value;
                binary(*op, &left, &right, *span).map(Evaluation::visible)
            }

            Expr::Call(name, args, span) => {
                let function = self.builtins.get(name).ok_or_else(|| ExprError::UnknownFunction {
                    span: *span,
                    name: name.clone(),
                })?;

                let mut positional = Vec::new();
                let mut named = Vec::new();
                for arg in args {
                    let value = self.eval(&arg.value, scope)?.value;
                    match &arg.name {
                        Some(key) => named.push((key.clone(), value)),
                        None => positional.push(value),
                    }
                }

                let call = CallArgs::bind(function, positional, named, *span)?;
                let value = (function.handler)(&call, scope)?;
                Ok(Evaluation {
                    value,
                    visible: function.visible,
                })
            }

            Expr::Index(target, index, span) => {
                let target = self.eval(target, scope)?.value;
                let index = self.eval(index, scope)?.value;
                subscript(&target, &index, *span).map(Evaluation::visible)
            }

            Expr::If(condition, then_branch, else_branch, _) => {
                if self.eval_condition(condition, scope, "if")? {
                    self.eval(then_branch, scope)
                } else if let Some(else_branch) = else_branch {
                    self.eval(else_branch, scope)
                } else {
                    Ok(Evaluation::invisible(Value::Null))
                }
            }

            Expr::Block(statements, _) => {
                let mut last = Evaluation::visible(Value::Null);
                for statement in statements {
                    last = self.eval(statement, scope)?;
                }
                Ok(last)
            }
        }
    }

    /// Evaluate a scalar condition for `if`, `&&`, and `||`
    fn eval_condition(&self, expr: &Expr, scope: &mut Scope<'_>, context: &str) -> Result<bool> {
        let value = self.eval(expr, scope)?.value;
        let span = expr.span();
        let logicals = value.as_logicals().ok_or_else(|| {
            ExprError::type_error(
                span,
                format!(
                    "argument of type {} is not interpretable as logical in {}",
                    value.type_name(),
                    context
                ),
            )
        })?;
        logicals
            .first()
            .copied()
            .ok_or_else(|| ExprError::eval(span, format!("argument of length zero in {}", context)))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Number(n) => Value::number(*n),
        Literal::Str(s) => Value::text(s.clone()),
        Literal::Bool(b) => Value::logical(*b),
        Literal::Null => Value::Null,
    }
}

fn unary(op: UnOp, value: Value, span: Span) -> Result<Value> {
    match op {
        UnOp::Not => {
            let logicals = value.as_logicals().ok_or_else(|| {
                ExprError::type_error(
                    span,
                    format!("invalid argument type {} to !", value.type_name()),
                )
            })?;
            Ok(Value::Logical(logicals.into_iter().map(|b| !b).collect()))
        }
        UnOp::Neg | UnOp::Pos => {
            let numbers = value.as_numbers().ok_or_else(|| {
                ExprError::type_error(
                    span,
                    format!("invalid argument type {} to unary operator", value.type_name()),
                )
            })?;
            if op == UnOp::Neg {
                Ok(Value::Number(numbers.into_iter().map(|n| -n).collect()))
            } else {
                Ok(Value::Number(numbers))
            }
        }
    }
}

/// Apply `f` element-wise with recycling; zero-length operands give an empty result
fn recycle<A: Clone, B: Clone, T>(left: &[A], right: &[B], f: impl Fn(A, B) -> T) -> Vec<T> {
    if left.is_empty() || right.is_empty() {
        return Vec::new();
    }
    let len = left.len().max(right.len());
    (0..len)
        .map(|i| f(left[i % left.len()].clone(), right[i % right.len()].clone()))
        .collect()
}

pub(crate) fn binary(op: BinOp, left: &Value, right: &Value, span: Span) -> Result<Value> {
    if op == BinOp::Range {
        return range(left, right, span);
    }

    if op.is_arithmetic() {
        let (a, b) = match (left.as_numbers(), right.as_numbers()) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(ExprError::type_error(
                    span,
                    format!("non-numeric argument to binary operator {}", op.symbol()),
                ))
            }
        };
        let result = recycle(&a, &b, |x, y| match op {
            BinOp::Add => x + y,
            BinOp::Sub => x - y,
            BinOp::Mul => x * y,
            BinOp::Div => x / y,
            BinOp::Pow => x.powf(y),
            BinOp::Mod => x - (x / y).floor() * y,
            BinOp::IntDiv => (x / y).floor(),
            _ => unreachable!("arithmetic operator"),
        });
        return Ok(Value::Number(result));
    }

    if op.is_comparison() {
        let textual = matches!(left, Value::Text(_)) || matches!(right, Value::Text(_));
        let result = if textual {
            recycle(&left.to_strings(), &right.to_strings(), |x, y| compare(op, x.cmp(&y)))
        } else {
            let a = left.as_numbers().unwrap_or_default();
            let b = right.as_numbers().unwrap_or_default();
            recycle(&a, &b, |x, y| match x.partial_cmp(&y) {
                Some(ordering) => compare(op, ordering),
                None => op == BinOp::Ne,
            })
        };
        return Ok(Value::Logical(result));
    }

    // Element-wise `&` and `|`
    let (a, b) = match (left.as_logicals(), right.as_logicals()) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(ExprError::type_error(
                span,
                format!(
                    "operations are possible only for numeric or logical types ({})",
                    op.symbol()
                ),
            ))
        }
    };
    let result = recycle(&a, &b, |x, y| if op == BinOp::And { x && y } else { x || y });
    Ok(Value::Logical(result))
}

fn compare(op: BinOp, ordering: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::*;
    match op {
        BinOp::Eq => ordering == Equal,
        BinOp::Ne => ordering != Equal,
        BinOp::Lt => ordering == Less,
        BinOp::Le => ordering != Greater,
        BinOp::Gt => ordering == Greater,
        BinOp::Ge => ordering != Less,
        _ => false,
    }
}

fn scalar(value: &Value, span: Span, what: &str) -> Result<f64> {
    value
        .as_numbers()
        .and_then(|v| v.first().copied())
        .ok_or_else(|| ExprError::type_error(span, format!("{} must be a number", what)))
}

/// `from:to` with unit steps in whichever direction reaches `to`
fn range(left: &Value, right: &Value, span: Span) -> Result<Value> {
    let from = scalar(left, span, "range start")?;
    let to = scalar(right, span, "range end")?;
    if !from.is_finite() || !to.is_finite() {
        return Err(ExprError::eval(span, "range bounds must be finite"));
    }
    unit_steps(from, to, span)
}

/// 1-based subscripting with positive, negative, or logical indices
pub(crate) fn subscript(target: &Value, index: &Value, span: Span) -> Result<Value> {
    let len = target.len();
    let positions: Vec<usize> = match index {
        Value::Logical(mask) => {
            if mask.is_empty() {
                Vec::new()
            } else {
                (0..len).filter(|&i| mask[i % mask.len()]).collect()
            }
        }
        Value::Number(raw) => {
            if raw.iter().any(|n| n.is_nan()) {
                return Err(ExprError::eval(span, "missing values are not allowed in subscripts"));
            }
            // Kept as f64; magnitudes may exceed any integer type
            let whole: Vec<f64> = raw.iter().map(|n| n.trunc()).filter(|&n| n != 0.0).collect();
            if whole.iter().all(|&n| n < 0.0) && !whole.is_empty() {
                (0..len).filter(|&i| !whole.iter().any(|&n| -n == (i + 1) as f64)).collect()
            } else if whole.iter().any(|&n| n < 0.0) {
                return Err(ExprError::eval(span, "can't mix positive and negative subscripts"));
            } else {
                let mut positions = Vec::with_capacity(whole.len());
                for n in whole {
                    if n > len as f64 {
                        return Err(ExprError::eval(
                            span,
                            format!(
                                "subscript {} out of bounds for length {}",
                                format_number(n),
                                len
                            ),
                        ));
                    }
                    positions.push(n as usize - 1);
                }
                positions
            }
        }
        Value::Null => Vec::new(),
        Value::Text(_) => {
            return Err(ExprError::type_error(span, "character subscripts are not supported"));
        }
    };

    Ok(pick(target, &positions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchwork_types::Environment;

    fn eval(source: &str) -> Evaluation {
        let mut scope = Scope::new(Environment::new());
        Interpreter::new().eval_source(source, &mut scope).unwrap()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1 + 2 * 3").value, Value::number(7.0));
        assert_eq!(eval("-2^2").value, Value::number(-4.0));
        assert_eq!(eval("2^3^2").value, Value::number(512.0));
        assert_eq!(eval("(1 + 2) * 3").value, Value::number(9.0));
    }

    #[test]
    fn test_assignment_is_invisible() {
        let result = eval("x <- 5");
        assert!(!result.visible);
        assert!(result.lines().is_empty());
        assert_eq!(eval("x <- 5; x").lines(), vec!["5"]);
    }

    #[test]
    fn test_modulo_follows_divisor_sign() {
        assert_eq!(eval("-7 %% 3").value, Value::number(2.0));
        assert_eq!(eval("7 %/% 2").value, Value::number(3.0));
    }

    #[test]
    fn test_range_descending() {
        assert_eq!(eval("3:1").value, Value::Number(vec![3.0, 2.0, 1.0]));
        assert_eq!(eval("-1:1").value, Value::Number(vec![-1.0, 0.0, 1.0]));
    }
}
