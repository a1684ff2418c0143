//! Native functions callable from tag expressions.

use crate::error::{ExprError, Result, Span};
use stitchwork_types::{format_number, Scope, Value};
use std::collections::HashMap;

/// Signature shared by every native function
pub type Handler = fn(&CallArgs, &Scope<'_>) -> Result<Value>;

/// How a native function accepts its arguments
#[derive(Debug, Clone, Copy)]
pub enum Params {
    /// Named formals matched by name, then by position. The first
    /// `required` formals have no default.
    Fixed {
        formals: &'static [&'static str],
        required: usize,
    },
    /// Any number of positional values plus optional named formals
    Variadic { formals: &'static [&'static str] },
}

/// A built-in function
#[derive(Debug, Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub params: Params,
    /// Whether the result shows up in tag output
    pub visible: bool,
    pub handler: Handler,
}

/// Registry of native functions
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    functions: HashMap<&'static str, NativeFunction>,
}

impl Builtins {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard library available to every tag
    pub fn standard() -> Self {
        let mut builtins = Self::empty();

        // Vectors
        builtins.variadic("c", &[], builtin_c);
        builtins.fixed("length", &["x"], 1, builtin_length);
        builtins.fixed("rev", &["x"], 1, builtin_rev);
        builtins.fixed("rep", &["x", "times", "each"], 1, builtin_rep);
        builtins.fixed("seq", &["from", "to", "by"], 0, builtin_seq);
        builtins.fixed("seq_len", &["length.out"], 1, builtin_seq_len);
        builtins.fixed("ifelse", &["test", "yes", "no"], 3, builtin_ifelse);

        // Arithmetic
        builtins.variadic("sum", &[], builtin_sum);
        builtins.fixed("mean", &["x"], 1, builtin_mean);
        builtins.variadic("min", &[], builtin_min);
        builtins.variadic("max", &[], builtin_max);
        builtins.fixed("round", &["x", "digits"], 1, builtin_round);
        builtins.fixed("sqrt", &["x"], 1, builtin_sqrt);
        builtins.fixed("abs", &["x"], 1, builtin_abs);

        // Text
        builtins.variadic("paste", &["sep", "collapse"], builtin_paste);
        builtins.variadic("paste0", &["collapse"], builtin_paste0);
        builtins.fixed("nchar", &["x"], 1, builtin_nchar);
        builtins.fixed("toupper", &["x"], 1, builtin_toupper);
        builtins.fixed("tolower", &["x"], 1, builtin_tolower);
        builtins.fixed("as.character", &["x"], 1, builtin_as_character);
        builtins.fixed("as.numeric", &["x"], 1, builtin_as_numeric);
        builtins.fixed("format", &["x", "nsmall"], 1, builtin_format);
        builtins.variadic("sprintf", &["fmt"], builtin_sprintf);

        // Scope and visibility
        builtins.fixed("exists", &["x"], 1, builtin_exists);
        builtins.fixed("is.null", &["x"], 1, builtin_is_null);
        builtins.fixed("identity", &["x"], 1, builtin_identity);
        builtins.register(NativeFunction {
            name: "invisible",
            params: Params::Fixed {
                formals: &["x"],
                required: 0,
            },
            visible: false,
            handler: builtin_identity,
        });

        builtins
    }

    pub fn register(&mut self, function: NativeFunction) {
        self.functions.insert(function.name, function);
    }

    fn fixed(
        &mut self,
        name: &'static str,
        formals: &'static [&'static str],
        required: usize,
        handler: Handler,
    ) {
        self.register(NativeFunction {
            name,
            params: Params::Fixed { formals, required },
            visible: true,
            handler,
        });
    }

    fn variadic(&mut self, name: &'static str, formals: &'static [&'static str], handler: Handler) {
        self.register(NativeFunction {
            name,
            params: Params::Variadic { formals },
            visible: true,
            handler,
        });
    }

    pub fn get(&self, name: &str) -> Option<&NativeFunction> {
        self.functions.get(name)
    }

    /// Sorted function names
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Arguments bound to a native function's formals
#[derive(Debug, Clone)]
pub struct CallArgs {
    pub name: &'static str,
    formals: &'static [&'static str],
    slots: Vec<Option<Value>>,
    dots: Vec<Value>,
    pub span: Span,
}

impl CallArgs {
    /// Match evaluated arguments against the function's parameters
    pub fn bind(
        function: &NativeFunction,
        positional: Vec<Value>,
        named: Vec<(String, Value)>,
        span: Span,
    ) -> Result<Self> {
        let got = positional.len() + named.len();
        match function.params {
            Params::Fixed { formals, required } => {
                let mut slots: Vec<Option<Value>> = vec![None; formals.len()];
                for (key, value) in named {
                    let idx = formals.iter().position(|f| *f == key).ok_or_else(|| {
                        ExprError::eval(
                            span,
                            format!("unused argument ({} = ...) in {}", key, function.name),
                        )
                    })?;
                    slots[idx] = Some(value);
                }

                let free: Vec<usize> = (0..formals.len()).filter(|&i| slots[i].is_none()).collect();
                if positional.len() > free.len() {
                    return Err(ExprError::ArityMismatch {
                        span,
                        name: function.name.to_string(),
                        expected: formals.len(),
                        got,
                    });
                }
                for (idx, value) in free.into_iter().zip(positional) {
                    slots[idx] = Some(value);
                }

                if let Some(missing) = (0..required).find(|&i| slots[i].is_none()) {
                    return Err(ExprError::eval(
                        span,
                        format!(
                            "argument \"{}\" is missing, with no default in {}",
                            formals[missing], function.name
                        ),
                    ));
                }

                Ok(Self {
                    name: function.name,
                    formals,
                    slots,
                    dots: Vec::new(),
                    span,
                })
            }
            Params::Variadic { formals } => {
                let mut slots: Vec<Option<Value>> = vec![None; formals.len()];
                let mut dots = positional;
                for (key, value) in named {
                    match formals.iter().position(|f| *f == key) {
                        Some(idx) => slots[idx] = Some(value),
                        None => dots.push(value),
                    }
                }
                Ok(Self {
                    name: function.name,
                    formals,
                    slots,
                    dots,
                    span,
                })
            }
        }
    }

    pub fn get(&self, formal: &str) -> Option<&Value> {
        let idx = self.formals.iter().position(|f| *f == formal)?;
        self.slots[idx].as_ref()
    }

    pub fn require(&self, formal: &str) -> Result<&Value> {
        self.get(formal).ok_or_else(|| {
            ExprError::eval(
                self.span,
                format!("argument \"{}\" is missing, with no default in {}", formal, self.name),
            )
        })
    }

    /// Values passed through `...`
    pub fn dots(&self) -> &[Value] {
        &self.dots
    }

    fn numbers(&self, value: &Value) -> Result<Vec<f64>> {
        value.as_numbers().ok_or_else(|| {
            ExprError::type_error(
                self.span,
                format!("non-numeric argument to {}", self.name),
            )
        })
    }

    fn scalar_or(&self, formal: &str, default: f64) -> Result<f64> {
        match self.get(formal) {
            Some(value) => self
                .numbers(value)?
                .first()
                .copied()
                .ok_or_else(|| {
                    ExprError::eval(self.span, format!("invalid '{}' argument", formal))
                }),
            None => Ok(default),
        }
    }

    fn text(&self, formal: &str) -> Option<String> {
        self.get(formal).and_then(Value::first_string)
    }
}

/// Gather elements at `positions` into a new vector of the same type
/// Longest vector an expression may build
pub(crate) const MAX_VECTOR_LEN: usize = 1 << 24;

/// Widest field or precision a sprintf conversion may ask for
const MAX_FORMAT_WIDTH: usize = 8192;

/// Check a length computed in floating point before anything is allocated
pub(crate) fn vector_len(count: f64, span: Span) -> Result<usize> {
    if count.is_nan() || count < 0.0 {
        return Err(ExprError::eval(span, "invalid vector length"));
    }
    if count > MAX_VECTOR_LEN as f64 {
        return Err(ExprError::eval(span, "result would be too long a vector"));
    }
    Ok(count as usize)
}

pub(crate) fn pick(value: &Value, positions: &[usize]) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Logical(v) => Value::Logical(positions.iter().map(|&i| v[i]).collect()),
        Value::Number(v) => Value::Number(positions.iter().map(|&i| v[i]).collect()),
        Value::Text(v) => Value::Text(positions.iter().map(|&i| v[i].clone()).collect()),
    }
}

/// Concatenate values, promoting logical < numeric < character
fn combine(values: &[&Value]) -> Value {
    let values: Vec<&Value> = values.iter().copied().filter(|v| !v.is_null()).collect();
    if values.is_empty() {
        return Value::Null;
    }
    if values.iter().any(|v| matches!(v, Value::Text(_))) {
        Value::Text(values.iter().flat_map(|v| v.to_strings()).collect())
    } else if values.iter().any(|v| matches!(v, Value::Number(_))) {
        Value::Number(
            values
                .iter()
                .flat_map(|v| v.as_numbers().unwrap_or_default())
                .collect(),
        )
    } else {
        Value::Logical(
            values
                .iter()
                .flat_map(|v| v.as_logicals().unwrap_or_default())
                .collect(),
        )
    }
}

fn map_numbers(call: &CallArgs, f: impl Fn(f64) -> f64) -> Result<Value> {
    let numbers = call.numbers(call.require("x")?)?;
    Ok(Value::Number(numbers.into_iter().map(f).collect()))
}

fn map_text(call: &CallArgs, f: impl Fn(&str) -> String) -> Result<Value> {
    let value = call.require("x")?;
    Ok(Value::Text(value.to_strings().iter().map(|s| f(s)).collect()))
}

fn builtin_c(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let values: Vec<&Value> = call.dots().iter().collect();
    Ok(combine(&values))
}

fn builtin_length(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    Ok(Value::number(call.require("x")?.len() as f64))
}

fn builtin_rev(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let value = call.require("x")?;
    let positions: Vec<usize> = (0..value.len()).rev().collect();
    Ok(pick(value, &positions))
}

fn builtin_rep(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let value = call.require("x")?;
    let times = call.scalar_or("times", 1.0)?;
    let each = call.scalar_or("each", 1.0)?;
    if !(times >= 0.0 && each >= 0.0 && times.is_finite() && each.is_finite()) {
        return Err(ExprError::eval(call.span, "invalid 'times' or 'each' argument"));
    }
    let (times, each) = (times.floor(), each.floor());
    let total = vector_len(times * each * value.len() as f64, call.span)?;
    if total == 0 {
        return Ok(pick(value, &[]));
    }

    let mut positions = Vec::with_capacity(total);
    for _ in 0..times as usize {
        for i in 0..value.len() {
            positions.extend(std::iter::repeat(i).take(each as usize));
        }
    }
    Ok(pick(value, &positions))
}

fn builtin_seq(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    // seq(n) counts from 1 to n
    if call.get("to").is_none() && call.get("by").is_none() {
        let n = call.scalar_or("from", 1.0)?;
        return unit_steps(1.0, n, call.span);
    }

    let from = call.scalar_or("from", 1.0)?;
    let to = call.scalar_or("to", 1.0)?;
    let by = match call.get("by") {
        Some(_) => call.scalar_or("by", 1.0)?,
        None => return unit_steps(from, to, call.span),
    };

    if from == to {
        return Ok(Value::number(from));
    }
    if by == 0.0 || !by.is_finite() {
        return Err(ExprError::eval(call.span, "invalid '(to - from)/by' in seq"));
    }
    if (to - from) / by < 0.0 {
        return Err(ExprError::eval(call.span, "wrong sign in 'by' argument"));
    }
    let count = vector_len(((to - from) / by + 1e-10).floor() + 1.0, call.span)?;
    Ok(Value::Number((0..count).map(|i| from + by * i as f64).collect()))
}

pub(crate) fn unit_steps(from: f64, to: f64, span: Span) -> Result<Value> {
    let step = if to >= from { 1.0 } else { -1.0 };
    let count = vector_len(((to - from) * step + 1e-10).floor() + 1.0, span)?;
    Ok(Value::Number((0..count).map(|i| from + step * i as f64).collect()))
}

fn builtin_seq_len(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let n = call.scalar_or("length.out", 0.0)?;
    if n < 0.0 {
        return Err(ExprError::eval(call.span, "argument of length 0 or negative in seq_len"));
    }
    let n = vector_len(n.floor(), call.span)?;
    Ok(Value::Number((1..=n).map(|i| i as f64).collect()))
}

fn builtin_ifelse(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let test = call.require("test")?;
    let yes = call.require("yes")?;
    let no = call.require("no")?;
    let mask = test.as_logicals().ok_or_else(|| {
        ExprError::type_error(call.span, "test in ifelse must be logical")
    })?;
    if mask.is_empty() {
        return Ok(Value::Logical(Vec::new()));
    }
    if yes.is_empty() || no.is_empty() {
        return Err(ExprError::eval(call.span, "yes and no in ifelse must not be empty"));
    }

    // Lay out yes and no side by side so one `pick` serves every type
    let both = combine(&[yes, no]);
    let positions: Vec<usize> = mask
        .iter()
        .enumerate()
        .map(|(i, &take_yes)| {
            if take_yes {
                i % yes.len()
            } else {
                yes.len() + i % no.len()
            }
        })
        .collect();
    Ok(pick(&both, &positions))
}

fn builtin_sum(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let mut total = 0.0;
    for value in call.dots() {
        total += call.numbers(value)?.iter().sum::<f64>();
    }
    Ok(Value::number(total))
}

fn builtin_mean(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let numbers = call.numbers(call.require("x")?)?;
    if numbers.is_empty() {
        return Ok(Value::number(f64::NAN));
    }
    Ok(Value::number(numbers.iter().sum::<f64>() / numbers.len() as f64))
}

fn all_numbers(call: &CallArgs) -> Result<Vec<f64>> {
    let mut numbers = Vec::new();
    for value in call.dots() {
        numbers.extend(call.numbers(value)?);
    }
    Ok(numbers)
}

fn builtin_min(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let min = all_numbers(call)?.into_iter().fold(f64::INFINITY, f64::min);
    Ok(Value::number(min))
}

fn builtin_max(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let max = all_numbers(call)?.into_iter().fold(f64::NEG_INFINITY, f64::max);
    Ok(Value::number(max))
}

fn builtin_round(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let digits = call.scalar_or("digits", 0.0)?;
    let factor = 10f64.powi(digits as i32);
    map_numbers(call, |n| (n * factor).round_ties_even() / factor)
}

fn builtin_sqrt(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    map_numbers(call, f64::sqrt)
}

fn builtin_abs(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    map_numbers(call, f64::abs)
}

fn paste_with(call: &CallArgs, sep: &str) -> Result<Value> {
    let parts: Vec<Vec<String>> = call
        .dots()
        .iter()
        .map(Value::to_strings)
        .filter(|p| !p.is_empty())
        .collect();
    let len = parts.iter().map(Vec::len).max().unwrap_or(0);
    let rows: Vec<String> = (0..len)
        .map(|i| {
            parts
                .iter()
                .map(|p| p[i % p.len()].as_str())
                .collect::<Vec<_>>()
                .join(sep)
        })
        .collect();

    match call.text("collapse") {
        Some(collapse) => Ok(Value::text(rows.join(&collapse))),
        None => Ok(Value::Text(rows)),
    }
}

fn builtin_paste(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let sep = call.text("sep").unwrap_or_else(|| " ".to_string());
    paste_with(call, &sep)
}

fn builtin_paste0(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    paste_with(call, "")
}

fn builtin_nchar(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let value = call.require("x")?;
    Ok(Value::Number(
        value
            .to_strings()
            .iter()
            .map(|s| s.chars().count() as f64)
            .collect(),
    ))
}

fn builtin_toupper(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    map_text(call, str::to_uppercase)
}

fn builtin_tolower(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    map_text(call, str::to_lowercase)
}

fn builtin_as_character(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    map_text(call, |s| s.to_string())
}

fn builtin_as_numeric(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    match call.require("x")? {
        Value::Text(items) => items
            .iter()
            .map(|s| {
                s.trim().parse::<f64>().map_err(|_| {
                    ExprError::type_error(
                        call.span,
                        format!("cannot convert \"{}\" to a number", s),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Number),
        other => Ok(Value::Number(other.as_numbers().unwrap_or_default())),
    }
}

fn builtin_format(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let value = call.require("x")?;
    let nsmall = call.scalar_or("nsmall", 0.0)?;
    if !(0.0..=20.0).contains(&nsmall) {
        return Err(ExprError::eval(call.span, "invalid 'nsmall' argument"));
    }
    let nsmall = nsmall as usize;
    match value {
        Value::Number(numbers) => Ok(Value::Text(
            numbers
                .iter()
                .map(|&n| {
                    let plain = format_number(n);
                    let decimals = plain.split_once('.').map(|(_, d)| d.len()).unwrap_or(0);
                    if n.is_finite() && !plain.contains('e') && decimals < nsmall {
                        format!("{:.*}", nsmall, n)
                    } else {
                        plain
                    }
                })
                .collect(),
        )),
        other => Ok(Value::Text(other.to_strings())),
    }
}

fn builtin_sprintf(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    let (fmt, args): (&Value, &[Value]) = match call.get("fmt") {
        Some(fmt) => (fmt, call.dots()),
        None => call
            .dots()
            .split_first()
            .ok_or_else(|| ExprError::eval(call.span, "argument \"fmt\" is missing in sprintf"))?,
    };

    let formats = fmt.to_strings();
    if formats.is_empty() || args.iter().any(Value::is_empty) {
        return Ok(Value::Text(Vec::new()));
    }
    let len = args.iter().map(Value::len).chain([formats.len()]).max().unwrap_or(0);

    let mut out = Vec::with_capacity(len);
    for row in 0..len {
        let template = &formats[row % formats.len()];
        out.push(sprintf_one(template, args, row, call.span)?);
    }
    Ok(Value::Text(out))
}

/// One parsed `%` conversion
struct Conversion {
    left: bool,
    zero: bool,
    plus: bool,
    width: usize,
    precision: Option<usize>,
    kind: char,
}

fn sprintf_one(template: &str, args: &[Value], row: usize, span: Span) -> Result<String> {
    let mut out = String::new();
    let mut chars = template.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut conv = Conversion {
            left: false,
            zero: false,
            plus: false,
            width: 0,
            precision: None,
            kind: 's',
        };
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => conv.left = true,
                '0' => conv.zero = true,
                '+' => conv.plus = true,
                _ => break,
            }
            chars.next();
        }
        conv.width = format_digits(&mut chars, span)?;
        if chars.peek() == Some(&'.') {
            chars.next();
            conv.precision = Some(format_digits(&mut chars, span)?);
        }
        conv.kind = chars
            .next()
            .ok_or_else(|| {
                ExprError::eval(span, format!("unrecognised format conversion '{}'", template))
            })?;

        let arg = args
            .get(next_arg)
            .ok_or_else(|| ExprError::eval(span, "too few arguments in sprintf"))?;
        next_arg += 1;

        out.push_str(&format_conversion(&conv, arg, row, span)?);
    }

    Ok(out)
}

/// Width or precision digits of a conversion, bounded by `MAX_FORMAT_WIDTH`
fn format_digits(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    span: Span,
) -> Result<usize> {
    let mut value: usize = 0;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(d as usize))
            .filter(|&v| v <= MAX_FORMAT_WIDTH)
            .ok_or_else(|| ExprError::eval(span, "sprintf field width or precision is too large"))?;
        chars.next();
    }
    Ok(value)
}

fn format_conversion(conv: &Conversion, arg: &Value, row: usize, span: Span) -> Result<String> {
    let number = || -> Result<f64> {
        let numbers = arg.as_numbers().ok_or_else(|| {
            ExprError::type_error(
                span,
                format!(
                    "invalid format '%{}'; use format %s for character objects",
                    conv.kind
                ),
            )
        })?;
        Ok(numbers[row % numbers.len()])
    };

    let body = match conv.kind {
        's' => {
            let strings = arg.to_strings();
            let s = strings[row % strings.len()].clone();
            match conv.precision {
                Some(p) => s.chars().take(p).collect(),
                None => s,
            }
        }
        'd' | 'i' => {
            let n = number()?;
            if n != n.trunc() {
                return Err(ExprError::type_error(
                    span,
                    "invalid format '%d'; use format %f or %e for numeric objects",
                ));
            }
            signed(format!("{}", n as i64), conv.plus)
        }
        'f' => signed(format!("{:.*}", conv.precision.unwrap_or(6), number()?), conv.plus),
        'e' | 'E' => {
            let s = c_exponent(number()?, conv.precision.unwrap_or(6));
            let s = if conv.kind == 'E' { s.to_uppercase() } else { s };
            signed(s, conv.plus)
        }
        other => {
            return Err(ExprError::eval(
                span,
                format!("unsupported sprintf conversion '%{}'", other),
            ))
        }
    };

    Ok(pad(body, conv))
}

fn signed(s: String, plus: bool) -> String {
    if plus && !s.starts_with('-') {
        format!("+{}", s)
    } else {
        s
    }
}

/// C-style `%e`: mantissa with `precision` decimals and a signed two-digit exponent
fn c_exponent(n: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, n);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => raw,
    }
}

fn pad(body: String, conv: &Conversion) -> String {
    let len = body.chars().count();
    if len >= conv.width {
        return body;
    }
    let fill = conv.width - len;
    if conv.left {
        format!("{}{}", body, " ".repeat(fill))
    } else if conv.zero && conv.kind != 's' {
        let (sign, digits) = match body.chars().next() {
            Some(c @ ('-' | '+')) => (c.to_string(), body[1..].to_string()),
            _ => (String::new(), body.clone()),
        };
        format!("{}{}{}", sign, "0".repeat(fill), digits)
    } else {
        format!("{}{}", " ".repeat(fill), body)
    }
}

fn builtin_exists(call: &CallArgs, scope: &Scope<'_>) -> Result<Value> {
    let name = call
        .require("x")?
        .first_string()
        .ok_or_else(|| ExprError::eval(call.span, "invalid first argument to exists"))?;
    Ok(Value::logical(scope.contains(&name)))
}

fn builtin_is_null(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    Ok(Value::logical(call.require("x")?.is_null()))
}

fn builtin_identity(call: &CallArgs, _scope: &Scope<'_>) -> Result<Value> {
    Ok(call.get("x").cloned().unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry() {
        let builtins = Builtins::standard();
        assert!(builtins.get("paste").is_some());
        assert!(builtins.get("system").is_none());
        assert!(!builtins.get("invisible").unwrap().visible);
        let names = builtins.names();
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_bind_named_then_positional() {
        let builtins = Builtins::standard();
        let seq = builtins.get("seq").unwrap();
        let call = CallArgs::bind(
            seq,
            vec![Value::number(1.0), Value::number(9.0)],
            vec![("by".to_string(), Value::number(4.0))],
            Span::default(),
        )
        .unwrap();
        assert_eq!(call.get("from"), Some(&Value::number(1.0)));
        assert_eq!(call.get("to"), Some(&Value::number(9.0)));
        assert_eq!(call.get("by"), Some(&Value::number(4.0)));
    }

    #[test]
    fn test_bind_too_many_arguments() {
        let builtins = Builtins::standard();
        let sqrt = builtins.get("sqrt").unwrap();
        let err = CallArgs::bind(
            sqrt,
            vec![Value::number(1.0), Value::number(2.0)],
            vec![],
            Span::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExprError::ArityMismatch { expected: 1, got: 2, .. }));
    }

    #[test]
    fn test_c_exponent() {
        assert_eq!(c_exponent(1234.5, 2), "1.23e+03");
        assert_eq!(c_exponent(0.00012, 1), "1.2e-04");
    }
}
