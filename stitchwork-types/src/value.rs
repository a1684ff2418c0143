//! Vector values produced by tag expressions.
//!
//! Every value is a vector; a scalar is simply a vector of length one. This
//! keeps `c(1, 2, 3)` and `1` on the same footing when they are rendered
//! back into text, one element per line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value bound in a scope or produced by an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawValue", into = "RawValue")]
pub enum Value {
    Null,
    Logical(Vec<bool>),
    Number(Vec<f64>),
    Text(Vec<String>),
}

impl Value {
    pub fn number(n: f64) -> Self {
        Value::Number(vec![n])
    }

    pub fn logical(b: bool) -> Self {
        Value::Logical(vec![b])
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(vec![s.into()])
    }

    /// Infer a value from a command-line style literal.
    ///
    /// `TRUE`/`FALSE` become logicals, anything that parses as a number
    /// becomes a number, everything else is kept as text.
    pub fn infer(raw: &str) -> Self {
        match raw {
            "TRUE" | "true" => return Value::logical(true),
            "FALSE" | "false" => return Value::logical(false),
            "NULL" => return Value::Null,
            _ => {}
        }
        match raw.trim().parse::<f64>() {
            Ok(n) if !raw.trim().is_empty() => Value::number(n),
            _ => Value::text(raw),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::Logical(v) => v.len(),
            Value::Number(v) => v.len(),
            Value::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Logical(_) => "logical",
            Value::Number(_) => "numeric",
            Value::Text(_) => "character",
        }
    }

    /// Numeric view of the value; logicals coerce to 1/0, text does not coerce
    pub fn as_numbers(&self) -> Option<Vec<f64>> {
        match self {
            Value::Null => Some(Vec::new()),
            Value::Logical(v) => Some(v.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect()),
            Value::Number(v) => Some(v.clone()),
            Value::Text(_) => None,
        }
    }

    /// Logical view of the value; numbers are true when non-zero
    pub fn as_logicals(&self) -> Option<Vec<bool>> {
        match self {
            Value::Null => Some(Vec::new()),
            Value::Logical(v) => Some(v.clone()),
            Value::Number(v) => Some(v.iter().map(|&n| n != 0.0).collect()),
            Value::Text(v) => v
                .iter()
                .map(|s| match s.as_str() {
                    "TRUE" | "true" | "T" => Some(true),
                    "FALSE" | "false" | "F" => Some(false),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Textual representation, one string per element
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            Value::Null => Vec::new(),
            Value::Logical(v) => v
                .iter()
                .map(|&b| if b { "TRUE" } else { "FALSE" }.to_string())
                .collect(),
            Value::Number(v) => v.iter().map(|&n| format_number(n)).collect(),
            Value::Text(v) => v.clone(),
        }
    }

    /// Render the value as text with elements on separate lines
    pub fn render(&self) -> String {
        self.to_strings().join("\n")
    }

    /// The first element as a string, if there is one
    pub fn first_string(&self) -> Option<String> {
        self.to_strings().into_iter().next()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::logical(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::text(s)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Number(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::Text(v)
    }
}

/// Format a number the way tag output shows it.
///
/// Whole numbers below 1e15 print without a fractional part. Other finite
/// numbers keep 15 significant digits and use whichever of fixed or
/// scientific notation is shorter, preferring fixed on a tie.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    if n == n.trunc() && n.abs() < 1e15 {
        // `as i64` also folds -0 into 0
        return format!("{}", n as i64);
    }

    let fixed = fixed_notation(n);
    let sci = scientific_notation(n);
    if fixed.len() <= sci.len() {
        fixed
    } else {
        sci
    }
}

fn fixed_notation(n: f64) -> String {
    let magnitude = n.abs().log10().floor() as i32;
    let decimals = (14 - magnitude).clamp(0, 300) as usize;
    trim_fraction(&format!("{:.*}", decimals, n))
}

fn scientific_notation(n: f64) -> String {
    let raw = format!("{:.14e}", n);
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
}

fn trim_fraction(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

/// Serde shape for values read from configuration files
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Null,
    Logical(bool),
    Number(f64),
    Text(String),
    Logicals(Vec<bool>),
    Numbers(Vec<f64>),
    Texts(Vec<String>),
}

impl From<RawValue> for Value {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Null => Value::Null,
            RawValue::Logical(b) => Value::logical(b),
            RawValue::Number(n) => Value::number(n),
            RawValue::Text(s) => Value::text(s),
            RawValue::Logicals(v) => Value::Logical(v),
            RawValue::Numbers(v) => Value::Number(v),
            RawValue::Texts(v) => Value::Text(v),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Logical(mut v) if v.len() == 1 => RawValue::Logical(v.remove(0)),
            Value::Number(mut v) if v.len() == 1 => RawValue::Number(v.remove(0)),
            Value::Text(mut v) if v.len() == 1 => RawValue::Text(v.remove(0)),
            Value::Logical(v) => RawValue::Logicals(v),
            Value::Number(v) => RawValue::Numbers(v),
            Value::Text(v) => RawValue::Texts(v),
        }
    }
}
