//! # Stitchwork expression language
//!
//! The small language evaluated inside template tags. It is vector based:
//! every value is a vector, scalars are vectors of length one, and a tag
//! renders its result one element per line.
//!
//! - `<-`, `=` and `->` assign into the explicit scope and render nothing
//! - arithmetic and comparison operate element-wise with recycling
//! - `;` and newlines separate statements; the last one is the tag's value
//! - a fixed library of native functions (`paste`, `sprintf`, `seq`, ...)
//!
//! ## Example
//!
//! ```
//! use stitchwork_expr::evaluate;
//! use stitchwork_types::{Environment, Scope};
//!
//! let mut scope = Scope::new(Environment::new().with("i", 0.0));
//! assert!(evaluate("i <- i + 1", &mut scope).unwrap().lines().is_empty());
//! assert_eq!(evaluate("paste0('n', i)", &mut scope).unwrap().lines(), vec!["n1"]);
//! ```

pub mod ast;
pub mod builtins;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;

#[cfg(test)]
mod tests;

pub use ast::{Arg, BinOp, Expr, Literal, Program, UnOp};
pub use builtins::{Builtins, CallArgs, Handler, NativeFunction, Params};
pub use error::{ErrorContext, ExprError, Result};
pub use interpreter::{Evaluation, Interpreter};
pub use lexer::{tokenize, SpannedToken, Token};
pub use parser::parse;

pub use stitchwork_types::{Environment, Scope, Span, Value};

/// Parse `source` into a program
pub fn parse_source(source: &str) -> Result<Program> {
    let tokens = tokenize(source)?;
    parse(&tokens)
}

/// Evaluate `source` against `scope` with the standard builtins
pub fn evaluate(source: &str, scope: &mut Scope<'_>) -> Result<Evaluation> {
    Interpreter::new().eval_source(source, scope)
}
