//! Tag scanning and expansion.
//!
//! A tag is `<open>expression<close>`. The delimiters are matched literally,
//! the expression lazily, so the first closing delimiter ends the tag. Text
//! outside tags is copied through untouched and the output is never
//! scanned a second time.

use regex::Regex;
use stitchwork_expr::Interpreter;
use stitchwork_types::{Environment, Scope, Span};
use thiserror::Error;

/// Error type evaluators report failures with
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("Invalid delimiters: {0}")]
    Config(String),

    #[error("Failed to evaluate `{expression}` at {span:?}: {source}")]
    Evaluation {
        expression: String,
        span: Span,
        #[source]
        source: BoxError,
    },
}

pub type Result<T> = std::result::Result<T, ExpandError>;

/// A tag found in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Byte range of the whole tag, delimiters included
    pub span: Span,
    /// Text between the delimiters
    pub expression: String,
}

/// An opening and closing delimiter pair
#[derive(Debug, Clone)]
pub struct Delimiters {
    open: String,
    close: String,
    pattern: Regex,
}

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self> {
        let open = open.into();
        let close = close.into();
        if open.is_empty() || close.is_empty() {
            return Err(ExpandError::Config(
                "opening and closing delimiters must be non-empty".to_string(),
            ));
        }

        let source = format!("{}(?s:(.+?)){}", regex::escape(&open), regex::escape(&close));
        let pattern = Regex::new(&source).map_err(|e| ExpandError::Config(e.to_string()))?;
        Ok(Self {
            open,
            close,
            pattern,
        })
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }

    /// All tags in `text`, left to right, non-overlapping
    pub fn scan(&self, text: &str) -> Vec<TagMatch> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let inner = caps.get(1)?;
                Some(TagMatch {
                    span: Span::new(whole.start(), whole.end()),
                    expression: inner.as_str().to_string(),
                })
            })
            .collect()
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new("{{", "}}").expect("default delimiters are valid")
    }
}

impl PartialEq for Delimiters {
    fn eq(&self, other: &Self) -> bool {
        self.open == other.open && self.close == other.close
    }
}

impl Eq for Delimiters {}

impl<S: AsRef<str>> TryFrom<&[S]> for Delimiters {
    type Error = ExpandError;

    fn try_from(pair: &[S]) -> Result<Self> {
        match pair {
            [open, close] => Self::new(open.as_ref(), close.as_ref()),
            _ => Err(ExpandError::Config(format!(
                "expected exactly two delimiters, got {}",
                pair.len()
            ))),
        }
    }
}

/// Evaluates the expression inside a tag.
///
/// Returns the output lines; an empty vector renders as nothing. Any
/// `FnMut(&str, &mut Scope) -> Result<Vec<String>, BoxError>` closure is an
/// evaluator.
pub trait Evaluator {
    fn evaluate(
        &mut self,
        code: &str,
        scope: &mut Scope<'_>,
    ) -> std::result::Result<Vec<String>, BoxError>;
}

impl<F> Evaluator for F
where
    F: FnMut(&str, &mut Scope<'_>) -> std::result::Result<Vec<String>, BoxError>,
{
    fn evaluate(
        &mut self,
        code: &str,
        scope: &mut Scope<'_>,
    ) -> std::result::Result<Vec<String>, BoxError> {
        self(code, scope)
    }
}

/// Evaluator backed by the built-in expression language
#[derive(Default)]
pub struct ExprEvaluator {
    interpreter: Interpreter,
}

impl ExprEvaluator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Evaluator for ExprEvaluator {
    fn evaluate(
        &mut self,
        code: &str,
        scope: &mut Scope<'_>,
    ) -> std::result::Result<Vec<String>, BoxError> {
        let evaluation = self.interpreter.eval_source(code, scope)?;
        Ok(evaluation.lines())
    }
}

/// Replace every tag in `text` with its evaluated output.
///
/// Tags are evaluated in order against one scope, so an assignment in one
/// tag is seen by every later tag. Text without tags comes back unchanged
/// and the evaluator is never called.
pub fn expand<E>(
    text: &str,
    delimiters: &Delimiters,
    evaluator: &mut E,
    scope: &mut Scope<'_>,
) -> Result<String>
where
    E: Evaluator + ?Sized,
{
    let tags = delimiters.scan(text);
    if tags.is_empty() {
        return Ok(text.to_string());
    }
    tracing::debug!("Expanding {} tag(s)", tags.len());

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for tag in &tags {
        out.push_str(&text[cursor..tag.span.start]);
        let lines = evaluator
            .evaluate(&tag.expression, scope)
            .map_err(|source| ExpandError::Evaluation {
                expression: tag.expression.clone(),
                span: tag.span,
                source,
            })?;
        out.push_str(&lines.join("\n"));
        cursor = tag.span.end;
    }
    out.push_str(&text[cursor..]);

    Ok(out)
}

/// Expand with the built-in evaluator, starting from `explicit` and falling
/// back to `ambient` for names it does not define
pub fn expand_with_env(
    text: &str,
    delimiters: &Delimiters,
    explicit: Environment,
    ambient: Option<&Environment>,
) -> Result<String> {
    let mut scope = match ambient {
        Some(ambient) => Scope::with_ambient(explicit, ambient),
        None => Scope::new(explicit),
    };
    expand(text, delimiters, &mut ExprEvaluator::new(), &mut scope)
}

/// Delimiters and an evaluator bundled for repeated expansion
pub struct Expander<E = ExprEvaluator> {
    delimiters: Delimiters,
    evaluator: E,
}

impl Expander<ExprEvaluator> {
    pub fn new(delimiters: Delimiters) -> Self {
        Self::with_evaluator(delimiters, ExprEvaluator::new())
    }
}

impl Default for Expander<ExprEvaluator> {
    fn default() -> Self {
        Self::new(Delimiters::default())
    }
}

impl<E: Evaluator> Expander<E> {
    pub fn with_evaluator(delimiters: Delimiters, evaluator: E) -> Self {
        Self {
            delimiters,
            evaluator,
        }
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn expand(&mut self, text: &str, scope: &mut Scope<'_>) -> Result<String> {
        expand(text, &self.delimiters, &mut self.evaluator, scope)
    }
}
