use std::fmt;

pub use stitchwork_types::Span;

/// Errors that can occur while lexing, parsing, or evaluating an expression
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error("Lexer error at {span:?}: {message}")]
    LexerError { span: Span, message: String },

    #[error("Parser error at {span:?}: {message}")]
    ParserError { span: Span, message: String },

    #[error("Unbound identifier at {span:?}: {name}")]
    UnboundIdentifier { span: Span, name: String },

    #[error("Unknown function at {span:?}: {name}")]
    UnknownFunction { span: Span, name: String },

    #[error("Arity mismatch at {span:?}: {name} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        span: Span,
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("Type error at {span:?}: {message}")]
    TypeError { span: Span, message: String },

    #[error("Evaluation error at {span:?}: {message}")]
    EvaluationError { span: Span, message: String },
}

impl ExprError {
    pub fn span(&self) -> Span {
        match self {
            ExprError::LexerError { span, .. } => *span,
            ExprError::ParserError { span, .. } => *span,
            ExprError::UnboundIdentifier { span, .. } => *span,
            ExprError::UnknownFunction { span, .. } => *span,
            ExprError::ArityMismatch { span, .. } => *span,
            ExprError::TypeError { span, .. } => *span,
            ExprError::EvaluationError { span, .. } => *span,
        }
    }

    pub(crate) fn type_error(span: Span, message: impl Into<String>) -> Self {
        ExprError::TypeError {
            span,
            message: message.into(),
        }
    }

    pub(crate) fn eval(span: Span, message: impl Into<String>) -> Self {
        ExprError::EvaluationError {
            span,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExprError>;

/// Display context for better error messages
pub struct ErrorContext<'a> {
    pub source: &'a str,
    pub error: &'a ExprError,
}

impl<'a> ErrorContext<'a> {
    pub fn new(source: &'a str, error: &'a ExprError) -> Self {
        Self { source, error }
    }

    /// Get the source line containing the error
    pub fn source_line(&self) -> Option<&'a str> {
        let start = self.clamped_start();

        let line_start = self.source[..start]
            .rfind('\n')
            .map(|pos| pos + 1)
            .unwrap_or(0);

        let line_end = self.source[start..]
            .find('\n')
            .map(|pos| start + pos)
            .unwrap_or(self.source.len());

        Some(&self.source[line_start..line_end])
    }

    /// Get line and column numbers (1-indexed)
    pub fn line_col(&self) -> (usize, usize) {
        let start = self.clamped_start();

        let line = self.source[..start].matches('\n').count() + 1;
        let line_start = self.source[..start]
            .rfind('\n')
            .map(|pos| pos + 1)
            .unwrap_or(0);
        let col = start - line_start + 1;

        (line, col)
    }

    fn clamped_start(&self) -> usize {
        let mut start = self.error.span().start.min(self.source.len());
        while !self.source.is_char_boundary(start) {
            start -= 1;
        }
        start
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, col) = self.line_col();
        writeln!(f, "Error at line {}, column {}:", line, col)?;
        writeln!(f, "  {}", self.error)?;

        if let Some(source_line) = self.source_line() {
            writeln!(f)?;
            writeln!(f, "  {}", source_line)?;
            let col_start = col - 1;
            let width = self
                .error
                .span()
                .len()
                .min(source_line.len().saturating_sub(col_start))
                .max(1);
            writeln!(f, "  {}{}", " ".repeat(col_start), "^".repeat(width))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_second_line() {
        let source = "x <- 1\ny + 2";
        let error = ExprError::UnboundIdentifier {
            span: Span::new(7, 8),
            name: "y".into(),
        };
        let ctx = ErrorContext::new(source, &error);
        assert_eq!(ctx.line_col(), (2, 1));
        assert_eq!(ctx.source_line(), Some("y + 2"));
    }

    #[test]
    fn test_display_points_at_span() {
        let source = "1 + foo";
        let error = ExprError::UnboundIdentifier {
            span: Span::new(4, 7),
            name: "foo".into(),
        };
        let rendered = ErrorContext::new(source, &error).to_string();
        assert!(rendered.starts_with("Error at line 1, column 5:"));
        assert!(rendered.contains("      ^^^"));
    }
}
