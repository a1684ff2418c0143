//! Shared types for stitchwork
//!
//! This crate provides the types shared by the expression language and the
//! expansion core: source spans, vector values, and the two-level variable
//! scope that tag expressions are evaluated against.

pub mod scope;
pub mod value;

use serde::{Deserialize, Serialize};

pub use scope::{Environment, Scope};
pub use value::{format_number, Value};

/// Byte range in a source string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Move the span right by `offset` bytes
    pub fn shift(self, offset: usize) -> Span {
        Span::new(self.start + offset, self.end + offset)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let a = Span::new(2, 5);
        let b = Span::new(4, 9);
        assert_eq!(a.merge(b), Span::new(2, 9));
        assert_eq!(b.merge(a), Span::new(2, 9));
    }

    #[test]
    fn test_span_shift_and_len() {
        let span = Span::new(1, 4).shift(10);
        assert_eq!(span, Span::new(11, 14));
        assert_eq!(span.len(), 3);
        assert!(Span::new(3, 3).is_empty());
    }
}
