//! Source location tracking for tokens and AST nodes.
//!
//! Every token and source-authored AST node carries a [`Span`]. Nodes built
//! by the rewriting pass reuse the span of the expression they replace, so
//! diagnostics about generated code still point at the original operator.
//!
//! # Examples
//!
//! ```
//! use opov_syntax::span::Span;
//!
//! let left = Span::new(0, 1, 1, 1, 1, 2);
//! let right = Span::new(4, 5, 1, 5, 1, 6);
//! let merged = Span::merge(left, right);
//!
//! assert_eq!(merged.start, 0);
//! assert_eq!(merged.end, 5);
//! ```

use std::fmt;

/// A region of source text, as byte offsets plus 1-indexed line/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the span start (0-indexed)
    pub start: usize,

    /// Byte offset of the span end (exclusive)
    pub end: usize,

    /// Line number of the span start (1-indexed)
    pub start_line: usize,

    /// Column number of the span start (1-indexed, in characters)
    pub start_col: usize,

    /// Line number of the span end (1-indexed)
    pub end_line: usize,

    /// Column number of the span end (1-indexed, in characters)
    pub end_col: usize,
}

impl Span {
    /// Creates a span from offsets and line/column positions.
    #[must_use]
    pub const fn new(
        start: usize,
        end: usize,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            start,
            end,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Creates an empty span at a single position.
    #[must_use]
    pub const fn point(offset: usize, line: usize, col: usize) -> Self {
        Self::new(offset, offset, line, col, line, col)
    }

    /// A span that covers `left` through `right`.
    #[must_use]
    pub const fn merge(left: Span, right: Span) -> Self {
        Self {
            start: left.start,
            end: right.end,
            start_line: left.start_line,
            start_col: left.start_col,
            end_line: right.end_line,
            end_col: right.end_col,
        }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers no text.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// Anything with a source location.
pub trait Spanned {
    /// Returns the node's span.
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let left = Span::new(0, 10, 1, 1, 1, 11);
        let right = Span::new(15, 25, 2, 1, 2, 11);
        let merged = Span::merge(left, right);

        assert_eq!(merged.start, 0);
        assert_eq!(merged.end, 25);
        assert_eq!(merged.start_line, 1);
        assert_eq!(merged.end_line, 2);
        assert_eq!(merged.end_col, 11);
    }

    #[test]
    fn test_span_point_is_empty() {
        let span = Span::point(100, 5, 10);
        assert!(span.is_empty());
        assert_eq!(span.len(), 0);
        assert_eq!(span.start_line, 5);
    }

    #[test]
    fn test_span_len() {
        assert_eq!(Span::new(10, 20, 1, 5, 1, 15).len(), 10);
    }

    #[test]
    fn test_span_display() {
        assert_eq!(format!("{}", Span::new(0, 10, 5, 10, 5, 20)), "5:10");
    }
}
