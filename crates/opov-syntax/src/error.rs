//! Error types for the lexer and parser.
//!
//! Lexer errors occur during tokenization, parser errors during syntactic
//! analysis. Both carry the [`Span`] the diagnostic emitter highlights.

use crate::span::{Span, Spanned};
use std::fmt;

/// Errors that can occur during lexical analysis (tokenization).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    /// Unknown character encountered in source.
    ///
    /// ```text
    /// let x = @;
    ///         ^
    /// error: unknown character '@'
    /// ```
    UnknownChar {
        /// The unexpected character
        ch: char,

        /// Location in source
        span: Span,
    },

    /// Unterminated string literal.
    ///
    /// ```text
    /// let msg = "hello
    ///           ^
    /// error: unterminated string literal
    /// ```
    UnterminatedString {
        /// Location where the string started
        start: Span,
    },

    /// Invalid numeric literal.
    ///
    /// ```text
    /// let x = 0x;
    ///         ^^
    /// error: invalid numeric literal '0x'
    /// ```
    InvalidNumeric {
        /// The invalid literal text
        literal: String,

        /// Location in source
        span: Span,
    },

    /// Unterminated block comment.
    UnterminatedComment {
        /// Location where the comment started
        start: Span,
    },

    /// Malformed escape sequence inside a string literal.
    InvalidEscape {
        /// The escape text after the backslash
        sequence: String,

        /// Location in source
        span: Span,
    },
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChar { ch, .. } => write!(f, "unknown character '{ch}'"),
            Self::UnterminatedString { .. } => write!(f, "unterminated string literal"),
            Self::InvalidNumeric { literal, .. } => {
                write!(f, "invalid numeric literal '{literal}'")
            }
            Self::UnterminatedComment { .. } => write!(f, "unterminated block comment"),
            Self::InvalidEscape { sequence, .. } => {
                write!(f, "invalid escape sequence '\\{sequence}'")
            }
        }
    }
}

impl std::error::Error for LexerError {}

impl Spanned for LexerError {
    fn span(&self) -> Span {
        match self {
            Self::UnknownChar { span, .. }
            | Self::InvalidNumeric { span, .. }
            | Self::InvalidEscape { span, .. } => *span,
            Self::UnterminatedString { start } | Self::UnterminatedComment { start } => *start,
        }
    }
}

/// Errors that can occur during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// Unexpected token encountered.
    ///
    /// ```text
    /// let = 42;
    ///     ^
    /// error: expected identifier, found '='
    /// ```
    UnexpectedToken {
        /// List of expected token kinds
        expected: Vec<String>,

        /// The actual token kind found
        found: String,

        /// Location in source
        span: Span,
    },

    /// Expected expression but found another token.
    ExpectedExpression {
        /// Location in source
        span: Span,
    },

    /// The left side of an assignment or the operand of `++`/`--` is not
    /// an identifier or member expression.
    ///
    /// ```text
    /// a + b = c;
    /// ^^^^^
    /// error: invalid assignment target
    /// ```
    InvalidAssignmentTarget {
        /// Location of the offending target
        span: Span,
    },

    /// Missing delimiter.
    MissingDelimiter {
        /// The delimiter that was expected (e.g., "}", ")", "]")
        delimiter: String,

        /// Location in source
        span: Span,
    },

    /// A unary operator applied directly to the base of `**`.
    ///
    /// ```text
    /// -x ** 2;
    /// ^^
    /// error: unary operator before '**' needs parentheses
    /// ```
    UnaryBeforeExponent {
        /// The unary expression
        span: Span,
    },

    /// Statements or expressions nest deeper than the parser allows.
    NestingTooDeep {
        /// The configured limit
        limit: usize,

        /// Where the limit was reached
        span: Span,
    },
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                expected, found, ..
            } => {
                write!(f, "expected ")?;
                if expected.len() == 1 {
                    write!(f, "{}", expected[0])?;
                } else {
                    write!(f, "one of: {}", expected.join(", "))?;
                }
                write!(f, ", found {found}")
            }
            Self::ExpectedExpression { .. } => write!(f, "expected expression"),
            Self::InvalidAssignmentTarget { .. } => write!(f, "invalid assignment target"),
            Self::MissingDelimiter { delimiter, .. } => {
                write!(f, "missing closing delimiter '{delimiter}'")
            }
            Self::UnaryBeforeExponent { .. } => {
                write!(f, "unary operator before '**' needs parentheses")
            }
            Self::NestingTooDeep { limit, .. } => {
                write!(f, "nesting exceeds the limit of {limit} levels")
            }
        }
    }
}

impl std::error::Error for ParserError {}

impl Spanned for ParserError {
    fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::ExpectedExpression { span }
            | Self::InvalidAssignmentTarget { span }
            | Self::MissingDelimiter { span, .. }
            | Self::UnaryBeforeExponent { span }
            | Self::NestingTooDeep { span, .. } => *span,
        }
    }
}

/// Combined syntax error for the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// Lexer error
    Lexer(LexerError),

    /// Parser error
    Parser(ParserError),
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexer(err) => write!(f, "lexer error: {err}"),
            Self::Parser(err) => write!(f, "parser error: {err}"),
        }
    }
}

impl std::error::Error for SyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lexer(err) => Some(err),
            Self::Parser(err) => Some(err),
        }
    }
}

impl Spanned for SyntaxError {
    fn span(&self) -> Span {
        match self {
            Self::Lexer(err) => err.span(),
            Self::Parser(err) => err.span(),
        }
    }
}

impl From<LexerError> for SyntaxError {
    fn from(err: LexerError) -> Self {
        Self::Lexer(err)
    }
}

impl From<ParserError> for SyntaxError {
    fn from(err: ParserError) -> Self {
        Self::Parser(err)
    }
}

/// Result type for lexer operations.
pub type LexerResult<T> = Result<T, LexerError>;

/// Result type for parser operations.
pub type ParserResult<T> = Result<T, ParserError>;

/// Result type for syntax operations (lexer or parser).
pub type SyntaxResult<T> = Result<T, SyntaxError>;
