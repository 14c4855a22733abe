//! Diagnostic reporting with source highlighting.
//!
//! The [`Emitter`] renders a [`Diagnostic`] into a string: a
//! `line:col: level: message` header, the offending source lines, and a
//! caret underline. The CLI writes the rendered text to stderr.

use crate::error::SyntaxError;
use crate::span::{Span, Spanned};
use std::fmt::{self, Write as _};

/// A diagnostic message (error, warning, note, or help).
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Diagnostic level
    pub level: DiagnosticLevel,
    /// Primary message
    pub message: String,
    /// Source span
    pub span: Span,
    /// Optional suggestions
    pub suggestions: Vec<String>,
    /// Related notes
    pub notes: Vec<DiagnosticNote>,
}

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// Error: processing cannot continue
    Error,
    /// Warning: suspicious input but processing continues
    Warning,
    /// Note: additional information
    Note,
    /// Help: suggestion for fixing the issue
    Help,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Note => write!(f, "note"),
            Self::Help => write!(f, "help"),
        }
    }
}

impl DiagnosticLevel {
    /// Returns the ANSI color code for this level.
    #[must_use]
    pub const fn color_code(&self) -> &'static str {
        match self {
            Self::Error => "\x1b[31m",
            Self::Warning => "\x1b[33m",
            Self::Note => "\x1b[36m",
            Self::Help => "\x1b[32m",
        }
    }

    /// Returns the reset ANSI code.
    #[must_use]
    pub const fn reset_code() -> &'static str {
        "\x1b[0m"
    }

    /// Formats this level with colors if enabled.
    #[must_use]
    pub fn format_colored(&self, use_colors: bool) -> String {
        if use_colors {
            format!("{}{}{}", self.color_code(), self, Self::reset_code())
        } else {
            self.to_string()
        }
    }
}

/// A note attached to a diagnostic.
#[derive(Debug, Clone)]
pub struct DiagnosticNote {
    /// Note message
    pub message: String,
    /// Source span
    pub span: Span,
}

/// Builder for creating diagnostics.
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    /// Creates a new diagnostic builder.
    #[must_use]
    pub fn new(level: DiagnosticLevel, message: impl Into<String>, span: Span) -> Self {
        Self {
            diagnostic: Diagnostic {
                level,
                message: message.into(),
                span,
                suggestions: Vec::new(),
                notes: Vec::new(),
            },
        }
    }

    /// Adds a suggestion to the diagnostic.
    #[must_use]
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.diagnostic.suggestions.push(suggestion.into());
        self
    }

    /// Adds a note to the diagnostic.
    #[must_use]
    pub fn note(mut self, message: impl Into<String>, span: Span) -> Self {
        self.diagnostic.notes.push(DiagnosticNote {
            message: message.into(),
            span,
        });
        self
    }

    /// Builds the diagnostic.
    #[must_use]
    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}

/// Renders diagnostics with source highlighting.
#[derive(Debug, Clone, Copy)]
pub struct Emitter {
    use_colors: bool,
}

impl Emitter {
    /// Creates a new diagnostic emitter.
    #[must_use]
    pub const fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Renders a diagnostic against `source`.
    #[must_use]
    pub fn render(&self, diagnostic: &Diagnostic, source: &str) -> String {
        let mut out = String::new();
        let span = diagnostic.span;

        let level_str = diagnostic.level.format_colored(self.use_colors);
        let _ = writeln!(
            out,
            "{}:{}: {}: {}",
            span.start_line, span.start_col, level_str, diagnostic.message
        );

        self.render_source_highlight(&mut out, diagnostic.level, span, source);

        for suggestion in &diagnostic.suggestions {
            let help_prefix = DiagnosticLevel::Help.format_colored(self.use_colors);
            let _ = writeln!(out, "   {help_prefix}: {suggestion}");
        }

        for note in &diagnostic.notes {
            let note_prefix = DiagnosticLevel::Note.format_colored(self.use_colors);
            let _ = writeln!(
                out,
                "   {} at {}:{}: {}",
                note_prefix, note.span.start_line, note.span.start_col, note.message
            );
        }

        out
    }

    fn render_source_highlight(
        &self,
        out: &mut String,
        level: DiagnosticLevel,
        span: Span,
        source: &str,
    ) {
        let lines: Vec<&str> = source.lines().collect();
        if lines.is_empty() {
            return;
        }

        let start_line = span.start_line.saturating_sub(1).min(lines.len() - 1);
        let end_line = span.end_line.saturating_sub(1).min(lines.len() - 1);

        for (line_idx, line) in lines.iter().enumerate().take(end_line + 1).skip(start_line) {
            let _ = writeln!(out, "{:4} | {line}", line_idx + 1);

            let line_start = if line_idx == start_line { span.start_col } else { 1 };
            let line_end = if line_idx == end_line {
                span.end_col
            } else {
                line.chars().count() + 1
            };

            // Point spans still get a single caret.
            let width = line_end.saturating_sub(line_start).max(1);
            let indent = " ".repeat(line_start.saturating_sub(1));
            let carets = "^".repeat(width);

            if self.use_colors {
                let _ = writeln!(
                    out,
                    "     | {indent}{}{carets}{}",
                    level.color_code(),
                    DiagnosticLevel::reset_code()
                );
            } else {
                let _ = writeln!(out, "     | {indent}{carets}");
            }
        }
    }

    /// Renders a syntax error as an error diagnostic.
    #[must_use]
    pub fn render_syntax_error(&self, error: &SyntaxError, source: &str) -> String {
        let message = match error {
            SyntaxError::Lexer(err) => err.to_string(),
            SyntaxError::Parser(err) => err.to_string(),
        };
        let diagnostic = DiagnosticBuilder::new(DiagnosticLevel::Error, message, error.span())
            .build();
        self.render(&diagnostic, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParserError;

    #[test]
    fn test_diagnostic_level_display() {
        assert_eq!(format!("{}", DiagnosticLevel::Error), "error");
        assert_eq!(format!("{}", DiagnosticLevel::Warning), "warning");
        assert_eq!(format!("{}", DiagnosticLevel::Help), "help");
    }

    #[test]
    fn test_diagnostic_level_colors() {
        assert_eq!(DiagnosticLevel::Error.format_colored(false), "error");

        let colored = DiagnosticLevel::Error.format_colored(true);
        assert!(colored.contains("\x1b[31m"));
        assert!(colored.contains("error"));
    }

    #[test]
    fn test_render_highlights_span() {
        let emitter = Emitter::new(false);
        let source = "let x = 42;";
        let diagnostic = DiagnosticBuilder::new(
            DiagnosticLevel::Error,
            "unexpected identifier",
            Span::new(4, 5, 1, 5, 1, 6),
        )
        .build();

        let rendered = emitter.render(&diagnostic, source);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "1:5: error: unexpected identifier");
        assert_eq!(lines[1], "   1 | let x = 42;");
        assert_eq!(lines[2], "     |     ^");
    }

    #[test]
    fn test_render_syntax_error() {
        let emitter = Emitter::new(false);
        let error = SyntaxError::Parser(ParserError::ExpectedExpression {
            span: Span::point(8, 1, 9),
        });

        let rendered = emitter.render_syntax_error(&error, "let x = ;");
        assert!(rendered.starts_with("1:9: error: expected expression"));
        assert!(rendered.contains("^"));
    }

    #[test]
    fn test_render_with_notes_and_suggestions() {
        let diagnostic = DiagnosticBuilder::new(
            DiagnosticLevel::Warning,
            "directive has no effect",
            Span::new(0, 5, 1, 1, 1, 6),
        )
        .suggest("use 'enabled' or 'disabled'")
        .note("directive found here", Span::point(0, 1, 1))
        .build();

        let rendered = Emitter::new(false).render(&diagnostic, "'x';");
        assert!(rendered.contains("help: use 'enabled' or 'disabled'"));
        assert!(rendered.contains("note at 1:1: directive found here"));
    }

    #[test]
    fn test_render_empty_source() {
        let diagnostic =
            DiagnosticBuilder::new(DiagnosticLevel::Error, "empty", Span::default()).build();
        let rendered = Emitter::new(false).render(&diagnostic, "");
        assert_eq!(rendered.lines().count(), 1);
    }
}
