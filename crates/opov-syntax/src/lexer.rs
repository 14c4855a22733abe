//! Lexical analysis (tokenization) for the JavaScript subset.
//!
//! The lexer turns source text into a flat token stream, interning every
//! identifier and string literal value into the unit's [`StringInterner`].
//! It handles:
//!
//! - Keywords and identifiers (`$` and `_` included)
//! - Numeric literals (decimal, fraction, exponent, `0x`, `0o`, `0b`)
//! - Single- and double-quoted strings with escape sequences
//! - Line and block comments
//! - The full punctuator set, longest match first (`>>>=` before `>>>`)
//!
//! Each token records whether a line terminator preceded it.
//!
//! # Examples
//!
//! ```
//! use opov_syntax::lexer::Lexer;
//!
//! let tokens = Lexer::new("a += 1").lex().unwrap();
//! assert_eq!(tokens.len(), 4); // a, +=, 1, EOF
//! ```

use crate::error::{LexerError, LexerResult};
use crate::keywords;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use opov_mem::StringInterner;
use std::iter::Peekable;
use std::str::Chars;

/// Lexical analyzer for JavaScript-subset source code.
pub struct Lexer<'input> {
    /// The source code being tokenized
    input: &'input str,

    /// Character iterator with lookahead
    chars: Peekable<Chars<'input>>,

    /// Current byte offset in the source
    position: usize,

    /// Current line number (1-indexed)
    line: usize,

    /// Current column number in characters (1-indexed)
    column: usize,

    /// Whether a line terminator was skipped since the last token
    newline_pending: bool,

    /// Accumulated tokens
    tokens: Vec<Token>,

    /// Accumulated errors
    errors: Vec<LexerError>,

    /// String interner for identifiers and string literal values
    interner: StringInterner,
}

impl<'input> Lexer<'input> {
    /// Creates a new lexer whose interner has the keywords pre-interned.
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        Self::with_interner(input, StringInterner::with_pre_interned(keywords::KEYWORDS))
    }

    /// Creates a lexer that interns into an existing interner.
    #[must_use]
    pub fn with_interner(input: &'input str, interner: StringInterner) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
            line: 1,
            column: 1,
            newline_pending: false,
            tokens: Vec::new(),
            errors: Vec::new(),
            interner,
        }
    }

    /// Tokenizes the entire source code.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexerError`] encountered. The lexer keeps going
    /// after an error so later errors do not mask earlier ones, but only the
    /// first is reported.
    pub fn lex(self) -> LexerResult<Vec<Token>> {
        self.lex_with_interner().map(|(tokens, _)| tokens)
    }

    /// Tokenizes the source and returns the tokens together with the
    /// interner that resolves their symbols.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexerError`] encountered.
    pub fn lex_with_interner(mut self) -> LexerResult<(Vec<Token>, StringInterner)> {
        loop {
            if let Err(err) = self.skip_trivia() {
                self.errors.push(err);
                break;
            }
            if self.peek().is_none() {
                break;
            }

            match self.next_token() {
                Ok(token) => self.tokens.push(token),
                Err(err) => {
                    self.errors.push(err);
                    self.recover();
                }
            }
        }

        let mut eof = Token::new(
            TokenKind::EOF,
            Span::point(self.position, self.line, self.column),
        );
        eof.newline_before = self.newline_pending;
        self.tokens.push(eof);

        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok((self.tokens, self.interner)),
        }
    }

    /// Returns a reference to the string interner.
    #[must_use]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek2(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consumes `expected` if it is the next character.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn here(&self) -> Span {
        Span::point(self.position, self.line, self.column)
    }

    fn span_from(&self, start: usize, start_line: usize, start_col: usize) -> Span {
        Span::new(start, self.position, start_line, start_col, self.line, self.column)
    }

    /// Skips whitespace and comments, noting line terminators.
    fn skip_trivia(&mut self) -> LexerResult<()> {
        while let Some(ch) = self.peek() {
            match ch {
                '\n' | '\u{2028}' | '\u{2029}' => {
                    self.newline_pending = true;
                    self.bump();
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek2() == Some('/') => self.skip_line_comment(),
                '/' if self.peek2() == Some('*') => self.skip_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> LexerResult<()> {
        let start = self.here();
        self.bump();
        self.bump();

        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some('\n') => self.newline_pending = true,
                Some(_) => {}
                None => return Err(LexerError::UnterminatedComment { start }),
            }
        }
    }

    /// Reads the next token from the source.
    #[allow(clippy::too_many_lines)]
    fn next_token(&mut self) -> LexerResult<Token> {
        let start = self.position;
        let start_line = self.line;
        let start_col = self.column;

        let Some(ch) = self.peek() else {
            return Err(LexerError::UnknownChar {
                ch: '\0',
                span: self.here(),
            });
        };

        let kind = match ch {
            c if is_ident_start(c) => self.read_identifier(),
            '0'..='9' => self.read_number()?,
            '.' if self.peek2().is_some_and(|c| c.is_ascii_digit()) => self.read_number()?,
            '"' | '\'' => self.read_string(ch)?,

            '+' => {
                self.bump();
                if self.eat('+') {
                    TokenKind::PlusPlus
                } else if self.eat('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                self.bump();
                if self.eat('-') {
                    TokenKind::MinusMinus
                } else if self.eat('=') {
                    TokenKind::MinusEq
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                self.bump();
                if self.eat('*') {
                    if self.eat('=') {
                        TokenKind::StarStarEq
                    } else {
                        TokenKind::StarStar
                    }
                } else if self.eat('=') {
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                self.bump();
                if self.eat('=') {
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                self.bump();
                if self.eat('=') {
                    TokenKind::PercentEq
                } else {
                    TokenKind::Percent
                }
            }
            '=' => {
                self.bump();
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::EqEqEq
                    } else {
                        TokenKind::EqEq
                    }
                } else if self.eat('>') {
                    TokenKind::FatArrow
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                self.bump();
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::BangEqEq
                    } else {
                        TokenKind::BangEq
                    }
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                self.bump();
                if self.eat('<') {
                    if self.eat('=') {
                        TokenKind::ShlEq
                    } else {
                        TokenKind::Shl
                    }
                } else if self.eat('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                self.bump();
                if self.eat('>') {
                    if self.eat('>') {
                        if self.eat('=') {
                            TokenKind::UShrEq
                        } else {
                            TokenKind::UShr
                        }
                    } else if self.eat('=') {
                        TokenKind::ShrEq
                    } else {
                        TokenKind::Shr
                    }
                } else if self.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                self.bump();
                if self.eat('&') {
                    if self.eat('=') {
                        TokenKind::AmpAmpEq
                    } else {
                        TokenKind::AmpAmp
                    }
                } else if self.eat('=') {
                    TokenKind::AmpEq
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                self.bump();
                if self.eat('|') {
                    if self.eat('=') {
                        TokenKind::PipePipeEq
                    } else {
                        TokenKind::PipePipe
                    }
                } else if self.eat('=') {
                    TokenKind::PipeEq
                } else {
                    TokenKind::Pipe
                }
            }
            '^' => {
                self.bump();
                if self.eat('=') {
                    TokenKind::CaretEq
                } else {
                    TokenKind::Caret
                }
            }
            '?' => {
                self.bump();
                if self.eat('?') {
                    if self.eat('=') {
                        TokenKind::QuestionQuestionEq
                    } else {
                        TokenKind::QuestionQuestion
                    }
                } else {
                    TokenKind::Question
                }
            }
            '~' => {
                self.bump();
                TokenKind::Tilde
            }
            '(' => {
                self.bump();
                TokenKind::LParen
            }
            ')' => {
                self.bump();
                TokenKind::RParen
            }
            '{' => {
                self.bump();
                TokenKind::LBrace
            }
            '}' => {
                self.bump();
                TokenKind::RBrace
            }
            '[' => {
                self.bump();
                TokenKind::LBracket
            }
            ']' => {
                self.bump();
                TokenKind::RBracket
            }
            '.' => {
                self.bump();
                TokenKind::Dot
            }
            ',' => {
                self.bump();
                TokenKind::Comma
            }
            ';' => {
                self.bump();
                TokenKind::Semicolon
            }
            ':' => {
                self.bump();
                TokenKind::Colon
            }
            _ => {
                self.bump();
                return Err(LexerError::UnknownChar {
                    ch,
                    span: self.span_from(start, start_line, start_col),
                });
            }
        };

        let token = Token {
            kind,
            span: self.span_from(start, start_line, start_col),
            newline_before: self.newline_pending,
        };
        self.newline_pending = false;
        Ok(token)
    }

    fn read_identifier(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if is_ident_continue(ch) {
                self.bump();
            } else {
                break;
            }
        }

        let text = &self.input[start..self.position];
        keywords::lookup(text).unwrap_or_else(|| TokenKind::Ident(self.interner.intern(text)))
    }

    fn read_number(&mut self) -> LexerResult<TokenKind> {
        let start = self.position;
        let start_line = self.line;
        let start_col = self.column;

        let radix = match (self.peek(), self.peek2()) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        let mut valid = true;
        if let Some(radix) = radix {
            self.bump();
            self.bump();
            valid &= self.read_digits(radix) > 0;
        } else {
            self.read_digits(10);
            if self.peek() == Some('.') {
                self.bump();
                self.read_digits(10);
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                valid &= self.read_digits(10) > 0;
            }
        }

        // `3in` and `0x1g` are one bad literal, not a number and a name.
        while let Some(ch) = self.peek() {
            if is_ident_continue(ch) {
                valid = false;
                self.bump();
            } else {
                break;
            }
        }

        let text = &self.input[start..self.position];
        if !valid {
            return Err(LexerError::InvalidNumeric {
                literal: text.to_string(),
                span: self.span_from(start, start_line, start_col),
            });
        }
        Ok(TokenKind::NumberLiteral(self.interner.intern(text)))
    }

    /// Consumes digits of `radix` (with `_` separators) and returns how many
    /// digits were read.
    fn read_digits(&mut self, radix: u32) -> usize {
        let mut count = 0;
        while let Some(ch) = self.peek() {
            if ch.is_digit(radix) {
                count += 1;
                self.bump();
            } else if ch == '_' && self.peek2().is_some_and(|c| c.is_digit(radix)) {
                self.bump();
            } else {
                break;
            }
        }
        count
    }

    fn read_string(&mut self, quote: char) -> LexerResult<TokenKind> {
        let start = self.here();
        self.bump();

        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(LexerError::UnterminatedString { start }),
                Some(ch) if ch == quote => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    if let Some(decoded) = self.read_escape()? {
                        value.push(decoded);
                    }
                }
                Some(ch) => {
                    self.bump();
                    value.push(ch);
                }
            }
        }

        Ok(TokenKind::StringLiteral(self.interner.intern(&value)))
    }

    /// Decodes the escape after a backslash. Line continuations decode to
    /// nothing.
    fn read_escape(&mut self) -> LexerResult<Option<char>> {
        let escape_start = self.here();
        let Some(ch) = self.bump() else {
            return Err(LexerError::UnterminatedString { start: escape_start });
        };

        let decoded = match ch {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => '\0',
            '\n' => return Ok(None),
            'x' => self.read_hex_escape(2, "x", escape_start)?,
            'u' if self.eat('{') => {
                let mut digits = String::new();
                while let Some(c) = self.peek() {
                    if c == '}' {
                        break;
                    }
                    digits.push(c);
                    self.bump();
                }
                let closed = self.eat('}');
                let invalid = || LexerError::InvalidEscape {
                    sequence: format!("u{{{digits}"),
                    span: escape_start,
                };
                if !closed || digits.is_empty() {
                    return Err(invalid());
                }
                u32::from_str_radix(&digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(invalid)?
            }
            'u' => self.read_hex_escape(4, "u", escape_start)?,
            other => other,
        };
        Ok(Some(decoded))
    }

    fn read_hex_escape(&mut self, len: usize, prefix: &str, span: Span) -> LexerResult<char> {
        let mut digits = String::with_capacity(len);
        for _ in 0..len {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    digits.push(c);
                    self.bump();
                }
                _ => break,
            }
        }

        let invalid = || LexerError::InvalidEscape {
            sequence: format!("{prefix}{digits}"),
            span,
        };
        if digits.len() != len {
            return Err(invalid());
        }
        u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(invalid)
    }

    /// Skips to the next whitespace or delimiter after an error.
    fn recover(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || matches!(ch, ';' | ',' | ')' | '}' | ']') {
                break;
            }
            self.bump();
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch) || ch.is_alphanumeric()
}

/// Lexes `source` and keeps only the token kinds.
///
/// # Errors
///
/// Returns the first [`LexerError`] encountered.
pub fn tokenize(source: &str) -> LexerResult<Vec<TokenKind>> {
    Lexer::new(source)
        .lex()
        .map(|tokens| tokens.into_iter().map(|t| t.kind).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opov_mem::Symbol;

    fn lex(source: &str) -> (Vec<Token>, StringInterner) {
        Lexer::new(source).lex_with_interner().unwrap()
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap()
    }

    #[test]
    fn test_lexer_empty() {
        assert_eq!(kinds(""), vec![TokenKind::EOF]);
        assert_eq!(kinds("   \n\t "), vec![TokenKind::EOF]);
    }

    #[test]
    fn test_lexer_keywords_and_identifiers() {
        let (tokens, interner) = lex("let x = typeof $y_1");
        assert_eq!(tokens[0].kind, TokenKind::Let);
        let TokenKind::Ident(x) = tokens[1].kind else {
            panic!("expected identifier");
        };
        assert_eq!(interner.resolve(x), Some("x"));
        assert_eq!(tokens[3].kind, TokenKind::Typeof);
        let TokenKind::Ident(y) = tokens[4].kind else {
            panic!("expected identifier");
        };
        assert_eq!(interner.resolve(y), Some("$y_1"));
    }

    #[test]
    fn test_lexer_longest_match() {
        assert_eq!(
            kinds(">>>= >>> >>= >> >= >"),
            vec![
                TokenKind::UShrEq,
                TokenKind::UShr,
                TokenKind::ShrEq,
                TokenKind::Shr,
                TokenKind::GtEq,
                TokenKind::Gt,
                TokenKind::EOF,
            ]
        );
        assert_eq!(
            kinds("=== == => = !== != !"),
            vec![
                TokenKind::EqEqEq,
                TokenKind::EqEq,
                TokenKind::FatArrow,
                TokenKind::Eq,
                TokenKind::BangEqEq,
                TokenKind::BangEq,
                TokenKind::Bang,
                TokenKind::EOF,
            ]
        );
        assert_eq!(
            kinds("**= ** *= ??= ?? ? &&= ||="),
            vec![
                TokenKind::StarStarEq,
                TokenKind::StarStar,
                TokenKind::StarEq,
                TokenKind::QuestionQuestionEq,
                TokenKind::QuestionQuestion,
                TokenKind::Question,
                TokenKind::AmpAmpEq,
                TokenKind::PipePipeEq,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_lexer_update_vs_plus() {
        assert_eq!(
            kinds("a+++b"),
            vec![
                TokenKind::Ident(Symbol::new(keywords::KEYWORD_COUNT)),
                TokenKind::PlusPlus,
                TokenKind::Plus,
                TokenKind::Ident(Symbol::new(keywords::KEYWORD_COUNT + 1)),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_lexer_numbers() {
        let (tokens, interner) = lex("42 3.14 .5 1e10 2E-3 0xFF 0b101 0o17 1_000");
        let texts: Vec<&str> = tokens
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::NumberLiteral(sym) => interner.resolve(sym),
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            vec!["42", "3.14", ".5", "1e10", "2E-3", "0xFF", "0b101", "0o17", "1_000"]
        );
    }

    #[test]
    fn test_lexer_invalid_numbers() {
        assert!(matches!(
            Lexer::new("0x").lex(),
            Err(LexerError::InvalidNumeric { .. })
        ));
        assert!(matches!(
            Lexer::new("1e+").lex(),
            Err(LexerError::InvalidNumeric { .. })
        ));
        let Err(LexerError::InvalidNumeric { literal, .. }) = Lexer::new("3in").lex() else {
            panic!("expected invalid numeric");
        };
        assert_eq!(literal, "3in");
    }

    #[test]
    fn test_lexer_strings_and_escapes() {
        let (tokens, interner) = lex(r#"'it\'s' "a\tb\n" "\x41B\u{1F600}" 'line\
cont'"#);
        let values: Vec<&str> = tokens
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::StringLiteral(sym) => interner.resolve(sym),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec!["it's", "a\tb\n", "AB\u{1F600}", "linecont"]);
    }

    #[test]
    fn test_lexer_string_errors() {
        assert!(matches!(
            Lexer::new("'open").lex(),
            Err(LexerError::UnterminatedString { .. })
        ));
        assert!(matches!(
            Lexer::new("\"a\nb\"").lex(),
            Err(LexerError::UnterminatedString { .. })
        ));
        assert!(matches!(
            Lexer::new(r#""\xZZ""#).lex(),
            Err(LexerError::InvalidEscape { .. })
        ));
    }

    #[test]
    fn test_lexer_comments() {
        assert_eq!(
            kinds("a // trailing\n/* block */ b"),
            vec![
                TokenKind::Ident(Symbol::new(keywords::KEYWORD_COUNT)),
                TokenKind::Ident(Symbol::new(keywords::KEYWORD_COUNT + 1)),
                TokenKind::EOF,
            ]
        );
        assert!(matches!(
            Lexer::new("/* never closed").lex(),
            Err(LexerError::UnterminatedComment { .. })
        ));
    }

    #[test]
    fn test_lexer_newline_tracking() {
        let (tokens, _) = lex("a\nb /*\n*/ c d");
        assert!(!tokens[0].newline_before);
        assert!(tokens[1].newline_before);
        assert!(tokens[2].newline_before);
        assert!(!tokens[3].newline_before);
    }

    #[test]
    fn test_lexer_spans() {
        let (tokens, _) = lex("x +=\n  y");
        assert_eq!(tokens[1].span, Span::new(2, 4, 1, 3, 1, 5));
        assert_eq!(tokens[2].span.start_line, 2);
        assert_eq!(tokens[2].span.start_col, 3);
    }

    #[test]
    fn test_lexer_unknown_char() {
        let Err(LexerError::UnknownChar { ch, span }) = Lexer::new("a @ b").lex() else {
            panic!("expected unknown char");
        };
        assert_eq!(ch, '@');
        assert_eq!(span.start_col, 3);
    }

    #[test]
    fn test_lexer_string_interned_like_identifier() {
        let (tokens, interner) = lex("_lhs '_rhs'");
        assert!(matches!(tokens[0].kind, TokenKind::Ident(_)));
        assert!(interner.contains("_lhs"));
        assert!(interner.contains("_rhs"));
    }
}
