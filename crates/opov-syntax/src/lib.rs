//! `opov` Syntax: Lexer, Parser, AST, and Printer
//!
//! This crate is the JavaScript-subset frontend that the operator-overload
//! pass reads and rewrites:
//! - Lexical analysis (tokenization) with automatic-semicolon bookkeeping
//! - Parsing into an owned, mutable AST
//! - Printing the AST back to source, parenthesized by precedence
//! - A mutable visitor for in-place passes
//!
//! # Modules
//!
//! - [`span`] - Source location tracking
//! - [`token`] - Token types and definitions
//! - [`lexer`] - Tokenizer
//! - [`parser`] - Recursive descent parser
//! - [`ast`] - Expression and statement nodes
//! - [`pretty`] - AST to source
//! - [`visit`] - `VisitMut` and the `walk_*` functions
//! - [`error`] / [`diagnostic`] - Errors and their rendering
//!
//! # Examples
//!
//! ```
//! use opov_syntax::{parse_program, pretty::print_program};
//!
//! let (program, interner) = parse_program("'use strict'; a += b * 2").unwrap();
//! assert_eq!(program.directives.len(), 1);
//! assert_eq!(print_program(&program, &interner), "\"use strict\";\na += b * 2;\n");
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod keywords;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod span;
pub mod token;
pub mod visit;

pub use error::{LexerError, LexerResult, ParserError, ParserResult, SyntaxError, SyntaxResult};
pub use lexer::Lexer;
pub use parser::{MAX_NESTING_DEPTH, Parser};
pub use span::{Span, Spanned};
pub use token::{Token, TokenKind};

use ast::Program;
use opov_mem::StringInterner;

/// Lexes and parses `source` as one compile unit.
///
/// Returns the program together with the interner holding every identifier
/// and string it mentions.
///
/// # Errors
///
/// Returns the first lexer or parser error.
pub fn parse_program(source: &str) -> SyntaxResult<(Program, StringInterner)> {
    let (tokens, interner) = Lexer::new(source).lex_with_interner()?;
    let mut parser = Parser::new(tokens, interner);
    let program = parser.parse_program()?;
    Ok((program, parser.into_interner()))
}
