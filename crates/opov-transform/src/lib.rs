//! `opov` Transform: Operator-Overload Rewriting
//!
//! A scope-aware source-to-source pass. Inside enabled scopes, binary,
//! unary, update, and compound-assignment expressions become
//! capability-checked dispatches: an operand that carries a capability
//! registered under `Symbol.for(key)` handles the operator itself, anything
//! else falls back to the native operator.
//!
//! Strict equality and the short-circuit operators are never rewritten.
//!
//! # Modules
//!
//! - [`catalog`] - Which operators exist, their protocol keys, exclusions
//! - [`directive`] - `'operator-overload enabled|disabled'` parsing
//! - [`scope`] - Enablement stack and its release guard
//! - [`rewrite`] - Dispatch subtree construction
//! - [`driver`] - Traversal, report, import injection
//! - [`options`] - Pass configuration
//!
//! # Examples
//!
//! ```
//! use opov_transform::{transform_source, TransformOptions};
//!
//! let (out, report) = transform_source("x += 1;", &TransformOptions::default()).unwrap();
//! assert_eq!(report.compound, 1);
//! assert!(out.starts_with("import \"operator-overload-polyfills\";\nx = ((_lhs, _rhs) => {"));
//! ```

pub mod catalog;
pub mod directive;
pub mod driver;
pub mod options;
pub mod rewrite;
pub mod scope;

pub use catalog::{Arity, OperatorEntry, POLYFILL_MODULE};
pub use directive::Override;
pub use driver::{PassContext, PassDriver, TransformReport, transform_program};
pub use options::TransformOptions;

use opov_syntax::SyntaxResult;
use opov_syntax::pretty::{PrettyConfig, PrettyPrinter};

/// Parses `source`, runs the pass, and prints the result with the default
/// layout.
///
/// # Errors
///
/// Returns the first lexer or parser error, including
/// [`ParserError::NestingTooDeep`](opov_syntax::ParserError::NestingTooDeep)
/// for input nested past [`MAX_NESTING_DEPTH`](opov_syntax::MAX_NESTING_DEPTH).
pub fn transform_source(
    source: &str,
    options: &TransformOptions,
) -> SyntaxResult<(String, TransformReport)> {
    transform_source_with(source, options, PrettyConfig::default())
}

/// Like [`transform_source`], printing with `config`.
///
/// # Errors
///
/// Returns the first lexer or parser error.
pub fn transform_source_with(
    source: &str,
    options: &TransformOptions,
    config: PrettyConfig,
) -> SyntaxResult<(String, TransformReport)> {
    let (mut program, mut interner) = opov_syntax::parse_program(source)?;
    let report = transform_program(&mut program, &mut interner, options);
    let text = PrettyPrinter::new(&interner)
        .with_config(config)
        .print_program(&program);
    Ok((text, report))
}
