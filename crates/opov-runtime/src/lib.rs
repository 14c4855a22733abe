//! `opov` Runtime: a Reference Evaluator
//!
//! A small tree-walking interpreter for the JavaScript subset that
//! `opov-syntax` parses. It exists so rewritten programs can be executed
//! and compared with their originals:
//! - Values, objects with prototype chains, closures with lexical `this`
//! - A `Symbol.for` registry, so capability keys are shared realm-wide
//! - The support module import that rewritten units carry
//! - `console.log` output captured as lines
//!
//! # Modules
//!
//! - [`value`] - Values, objects, and conversion helpers
//! - [`env`] - Lexical environments
//! - [`symbol`] - The `Symbol.for` registry
//! - [`capability`] - Protocol keys and the [`Overloadable`] query
//! - [`interpreter`] - The evaluator
//! - [`error`] - Runtime errors
//!
//! # Examples
//!
//! ```
//! let output = opov_runtime::run_source("let a = [1]; a[1] = 2; console.log(a, a.length);").unwrap();
//! assert_eq!(output, ["1,2 2"]);
//! ```

#![warn(missing_docs)]

pub mod capability;
pub mod env;
pub mod error;
pub mod interpreter;
pub mod symbol;
pub mod value;

pub use capability::{Overloadable, POLYFILL_MODULE, PROTOCOL_KEYS};
pub use error::{Result, RuntimeError};
pub use interpreter::{DEFAULT_MAX_DEPTH, Interpreter};
pub use symbol::{SymbolId, SymbolRegistry};
pub use value::{Callable, ObjectRef, PropertyKey, Value};

/// Parses and runs `source`, returning the lines it logged.
///
/// # Errors
///
/// Returns the syntax error or the first runtime error.
pub fn run_source(source: &str) -> Result<Vec<String>> {
    let (program, interner) = opov_syntax::parse_program(source)?;
    let mut interp = Interpreter::new(interner);
    interp.run(&program)?;
    Ok(interp.take_output())
}
