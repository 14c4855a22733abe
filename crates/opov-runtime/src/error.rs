//! Error types for the reference runtime.
//!
//! Every failure the evaluator can report is a [`RuntimeError`]. Programs
//! have no `try`/`catch`, so the first error aborts evaluation.

use opov_syntax::SyntaxError;
use std::fmt;

/// Errors raised while evaluating a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The source did not lex or parse.
    Syntax(SyntaxError),

    /// Reference to a name with no binding in scope.
    UnknownIdentifier {
        /// The name
        name: String,
    },

    /// Assignment to a `const` binding.
    ConstAssignment {
        /// The name
        name: String,
    },

    /// Call of a value that is not a function.
    NotCallable {
        /// `typeof` of the called value
        kind: &'static str,
    },

    /// `new` applied to something that cannot construct.
    NotConstructor {
        /// `typeof` of the callee, or `"arrow function"`
        kind: &'static str,
    },

    /// Property read or write on `null` or `undefined`.
    PropertyOfNullish {
        /// Property name
        property: String,
        /// `"null"` or `"undefined"`
        base: &'static str,
    },

    /// Implicit conversion that JavaScript rejects, such as a symbol to a
    /// number.
    InvalidConversion {
        /// Source type
        from: &'static str,
        /// Target type
        to: &'static str,
    },

    /// Operand of the wrong type for `in` or `instanceof`.
    InvalidOperand {
        /// The operator
        operator: &'static str,
        /// What the right-hand side must be
        expected: &'static str,
    },

    /// Left side of an assignment or update that cannot be written.
    InvalidTarget,

    /// `import` of a module the runtime does not provide.
    ImportNotFound {
        /// Module specifier
        module: String,
    },

    /// Call nesting exceeded the configured limit.
    StackOverflow {
        /// Depth at which the call was refused
        depth: u32,
    },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::Syntax(err) => write!(f, "{err}"),
            RuntimeError::UnknownIdentifier { name } => write!(f, "{name} is not defined"),
            RuntimeError::ConstAssignment { name } => {
                write!(f, "assignment to constant variable '{name}'")
            }
            RuntimeError::NotCallable { kind } => write!(f, "{kind} is not a function"),
            RuntimeError::NotConstructor { kind } => write!(f, "{kind} is not a constructor"),
            RuntimeError::PropertyOfNullish { property, base } => {
                write!(f, "cannot access property '{property}' of {base}")
            }
            RuntimeError::InvalidConversion { from, to } => {
                write!(f, "cannot convert a {from} value to a {to}")
            }
            RuntimeError::InvalidOperand { operator, expected } => {
                write!(f, "right-hand side of '{operator}' must be {expected}")
            }
            RuntimeError::InvalidTarget => write!(f, "invalid assignment target"),
            RuntimeError::ImportNotFound { module } => {
                write!(f, "cannot find module '{module}'")
            }
            RuntimeError::StackOverflow { depth } => {
                write!(f, "maximum call depth {depth} exceeded")
            }
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SyntaxError> for RuntimeError {
    fn from(err: SyntaxError) -> Self {
        RuntimeError::Syntax(err)
    }
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            RuntimeError::UnknownIdentifier {
                name: "x".to_string()
            }
            .to_string(),
            "x is not defined"
        );
        assert_eq!(
            RuntimeError::PropertyOfNullish {
                property: "p".to_string(),
                base: "undefined"
            }
            .to_string(),
            "cannot access property 'p' of undefined"
        );
        assert_eq!(
            RuntimeError::NotCallable { kind: "number" }.to_string(),
            "number is not a function"
        );
        assert_eq!(
            RuntimeError::StackOverflow { depth: 8 }.to_string(),
            "maximum call depth 8 exceeded"
        );
    }

    #[test]
    fn test_syntax_error_source() {
        use std::error::Error as _;

        let syntax = opov_syntax::parse_program("a +").unwrap_err();
        let err = RuntimeError::from(syntax.clone());
        assert_eq!(err.to_string(), syntax.to_string());
        assert!(err.source().is_some());
        assert!(RuntimeError::InvalidTarget.source().is_none());
    }
}
