//! CLI errors.

use opov_runtime::RuntimeError;
use opov_syntax::SyntaxError;
use opov_syntax::diagnostic::Emitter;
use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Everything that makes `opov` exit non-zero.
#[derive(Debug)]
pub enum CliError {
    /// The input file could not be read
    Io {
        /// The file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The input did not lex or parse
    Syntax {
        /// The file
        path: PathBuf,
        /// Its contents, for the diagnostic snippet
        text: String,
        /// The error
        error: SyntaxError,
    },

    /// Evaluation failed
    Runtime(RuntimeError),
}

impl CliError {
    /// Writes the error to stderr. Syntax errors are rendered with a source
    /// snippet.
    pub fn report(&self) {
        match self {
            CliError::Syntax { path, text, error } => {
                let colors = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
                eprintln!("{}:", path.display());
                eprint!("{}", Emitter::new(colors).render_syntax_error(error, text));
            }
            _ => eprintln!("error: {self}"),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            CliError::Syntax { path, error, .. } => write!(f, "{}: {error}", path.display()),
            CliError::Runtime(err) => write!(f, "runtime error: {err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io { source, .. } => Some(source),
            CliError::Syntax { error, .. } => Some(error),
            CliError::Runtime(err) => Some(err),
        }
    }
}

impl From<RuntimeError> for CliError {
    fn from(err: RuntimeError) -> Self {
        CliError::Runtime(err)
    }
}

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
