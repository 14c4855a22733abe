//! Leveled logging for the `opov` workspace.
//!
//! Every crate in the workspace logs through the macros exported here. Output
//! goes to standard error so that tools which print transformed source on
//! standard output (the `opov` CLI) never interleave log lines with code.
//!
//! The minimum level is a process-wide atomic. It defaults to `Warn` and can
//! be configured programmatically or from the `OPOV_LOG` environment variable.
//! Setting `NO_COLOR` disables ANSI colors.
//!
//! # Example
//!
//! ```
//! use opov_log::{debug, info, warn, Level};
//!
//! opov_log::set_level(Level::Debug);
//!
//! let unit = "main.js";
//! info!("transforming {}", unit);
//! debug!("scope depth {}", 2);
//! warn!("directive ignored");
//! ```

use std::fmt::{self, Arguments};
use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Environment variable read by [`init_from_env`].
pub const LOG_ENV_VAR: &str = "OPOV_LOG";

/// Log levels, ordered from most severe (`Error`) to most verbose (`Trace`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Failures the caller must see
    Error = 0,
    /// Suspicious input that was tolerated
    Warn = 1,
    /// High-level progress
    Info = 2,
    /// Per-unit and per-scope detail
    Debug = 3,
    /// Per-node detail
    Trace = 4,
}

impl Level {
    const fn color_code(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    /// Returns the upper-case name of this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`Level`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    input: String,
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid log level '{}'", self.input)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Parses a level name, ignoring case.
    ///
    /// ```
    /// use opov_log::Level;
    ///
    /// assert_eq!("debug".parse::<Level>(), Ok(Level::Debug));
    /// assert!("loud".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            _ => Err(ParseLevelError {
                input: s.to_string(),
            }),
        }
    }
}

/// Process-wide logger state.
pub struct Logger {
    level: AtomicU8,
    color: AtomicBool,
}

impl Logger {
    const fn new(level: Level) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
            color: AtomicBool::new(true),
        }
    }

    /// Sets the minimum level that is written.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Returns the current minimum level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Enables or disables ANSI colors.
    pub fn set_color(&self, enabled: bool) {
        self.color.store(enabled, Ordering::SeqCst);
    }

    /// Returns `true` if a message at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }

    fn color(&self) -> bool {
        self.color.load(Ordering::Relaxed)
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns the global logger, creating it at `Level::Warn` on first use.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Warn))
}

/// Sets the minimum level of the global logger.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the minimum level of the global logger from a level name.
///
/// # Errors
///
/// Returns [`ParseLevelError`] if `s` is not a level name.
pub fn set_level_from_str(s: &str) -> Result<(), ParseLevelError> {
    set_level(s.parse()?);
    Ok(())
}

/// Configures the global logger from `OPOV_LOG` and `NO_COLOR`.
///
/// An unset or unparsable `OPOV_LOG` leaves the level unchanged; the
/// unparsable case is reported once at `Warn`. Returns the effective level.
pub fn init_from_env() -> Level {
    let logger = get_logger();

    if std::env::var_os("NO_COLOR").is_some() {
        logger.set_color(false);
    }

    if let Ok(value) = std::env::var(LOG_ENV_VAR) {
        match value.parse::<Level>() {
            Ok(level) => logger.set_level(level),
            Err(err) => {
                __log_with_target(
                    Level::Warn,
                    module_path!(),
                    format_args!("{LOG_ENV_VAR}: {err}"),
                );
            }
        }
    }

    logger.level()
}

fn format_line(level: Level, target: &str, args: Arguments, color: bool) -> String {
    const RESET: &str = "\x1b[0m";

    if color {
        format!("{}[{level}]{RESET} {target}: {args}", level.color_code())
    } else {
        format!("[{level}] {target}: {args}")
    }
}

/// Writes one log line. Called by the macros after the level check.
#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments) {
    let logger = get_logger();
    if !logger.enabled(level) {
        return;
    }

    let line = format_line(level, target, args, logger.color());
    let mut stderr = std::io::stderr().lock();
    // A closed stderr is not worth failing the caller over.
    let _ = writeln!(stderr, "{line}");
}

/// Logs at an explicit level, tagging the line with the caller's module path.
///
/// ```
/// use opov_log::{log, Level};
///
/// log!(level: Level::Info, "rewrote {} expressions", 3);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {
        {
            if $crate::get_logger().enabled($level) {
                $crate::__log_with_target(
                    $level,
                    module_path!(),
                    format_args!($($arg)*)
                );
            }
        }
    };
}

/// Logs at `Error`.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs at `Warn`.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs at `Info`.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs at `Debug`.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs at `Trace`.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}
