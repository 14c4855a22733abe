//! Directive parsing.
//!
//! A scope opts in or out of rewriting with a string-literal statement in
//! its directive prologue:
//!
//! ```text
//! 'operator-overload enabled';
//! 'operator-overload disabled';
//! ```
//!
//! Only the first literal carrying the tag is read. Anything that is not
//! recognized means "inherit"; parsing never fails.

use opov_mem::StringInterner;
use opov_syntax::ast::Directive;
use std::fmt;

/// Tag every operator-overload directive starts with.
pub const TAG: &str = "operator-overload";

/// The directive placed at the top of every generated function body.
pub const DISABLED_DIRECTIVE: &str = "operator-overload disabled";

/// What a scope's directives say about rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Override {
    /// Rewrite inside this scope
    Enabled,
    /// Leave operators native inside this scope
    Disabled,
    /// Use the enclosing scope's state
    #[default]
    Inherit,
}

impl Override {
    /// The explicit state, or `None` for `Inherit`.
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Override::Enabled => Some(true),
            Override::Disabled => Some(false),
            Override::Inherit => None,
        }
    }
}

impl fmt::Display for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Override::Enabled => "enabled",
            Override::Disabled => "disabled",
            Override::Inherit => "inherit",
        })
    }
}

/// Reads one literal. `None` if it does not carry the tag.
fn parse_literal(text: &str) -> Option<Override> {
    let rest = text.strip_prefix(TAG)?;
    if rest.chars().next().is_some_and(|ch| !ch.is_whitespace()) {
        return None;
    }

    Some(match rest.trim().to_lowercase().as_str() {
        "enabled" => Override::Enabled,
        "disabled" => Override::Disabled,
        _ => Override::Inherit,
    })
}

/// Parses directive texts in order and returns the first tagged one's
/// override.
///
/// ```
/// use opov_transform::directive::{parse_override, Override};
///
/// assert_eq!(parse_override(["use strict", "operator-overload ENABLED"]), Override::Enabled);
/// assert_eq!(parse_override(["operator-overload", "operator-overload disabled"]), Override::Inherit);
/// assert_eq!(parse_override(["operator-overloads enabled"]), Override::Inherit);
/// ```
pub fn parse_override<'a, I>(texts: I) -> Override
where
    I: IntoIterator<Item = &'a str>,
{
    texts
        .into_iter()
        .find_map(parse_literal)
        .unwrap_or(Override::Inherit)
}

/// Parses the directive prologue of a program or block.
#[must_use]
pub fn scope_override(directives: &[Directive], interner: &StringInterner) -> Override {
    parse_override(
        directives
            .iter()
            .filter_map(|directive| interner.resolve(directive.value)),
    )
}
