//! The operator catalog.
//!
//! A process-wide, read-only table describing every operator the pass knows
//! about: its token, the protocol key objects register their capability
//! under, and whether the operator is excluded from rewriting.
//!
//! Operators missing from the table (`!`, `typeof`, `void`, `delete`, `in`,
//! `instanceof`, `,`) are never rewritten. Excluded entries exist so that
//! lookups can tell "known but protected" apart from "unknown".
//!
//! # Examples
//!
//! ```
//! use opov_syntax::ast::BinaryOp;
//! use opov_transform::catalog::{self, Arity, Operator};
//!
//! let plus = catalog::entry(Operator::Binary(BinaryOp::Add)).unwrap();
//! assert_eq!(plus.key, "+");
//! assert!(plus.is_rewritable());
//!
//! let strict = catalog::lookup_token("===", Arity::Binary).unwrap();
//! assert!(strict.excluded);
//! ```

use opov_syntax::ast::{AssignOp, BinaryOp, Fixity, UnaryOp, UpdateOp};
use std::fmt;

/// Shape of the expression an operator appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// `OP x`
    Unary,
    /// `a OP b`
    Binary,
    /// `++x`, `x--`
    Update,
    /// `t OP= v`, and plain `=`
    CompoundAssign,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Arity::Unary => "unary",
            Arity::Binary => "binary",
            Arity::Update => "update",
            Arity::CompoundAssign => "compound-assign",
        })
    }
}

/// One catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorEntry {
    /// Operator token as written in source
    pub token: &'static str,
    /// Protocol key; the runtime capability lives at `Symbol.for(key)`
    pub key: &'static str,
    /// Expression shape
    pub arity: Arity,
    /// Prefix or postfix, for update operators only
    pub fixity: Option<Fixity>,
    /// Native semantics must be preserved
    pub excluded: bool,
}

impl OperatorEntry {
    const fn rewrite(token: &'static str, key: &'static str, arity: Arity) -> Self {
        Self {
            token,
            key,
            arity,
            fixity: None,
            excluded: false,
        }
    }

    const fn update(token: &'static str, key: &'static str, fixity: Fixity) -> Self {
        Self {
            token,
            key,
            arity: Arity::Update,
            fixity: Some(fixity),
            excluded: false,
        }
    }

    const fn protected(token: &'static str, arity: Arity) -> Self {
        Self {
            token,
            key: token,
            arity,
            fixity: None,
            excluded: true,
        }
    }

    /// Returns `true` if the pass may rewrite this operator.
    #[must_use]
    pub const fn is_rewritable(&self) -> bool {
        !self.excluded
    }
}

/// An AST operator, used as the catalog lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Prefix unary operator
    Unary(UnaryOp),
    /// Binary operator
    Binary(BinaryOp),
    /// `++`/`--` with fixity
    Update(UpdateOp, Fixity),
    /// Assignment operator, plain or compound
    Assign(AssignOp),
}

impl Operator {
    /// Source text of the operator token.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Operator::Unary(op) => op.as_str(),
            Operator::Binary(op) => op.as_str(),
            Operator::Update(op, _) => op.as_str(),
            Operator::Assign(op) => op.as_str(),
        }
    }

    /// The arity this operator is catalogued under.
    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            Operator::Unary(_) => Arity::Unary,
            Operator::Binary(_) => Arity::Binary,
            Operator::Update(..) => Arity::Update,
            Operator::Assign(_) => Arity::CompoundAssign,
        }
    }
}

/// Module specifier of the support import injected into rewritten units.
pub const POLYFILL_MODULE: &str = "operator-overload-polyfills";

/// Every catalogued operator.
pub static CATALOG: &[OperatorEntry] = &[
    // Arithmetic
    OperatorEntry::rewrite("+", "+", Arity::Binary),
    OperatorEntry::rewrite("-", "-", Arity::Binary),
    OperatorEntry::rewrite("*", "*", Arity::Binary),
    OperatorEntry::rewrite("/", "/", Arity::Binary),
    OperatorEntry::rewrite("%", "%", Arity::Binary),
    OperatorEntry::rewrite("**", "**", Arity::Binary),
    // Bitwise
    OperatorEntry::rewrite("&", "&", Arity::Binary),
    OperatorEntry::rewrite("|", "|", Arity::Binary),
    OperatorEntry::rewrite("^", "^", Arity::Binary),
    OperatorEntry::rewrite("<<", "<<", Arity::Binary),
    OperatorEntry::rewrite(">>", ">>", Arity::Binary),
    OperatorEntry::rewrite(">>>", ">>>", Arity::Binary),
    // Relational and loose equality
    OperatorEntry::rewrite("<", "<", Arity::Binary),
    OperatorEntry::rewrite("<=", "<=", Arity::Binary),
    OperatorEntry::rewrite(">", ">", Arity::Binary),
    OperatorEntry::rewrite(">=", ">=", Arity::Binary),
    OperatorEntry::rewrite("==", "==", Arity::Binary),
    OperatorEntry::rewrite("!=", "!=", Arity::Binary),
    OperatorEntry::protected("===", Arity::Binary),
    OperatorEntry::protected("!==", Arity::Binary),
    // Short-circuit
    OperatorEntry::protected("&&", Arity::Binary),
    OperatorEntry::protected("||", Arity::Binary),
    OperatorEntry::protected("??", Arity::Binary),
    // Unary
    OperatorEntry::rewrite("+", "unary-plus", Arity::Unary),
    OperatorEntry::rewrite("-", "unary-minus", Arity::Unary),
    OperatorEntry::rewrite("~", "~", Arity::Unary),
    // Update
    OperatorEntry::update("++", "prefix-increment", Fixity::Prefix),
    OperatorEntry::update("++", "postfix-increment", Fixity::Postfix),
    OperatorEntry::update("--", "prefix-decrement", Fixity::Prefix),
    OperatorEntry::update("--", "postfix-decrement", Fixity::Postfix),
    // Assignment
    OperatorEntry::protected("=", Arity::CompoundAssign),
    OperatorEntry::rewrite("+=", "+", Arity::CompoundAssign),
    OperatorEntry::rewrite("-=", "-", Arity::CompoundAssign),
    OperatorEntry::rewrite("*=", "*", Arity::CompoundAssign),
    OperatorEntry::rewrite("/=", "/", Arity::CompoundAssign),
    OperatorEntry::rewrite("%=", "%", Arity::CompoundAssign),
    OperatorEntry::rewrite("**=", "**", Arity::CompoundAssign),
    OperatorEntry::rewrite("&=", "&", Arity::CompoundAssign),
    OperatorEntry::rewrite("|=", "|", Arity::CompoundAssign),
    OperatorEntry::rewrite("^=", "^", Arity::CompoundAssign),
    OperatorEntry::rewrite("<<=", "<<", Arity::CompoundAssign),
    OperatorEntry::rewrite(">>=", ">>", Arity::CompoundAssign),
    OperatorEntry::rewrite(">>>=", ">>>", Arity::CompoundAssign),
    OperatorEntry::protected("&&=", Arity::CompoundAssign),
    OperatorEntry::protected("||=", Arity::CompoundAssign),
    OperatorEntry::protected("??=", Arity::CompoundAssign),
];

/// Looks up the catalog entry for an AST operator.
///
/// Returns `None` for operators the catalog does not know, which the pass
/// treats the same as excluded ones.
#[must_use]
pub fn entry(op: Operator) -> Option<&'static OperatorEntry> {
    let fixity = match op {
        Operator::Update(_, fixity) => Some(fixity),
        _ => None,
    };
    let token = op.token();
    let arity = op.arity();

    CATALOG
        .iter()
        .find(|e| e.token == token && e.arity == arity && e.fixity == fixity)
}

/// Looks up an entry by token text and arity, for callers holding raw
/// tokens.
///
/// Update operators resolve to their prefix entry; use [`entry`] with an
/// explicit fixity for the postfix one.
#[must_use]
pub fn lookup_token(token: &str, arity: Arity) -> Option<&'static OperatorEntry> {
    CATALOG
        .iter()
        .find(|e| e.token == token && e.arity == arity)
}

/// Iterates over the entries the pass may rewrite.
pub fn rewritable() -> impl Iterator<Item = &'static OperatorEntry> {
    CATALOG.iter().filter(|e| e.is_rewritable())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_binary_op_has_expected_status() {
        for op in BinaryOp::ALL {
            let found = entry(Operator::Binary(op));
            match op {
                BinaryOp::In | BinaryOp::InstanceOf => assert!(found.is_none(), "{op}"),
                BinaryOp::StrictEq
                | BinaryOp::StrictNotEq
                | BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Nullish => assert!(found.unwrap().excluded, "{op}"),
                _ => {
                    let found = found.unwrap();
                    assert!(found.is_rewritable(), "{op}");
                    assert_eq!(found.key, op.as_str());
                }
            }
        }
    }

    #[test]
    fn test_compound_keys_strip_equals() {
        for op in AssignOp::ALL {
            let found = entry(Operator::Assign(op)).unwrap();
            match op.binary_op() {
                Some(bin) if !bin.is_short_circuit() => {
                    assert!(found.is_rewritable(), "{op}");
                    assert_eq!(found.key, bin.as_str());
                }
                _ => assert!(found.excluded, "{op}"),
            }
        }
    }

    #[test]
    fn test_unary_keys() {
        let key = |op| entry(Operator::Unary(op)).map(|e| e.key);
        assert_eq!(key(UnaryOp::Plus), Some("unary-plus"));
        assert_eq!(key(UnaryOp::Minus), Some("unary-minus"));
        assert_eq!(key(UnaryOp::BitNot), Some("~"));
        assert_eq!(key(UnaryOp::Not), None);
        assert_eq!(key(UnaryOp::Typeof), None);
        assert_eq!(key(UnaryOp::Void), None);
        assert_eq!(key(UnaryOp::Delete), None);
    }

    #[test]
    fn test_update_keys_depend_on_fixity() {
        let key = |op, fixity| entry(Operator::Update(op, fixity)).unwrap().key;
        assert_eq!(key(UpdateOp::Increment, Fixity::Prefix), "prefix-increment");
        assert_eq!(key(UpdateOp::Increment, Fixity::Postfix), "postfix-increment");
        assert_eq!(key(UpdateOp::Decrement, Fixity::Prefix), "prefix-decrement");
        assert_eq!(key(UpdateOp::Decrement, Fixity::Postfix), "postfix-decrement");
    }

    #[test]
    fn test_lookup_token_distinguishes_arity() {
        assert_eq!(lookup_token("-", Arity::Binary).unwrap().key, "-");
        assert_eq!(lookup_token("-", Arity::Unary).unwrap().key, "unary-minus");
        assert_eq!(
            lookup_token("++", Arity::Update).unwrap().fixity,
            Some(Fixity::Prefix)
        );
        assert!(lookup_token("!", Arity::Unary).is_none());
        assert!(lookup_token(",", Arity::Binary).is_none());
    }

    #[test]
    fn test_plain_assignment_is_excluded() {
        assert!(lookup_token("=", Arity::CompoundAssign).unwrap().excluded);
    }

    #[test]
    fn test_rewritable_count() {
        // 18 binary, 3 unary, 4 update, 12 compound
        assert_eq!(rewritable().count(), 37);
    }
}
