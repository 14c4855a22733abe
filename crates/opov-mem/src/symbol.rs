//! Symbol type for interned strings.
//!
//! A [`Symbol`] is a 32-bit handle to a string owned by a
//! [`StringInterner`](crate::StringInterner). Identifiers, string literal
//! values and directive texts in the AST are all symbols, which keeps nodes
//! small and makes name comparison a single integer compare.
//!
//! # Examples
//!
//! ```
//! use opov_mem::Symbol;
//!
//! let a = Symbol::new(7);
//! let b = Symbol::new(7);
//! assert_eq!(a, b);
//! assert_eq!(a.as_u32(), 7);
//! ```

use std::fmt;

/// A handle to an interned string.
///
/// Symbols are only meaningful together with the interner that produced
/// them; resolving a symbol against a different interner yields an
/// unrelated string or `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a symbol from a raw ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the raw ID as an index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// The placeholder symbol (`u32::MAX`), never handed out by an interner.
    #[must_use]
    pub const fn invalid() -> Self {
        Self(u32::MAX)
    }

    /// Returns `true` for [`Symbol::invalid`].
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl From<u32> for Symbol {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_equality() {
        assert_eq!(Symbol::new(1), Symbol::new(1));
        assert_ne!(Symbol::new(1), Symbol::new(2));
    }

    #[test]
    fn test_symbol_invalid() {
        assert!(Symbol::invalid().is_invalid());
        assert!(!Symbol::new(3).is_invalid());
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(format!("{}", Symbol::new(42)), "Symbol(42)");
    }

    #[test]
    fn test_symbol_as_map_key() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Symbol::new(1), "first");
        map.insert(Symbol::from(1), "updated");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&Symbol::new(1)), Some(&"updated"));
    }
}
