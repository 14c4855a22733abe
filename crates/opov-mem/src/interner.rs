//! String interning with ID-based references.
//!
//! The interner keeps two views of the same strings:
//! - `strings`: Symbol ID -> string (for resolving)
//! - `symbols`: string -> Symbol (for interning)
//!
//! Besides deduplication, the interner doubles as the record of every name a
//! compile unit mentions. The rewriting pass relies on that to pick generated
//! binding names that cannot collide with user identifiers (see
//! [`StringInterner::fresh`]).
//!
//! # Examples
//!
//! ```
//! use opov_mem::StringInterner;
//!
//! let mut interner = StringInterner::new();
//!
//! let a = interner.intern("point");
//! let b = interner.intern("point");
//! assert_eq!(a, b);
//! assert_eq!(interner.resolve(a), Some("point"));
//! ```

use crate::symbol::Symbol;
use hashbrown::HashMap;

/// String interner with bidirectional mapping.
///
/// Strings passed to [`StringInterner::with_pre_interned`] receive the IDs
/// `0..n` in order, so callers that pre-intern a keyword table get stable
/// keyword symbols across interners.
#[derive(Debug, Clone, Default)]
pub struct StringInterner {
    /// Symbol ID -> string
    strings: Vec<Box<str>>,

    /// string -> Symbol
    symbols: HashMap<Box<str>, Symbol>,

    /// Number of pre-interned strings (IDs `0..reserved`)
    reserved: u32,
}

impl StringInterner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an interner whose first IDs are `words`, in order.
    ///
    /// ```
    /// use opov_mem::StringInterner;
    ///
    /// let mut interner = StringInterner::with_pre_interned(&["var", "let"]);
    /// assert_eq!(interner.intern("let").as_u32(), 1);
    /// assert!(interner.is_reserved(interner.get("var").unwrap()));
    /// ```
    #[must_use]
    pub fn with_pre_interned(words: &[&str]) -> Self {
        let mut interner = Self::new();
        for word in words {
            interner.intern(word);
        }
        interner.reserved = u32::try_from(interner.strings.len()).unwrap_or(u32::MAX);
        interner
    }

    /// Interns `s`, returning its symbol.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX - 1` distinct strings are interned.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.symbols.get(s) {
            return sym;
        }

        let id = u32::try_from(self.strings.len())
            .ok()
            .filter(|&id| id != u32::MAX)
            .expect("string interner exhausted its symbol space");
        let sym = Symbol::new(id);
        self.strings.push(s.into());
        self.symbols.insert(s.into(), sym);
        sym
    }

    /// Returns the symbol for `s` without interning it.
    #[must_use]
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.symbols.get(s).copied()
    }

    /// Returns `true` if `s` has been interned.
    #[must_use]
    pub fn contains(&self, s: &str) -> bool {
        self.symbols.contains_key(s)
    }

    /// Resolves a symbol to its string, or `None` if the ID is unknown.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get(sym.as_usize()).map(AsRef::as_ref)
    }

    /// Interns the first name of the form `base`, `base2`, `base3`, ...
    /// that has never been interned before.
    ///
    /// Because every identifier of a compile unit passes through the
    /// interner while lexing, the returned symbol names a binding that no
    /// source identifier (and no earlier `fresh` result) uses.
    ///
    /// ```
    /// use opov_mem::StringInterner;
    ///
    /// let mut interner = StringInterner::new();
    /// interner.intern("_lhs");
    ///
    /// let first = interner.fresh("_lhs");
    /// let second = interner.fresh("_lhs");
    /// assert_eq!(interner.resolve(first), Some("_lhs2"));
    /// assert_eq!(interner.resolve(second), Some("_lhs3"));
    /// ```
    pub fn fresh(&mut self, base: &str) -> Symbol {
        if !self.contains(base) {
            return self.intern(base);
        }

        let mut suffix = 2usize;
        loop {
            let candidate = format!("{base}{suffix}");
            if !self.contains(&candidate) {
                return self.intern(&candidate);
            }
            suffix += 1;
        }
    }

    /// Returns `true` if `sym` was pre-interned at construction.
    #[must_use]
    pub const fn is_reserved(&self, sym: Symbol) -> bool {
        sym.as_u32() < self.reserved
    }

    /// Returns the number of interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns `true` if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
