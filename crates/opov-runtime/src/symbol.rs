//! The symbol registry behind `Symbol.for`.
//!
//! Each key maps to exactly one [`SymbolId`] for the lifetime of an
//! interpreter, so `Symbol.for("+") === Symbol.for("+")` and capabilities
//! registered under a key are found by any code that asks for the same key.

use fxhash::FxHashMap;
use std::rc::Rc;

/// A registered symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Returns the raw ID.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Key to symbol registry for one realm.
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    by_key: FxHashMap<Rc<str>, SymbolId>,
    keys: Vec<Rc<str>>,
}

impl SymbolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `Symbol.for(key)`: the symbol registered for `key`, registering it on
    /// first use.
    ///
    /// ```
    /// use opov_runtime::symbol::SymbolRegistry;
    ///
    /// let mut registry = SymbolRegistry::new();
    /// let plus = registry.register("+");
    /// assert_eq!(registry.register("+"), plus);
    /// assert_ne!(registry.register("-"), plus);
    /// assert_eq!(registry.key_for(plus), Some("+"));
    /// ```
    pub fn register(&mut self, key: &str) -> SymbolId {
        if let Some(id) = self.by_key.get(key) {
            return *id;
        }

        let id = SymbolId(u32::try_from(self.keys.len()).unwrap_or(u32::MAX));
        let key: Rc<str> = Rc::from(key);
        self.keys.push(Rc::clone(&key));
        self.by_key.insert(key, id);
        id
    }

    /// The symbol for `key`, if registered.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<SymbolId> {
        self.by_key.get(key).copied()
    }

    /// `Symbol.keyFor(id)`.
    #[must_use]
    pub fn key_for(&self, id: SymbolId) -> Option<&str> {
        self.keys.get(id.0 as usize).map(AsRef::as_ref)
    }

    /// Number of registered symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
