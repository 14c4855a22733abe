//! Lexical environments.
//!
//! An [`Env`] is one scope: a map from interned names to bindings plus a
//! link to the enclosing scope. Function scopes also carry `this`; arrow
//! scopes leave it unset, so a lookup walks out to the enclosing function,
//! which gives arrows their lexical `this`.

use crate::value::Value;
use fxhash::FxHashMap;
use opov_mem::Symbol;
use std::cell::RefCell;
use std::rc::Rc;

/// Why a write to a binding failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingError {
    /// No binding with that name is in scope
    Unbound,
    /// The binding is `const`
    Immutable,
}

#[derive(Debug)]
struct Binding {
    value: Value,
    mutable: bool,
}

#[derive(Debug, Default)]
struct Scope {
    bindings: FxHashMap<Symbol, Binding>,
    parent: Option<Env>,
    /// `Some` for function and global scopes
    this: Option<Value>,
    /// Target of `var` declarations
    function_scope: bool,
}

/// Shared handle to a scope.
#[derive(Debug, Clone, Default)]
pub struct Env(Rc<RefCell<Scope>>);

impl Env {
    /// Creates the global scope, where `this` is `undefined`.
    #[must_use]
    pub fn global() -> Self {
        Self(Rc::new(RefCell::new(Scope {
            this: Some(Value::Undefined),
            function_scope: true,
            ..Scope::default()
        })))
    }

    /// Creates a block scope inside this one.
    #[must_use]
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Scope {
            parent: Some(self.clone()),
            ..Scope::default()
        })))
    }

    /// Creates a function scope inside this one. `this` is `None` for
    /// arrows.
    #[must_use]
    pub fn function_child(&self, this: Option<Value>) -> Self {
        Self(Rc::new(RefCell::new(Scope {
            parent: Some(self.clone()),
            this,
            function_scope: true,
            ..Scope::default()
        })))
    }

    /// Creates or replaces a binding in this scope.
    pub fn declare(&self, name: Symbol, value: Value, mutable: bool) {
        self.0
            .borrow_mut()
            .bindings
            .insert(name, Binding { value, mutable });
    }

    /// Looks `name` up through the scope chain.
    #[must_use]
    pub fn get(&self, name: Symbol) -> Option<Value> {
        let scope = self.0.borrow();
        match scope.bindings.get(&name) {
            Some(binding) => Some(binding.value.clone()),
            None => scope.parent.as_ref().and_then(|parent| parent.get(name)),
        }
    }

    /// Returns `true` if `name` is bound anywhere in the chain.
    #[must_use]
    pub fn has(&self, name: Symbol) -> bool {
        let scope = self.0.borrow();
        scope.bindings.contains_key(&name)
            || scope.parent.as_ref().is_some_and(|parent| parent.has(name))
    }

    /// Writes to the nearest binding of `name`.
    ///
    /// # Errors
    ///
    /// Fails if `name` is unbound or `const`.
    pub fn set(&self, name: Symbol, value: Value) -> Result<(), BindingError> {
        let mut scope = self.0.borrow_mut();
        if let Some(binding) = scope.bindings.get_mut(&name) {
            if !binding.mutable {
                return Err(BindingError::Immutable);
            }
            binding.value = value;
            return Ok(());
        }
        match &scope.parent {
            Some(parent) => parent.set(name, value),
            None => Err(BindingError::Unbound),
        }
    }

    /// The `this` of the nearest function scope.
    #[must_use]
    pub fn this(&self) -> Value {
        let scope = self.0.borrow();
        match (&scope.this, &scope.parent) {
            (Some(this), _) => this.clone(),
            (None, Some(parent)) => parent.this(),
            (None, None) => Value::Undefined,
        }
    }

    /// The nearest function (or global) scope, where `var` declares.
    #[must_use]
    pub fn var_scope(&self) -> Env {
        let scope = self.0.borrow();
        match (&scope.parent, scope.function_scope) {
            (Some(parent), false) => parent.var_scope(),
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(n: u32) -> Symbol {
        Symbol::from(n)
    }

    #[test]
    fn test_shadowing_and_lookup() {
        let global = Env::global();
        global.declare(sym(1), Value::Number(1.0), true);
        let inner = global.child();
        inner.declare(sym(1), Value::Number(2.0), true);

        assert_eq!(inner.get(sym(1)), Some(Value::Number(2.0)));
        assert_eq!(global.get(sym(1)), Some(Value::Number(1.0)));
        assert_eq!(inner.get(sym(2)), None);
    }

    #[test]
    fn test_set_walks_outward() {
        let global = Env::global();
        global.declare(sym(1), Value::Number(1.0), true);
        let inner = global.child();
        inner.set(sym(1), Value::Number(5.0)).unwrap();
        assert_eq!(global.get(sym(1)), Some(Value::Number(5.0)));
        assert_eq!(inner.set(sym(9), Value::Null), Err(BindingError::Unbound));
    }

    #[test]
    fn test_const_rejects_writes() {
        let global = Env::global();
        global.declare(sym(1), Value::Null, false);
        assert_eq!(global.set(sym(1), Value::Null), Err(BindingError::Immutable));
    }

    #[test]
    fn test_arrow_scope_inherits_this() {
        let global = Env::global();
        let method = global.function_child(Some(Value::Bool(true)));
        let arrow = method.child().function_child(None);
        assert_eq!(arrow.this(), Value::Bool(true));
        assert_eq!(global.this(), Value::Undefined);
    }

    #[test]
    fn test_var_scope_skips_blocks() {
        let global = Env::global();
        let func = global.function_child(Some(Value::Undefined));
        let block = func.child().child();
        block.var_scope().declare(sym(3), Value::Null, true);
        assert!(func.get(sym(3)).is_some());
        assert!(!global.has(sym(3)));
    }
}
