//! Overload capabilities.
//!
//! An object opts into an operator by storing a function under the
//! registered symbol of the operator's protocol key, directly or on its
//! prototype chain:
//!
//! ```text
//! Vector.prototype[Symbol.for("+")] = function (other) { ... };
//! ```
//!
//! Rewritten code looks the capability up itself, so the evaluator never
//! consults this module when running operators. [`Overloadable`] exposes
//! the same query to host code and tests.

use crate::symbol::{SymbolId, SymbolRegistry};
use crate::value::{Callable, ObjectRef, PropertyKey, Value};

/// Module specifier of the support import added to rewritten units.
pub const POLYFILL_MODULE: &str = "operator-overload-polyfills";

/// Every protocol key an object can implement.
pub const PROTOCOL_KEYS: &[&str] = &[
    "+",
    "-",
    "*",
    "/",
    "%",
    "**",
    "&",
    "|",
    "^",
    "<<",
    ">>",
    ">>>",
    "<",
    "<=",
    ">",
    ">=",
    "==",
    "!=",
    "unary-plus",
    "unary-minus",
    "~",
    "prefix-increment",
    "postfix-increment",
    "prefix-decrement",
    "postfix-decrement",
];

/// Registers every protocol key, as importing the support module does.
pub fn register_protocol_keys(registry: &mut SymbolRegistry) {
    for key in PROTOCOL_KEYS {
        registry.register(key);
    }
}

/// Values that may carry operator capabilities.
pub trait Overloadable {
    /// The capability registered under `key`, if present and callable.
    fn try_get_capability(&self, key: SymbolId) -> Option<Callable>;

    /// Returns `true` if a capability is registered under `key`.
    fn has_capability(&self, key: SymbolId) -> bool {
        self.try_get_capability(key).is_some()
    }
}

impl Overloadable for ObjectRef {
    fn try_get_capability(&self, key: SymbolId) -> Option<Callable> {
        self.get(&PropertyKey::Symbol(key))
            .as_ref()
            .and_then(Value::as_callable)
    }
}

impl Overloadable for Value {
    /// Primitives, `null`, and `undefined` never carry capabilities.
    fn try_get_capability(&self, key: SymbolId) -> Option<Callable> {
        self.as_object()
            .and_then(|obj| obj.try_get_capability(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Native;

    fn noop(
        _: &mut crate::Interpreter,
        _: Value,
        _: &[Value],
    ) -> crate::error::Result<Value> {
        Ok(Value::Undefined)
    }

    fn function() -> Value {
        Value::Object(ObjectRef::function(Callable::Native(Native {
            name: "noop",
            func: noop,
        })))
    }

    #[test]
    fn test_own_and_inherited_capabilities() {
        let mut registry = SymbolRegistry::new();
        let plus = registry.register("+");
        let minus = registry.register("-");

        let proto = ObjectRef::ordinary();
        proto.set(PropertyKey::Symbol(plus), function());
        let obj = ObjectRef::ordinary();
        obj.set_proto(Some(proto));
        obj.set(PropertyKey::Symbol(minus), function());

        let value = Value::Object(obj);
        assert!(value.has_capability(plus));
        assert!(value.has_capability(minus));
    }

    #[test]
    fn test_non_callable_property_is_not_a_capability() {
        let mut registry = SymbolRegistry::new();
        let plus = registry.register("+");
        let obj = ObjectRef::ordinary();
        obj.set(PropertyKey::Symbol(plus), Value::Number(1.0));
        assert!(obj.try_get_capability(plus).is_none());
    }

    #[test]
    fn test_primitives_have_no_capabilities() {
        let mut registry = SymbolRegistry::new();
        let plus = registry.register("+");
        for value in [Value::Undefined, Value::Null, Value::Number(1.0), Value::string("a")] {
            assert!(!value.has_capability(plus));
        }
    }

    #[test]
    fn test_register_protocol_keys() {
        let mut registry = SymbolRegistry::new();
        register_protocol_keys(&mut registry);
        assert_eq!(registry.len(), PROTOCOL_KEYS.len());
        assert!(registry.lookup("postfix-decrement").is_some());
    }
}
