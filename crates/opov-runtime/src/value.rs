//! Runtime values.
//!
//! Primitives are stored inline. Objects, arrays, and functions share one
//! representation, [`ObjectRef`]: a reference-counted, interior-mutable
//! property map with an optional prototype link. Two object values are
//! equal only if they are the same object.

use crate::env::Env;
use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::symbol::SymbolId;
use fxhash::FxHashMap;
use opov_syntax::ast::{ArrowFunction, Function};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A JavaScript value.
#[derive(Clone, Default)]
pub enum Value {
    /// `undefined`
    #[default]
    Undefined,
    /// `null`
    Null,
    /// `true` or `false`
    Bool(bool),
    /// IEEE 754 double
    Number(f64),
    /// Immutable string
    String(Rc<str>),
    /// Registered symbol
    Symbol(SymbolId),
    /// Object, array, or function
    Object(ObjectRef),
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn string(s: &str) -> Self {
        Value::String(Rc::from(s))
    }

    /// Result of the `typeof` operator.
    #[must_use]
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(obj) if obj.is_callable() => "function",
            Value::Object(_) => "object",
        }
    }

    /// `ToBoolean`.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Symbol(_) | Value::Object(_) => true,
        }
    }

    /// Returns `true` for `null` and `undefined`.
    #[must_use]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Returns the object, if this is one.
    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The function behind this value, if it is callable.
    #[must_use]
    pub fn as_callable(&self) -> Option<Callable> {
        self.as_object().and_then(ObjectRef::callable)
    }

    /// `===`.
    #[must_use]
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(id) => write!(f, "Symbol({})", id.as_u32()),
            Value::Object(obj) => write!(f, "[{} {:p}]", self.type_of(), Rc::as_ptr(&obj.0)),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

/// A property name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// String-named property
    String(Rc<str>),
    /// Symbol-keyed property
    Symbol(SymbolId),
}

impl PropertyKey {
    /// Creates a string key.
    #[must_use]
    pub fn named(name: &str) -> Self {
        PropertyKey::String(Rc::from(name))
    }

    /// The key as an array index, if it is one.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PropertyKey::String(s)
                if !s.is_empty()
                    && s.bytes().all(|b| b.is_ascii_digit())
                    && (s.len() == 1 || !s.starts_with('0')) =>
            {
                s.parse().ok()
            }
            _ => None,
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => f.write_str(s),
            PropertyKey::Symbol(id) => write!(f, "Symbol({})", id.as_u32()),
        }
    }
}

/// Native function signature: interpreter, `this`, arguments.
pub type NativeFn = fn(&mut Interpreter, Value, &[Value]) -> Result<Value>;

/// A built-in function.
#[derive(Clone, Copy)]
pub struct Native {
    /// Name, for diagnostics
    pub name: &'static str,
    /// Implementation
    pub func: NativeFn,
}

/// Source code of a user function.
#[derive(Clone)]
pub enum ClosureCode {
    /// `function` declaration or expression; binds its own `this`
    Function(Rc<Function>),
    /// Arrow function; `this` is lexical
    Arrow(Rc<ArrowFunction>),
}

/// A user function and the environment it closes over.
#[derive(Clone)]
pub struct Closure {
    /// Code
    pub code: ClosureCode,
    /// Defining environment
    pub env: Env,
}

/// Anything that can be called.
#[derive(Clone)]
pub enum Callable {
    /// User function
    Closure(Rc<Closure>),
    /// Built-in
    Native(Native),
}

impl Callable {
    /// Returns `true` if `new` may be applied.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        matches!(self, Callable::Closure(c) if matches!(c.code, ClosureCode::Function(_)))
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Closure(closure) => match &closure.code {
                ClosureCode::Function(_) => f.write_str("[function]"),
                ClosureCode::Arrow(_) => f.write_str("[arrow]"),
            },
            Callable::Native(native) => write!(f, "[native {}]", native.name),
        }
    }
}

/// What kind of object an [`ObjectData`] is.
#[derive(Clone, Default)]
pub enum ObjectKind {
    /// Plain object
    #[default]
    Ordinary,
    /// Array with dense elements
    Array(Vec<Value>),
    /// Function object
    Function(Callable),
}

/// Storage of one object.
#[derive(Default)]
pub struct ObjectData {
    /// Own properties
    pub props: FxHashMap<PropertyKey, Value>,
    /// Prototype
    pub proto: Option<ObjectRef>,
    /// Kind
    pub kind: ObjectKind,
}

/// Shared handle to an object.
#[derive(Clone, Default)]
pub struct ObjectRef(Rc<RefCell<ObjectData>>);

impl ObjectRef {
    /// Creates a plain object with no properties.
    #[must_use]
    pub fn ordinary() -> Self {
        Self::with_kind(ObjectKind::Ordinary)
    }

    /// Creates an array.
    #[must_use]
    pub fn array(elements: Vec<Value>) -> Self {
        Self::with_kind(ObjectKind::Array(elements))
    }

    /// Creates a function object.
    #[must_use]
    pub fn function(callable: Callable) -> Self {
        Self::with_kind(ObjectKind::Function(callable))
    }

    fn with_kind(kind: ObjectKind) -> Self {
        Self(Rc::new(RefCell::new(ObjectData {
            kind,
            ..ObjectData::default()
        })))
    }

    /// Returns `true` if both handles refer to the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns `true` for function objects.
    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self.0.borrow().kind, ObjectKind::Function(_))
    }

    /// Returns `true` for arrays.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.0.borrow().kind, ObjectKind::Array(_))
    }

    /// The function behind a function object.
    #[must_use]
    pub fn callable(&self) -> Option<Callable> {
        match &self.0.borrow().kind {
            ObjectKind::Function(callable) => Some(callable.clone()),
            _ => None,
        }
    }

    /// The prototype.
    #[must_use]
    pub fn proto(&self) -> Option<ObjectRef> {
        self.0.borrow().proto.clone()
    }

    /// Sets the prototype.
    pub fn set_proto(&self, proto: Option<ObjectRef>) {
        self.0.borrow_mut().proto = proto;
    }

    /// Reads an own property, including array elements and `length`.
    #[must_use]
    pub fn get_own(&self, key: &PropertyKey) -> Option<Value> {
        let data = self.0.borrow();
        if let ObjectKind::Array(elements) = &data.kind {
            if let Some(index) = key.as_index() {
                return elements.get(index).cloned();
            }
            if matches!(key, PropertyKey::String(s) if s.as_ref() == "length") {
                return Some(Value::Number(elements.len() as f64));
            }
        }
        data.props.get(key).cloned()
    }

    /// Reads a property, following the prototype chain.
    #[must_use]
    pub fn get(&self, key: &PropertyKey) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(obj) = current {
            if let Some(value) = obj.get_own(key) {
                return Some(value);
            }
            current = obj.proto();
        }
        None
    }

    /// Returns `true` if the property exists here or on the prototype chain.
    #[must_use]
    pub fn has(&self, key: &PropertyKey) -> bool {
        self.get(key).is_some()
    }

    /// Writes an own property. Array indexes grow the array, padding with
    /// `undefined`.
    pub fn set(&self, key: PropertyKey, value: Value) {
        let mut data = self.0.borrow_mut();
        if let ObjectKind::Array(elements) = &mut data.kind {
            if let Some(index) = key.as_index() {
                if index >= elements.len() {
                    elements.resize(index + 1, Value::Undefined);
                }
                elements[index] = value;
                return;
            }
        }
        data.props.insert(key, value);
    }

    /// Removes an own property. Returns `true` if it existed.
    pub fn delete(&self, key: &PropertyKey) -> bool {
        let mut data = self.0.borrow_mut();
        if let ObjectKind::Array(elements) = &mut data.kind {
            if let Some(slot) = key.as_index().and_then(|i| elements.get_mut(i)) {
                *slot = Value::Undefined;
                return true;
            }
        }
        data.props.remove(key).is_some()
    }

    /// A copy of the array elements, or `None` if this is not an array.
    #[must_use]
    pub fn elements(&self) -> Option<Vec<Value>> {
        match &self.0.borrow().kind {
            ObjectKind::Array(elements) => Some(elements.clone()),
            _ => None,
        }
    }
}

/// `Number::toString` for the common cases: integers without a fraction,
/// shortest round-trip digits otherwise, exponent form outside
/// `[1e-6, 1e21)`.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }

    let text = format!("{n:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}

/// Parses a numeric literal as the lexer accepted it.
#[must_use]
pub fn parse_number_literal(raw: &str) -> f64 {
    let digits: String = raw.chars().filter(|c| *c != '_').collect();
    let radix = match digits.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return digits.parse().unwrap_or(f64::NAN),
    };
    parse_radix(&digits[2..], radix)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits.chars().try_fold(0.0_f64, |acc, ch| {
        ch.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
    .unwrap_or(f64::NAN)
}

/// `ToNumber` for strings.
#[must_use]
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(radix) = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    } {
        return parse_radix(&trimmed[2..], radix);
    }
    // Rust also accepts "inf" and "nan", which JavaScript does not.
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

/// `ToInt32`.
#[must_use]
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// `ToUint32`.
#[must_use]
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let wrapped = n.trunc().rem_euclid(4_294_967_296.0);
    wrapped as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-42.0), "-42");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(123_456_789.0), "123456789");
    }

    #[test]
    fn test_parse_number_literal() {
        assert_eq!(parse_number_literal("42"), 42.0);
        assert_eq!(parse_number_literal("0xFF"), 255.0);
        assert_eq!(parse_number_literal("0b101"), 5.0);
        assert_eq!(parse_number_literal("0o17"), 15.0);
        assert_eq!(parse_number_literal("1_000"), 1000.0);
        assert_eq!(parse_number_literal("2E-3"), 0.002);
        assert_eq!(parse_number_literal(".5"), 0.5);
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number("  12 "), 12.0);
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("0x10"), 16.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("12px").is_nan());
    }

    #[test]
    fn test_int32_wrapping() {
        assert_eq!(to_int32(4_294_967_295.0), -1);
        assert_eq!(to_int32(2_147_483_648.0), -2_147_483_648);
        assert_eq!(to_int32(-1.5), -1);
        assert_eq!(to_uint32(-1.0), 4_294_967_295);
        assert_eq!(to_int32(f64::NAN), 0);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(Value::string("0").is_truthy());
        assert!(Value::Object(ObjectRef::ordinary()).is_truthy());
    }

    #[test]
    fn test_object_identity() {
        let a = ObjectRef::ordinary();
        let b = ObjectRef::ordinary();
        assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
        assert_ne!(Value::Object(a), Value::Object(b));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_array_elements_and_length() {
        let arr = ObjectRef::array(vec![Value::Number(1.0)]);
        arr.set(PropertyKey::named("2"), Value::Number(3.0));
        assert_eq!(arr.get(&PropertyKey::named("length")), Some(Value::Number(3.0)));
        assert_eq!(arr.get(&PropertyKey::named("1")), Some(Value::Undefined));
        assert_eq!(arr.get(&PropertyKey::named("01")), None);
    }

    #[test]
    fn test_prototype_chain() {
        let proto = ObjectRef::ordinary();
        proto.set(PropertyKey::named("shared"), Value::Bool(true));
        let obj = ObjectRef::ordinary();
        obj.set_proto(Some(proto));
        assert!(obj.has(&PropertyKey::named("shared")));
        assert!(obj.get_own(&PropertyKey::named("shared")).is_none());
    }
}
