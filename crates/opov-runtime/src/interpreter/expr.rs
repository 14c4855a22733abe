//! Expression evaluation and the operator semantics rewritten code falls
//! back to.

use super::Interpreter;
use crate::env::{BindingError, Env};
use crate::error::{Result, RuntimeError};
use crate::value::{
    Callable, Closure, ClosureCode, ObjectRef, PropertyKey, Value, format_number,
    parse_number_literal, string_to_number, to_int32, to_uint32,
};
use opov_mem::Symbol;
use opov_syntax::ast::{
    AssignOp, BinaryOp, Expr, Fixity, MemberProp, PropKey, UnaryOp, UpdateOp,
};
use std::cmp::Ordering;
use std::rc::Rc;

/// A writable location.
enum Reference {
    Binding(Symbol),
    Property(Value, PropertyKey),
}

/// Conversion preference for `ToPrimitive`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Hint {
    Number,
    String,
}

impl Interpreter {
    /// Evaluates an expression.
    pub(crate) fn eval(&mut self, expr: &Expr, env: &Env) -> Result<Value> {
        match expr {
            Expr::Number { raw, .. } => Ok(Value::Number(parse_number_literal(self.name(*raw)))),
            Expr::String { value, .. } => Ok(Value::string(self.name(*value))),
            Expr::Bool { value, .. } => Ok(Value::Bool(*value)),
            Expr::Null { .. } => Ok(Value::Null),
            Expr::Identifier { name, .. } => self.lookup(*name, env),
            Expr::This { .. } => Ok(env.this()),
            Expr::Array { elements, .. } => {
                let elements = self.eval_list(elements, env)?;
                Ok(Value::Object(ObjectRef::array(elements)))
            }
            Expr::Object { props, .. } => {
                let obj = ObjectRef::ordinary();
                for prop in props {
                    let key = self.prop_key(&prop.key, env)?;
                    let value = self.eval(&prop.value, env)?;
                    obj.set(key, value);
                }
                Ok(Value::Object(obj))
            }
            Expr::Function(func) => match func.name {
                Some(name) => {
                    let own = env.child();
                    let value = self.make_function(func, &own);
                    own.declare(name, value.clone(), false);
                    Ok(value)
                }
                None => Ok(self.make_function(func, env)),
            },
            Expr::Arrow(arrow) => {
                let closure = Closure {
                    code: ClosureCode::Arrow(Rc::new((**arrow).clone())),
                    env: env.clone(),
                };
                Ok(Value::Object(ObjectRef::function(Callable::Closure(
                    Rc::new(closure),
                ))))
            }
            Expr::Unary { op, operand, .. } => self.eval_unary(*op, operand, env),
            Expr::Update {
                op, fixity, target, ..
            } => {
                let reference = self.reference(target, env)?;
                let current = self.get_reference(&reference, env)?;
                let old = self.to_number(&current)?;
                let new = match op {
                    UpdateOp::Increment => old + 1.0,
                    UpdateOp::Decrement => old - 1.0,
                };
                self.put_reference(&reference, Value::Number(new), env)?;
                Ok(Value::Number(match fixity {
                    Fixity::Prefix => new,
                    Fixity::Postfix => old,
                }))
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                let left = self.eval(left, env)?;
                match op {
                    BinaryOp::And if !left.is_truthy() => Ok(left),
                    BinaryOp::Or if left.is_truthy() => Ok(left),
                    BinaryOp::Nullish if !left.is_nullish() => Ok(left),
                    BinaryOp::And | BinaryOp::Or | BinaryOp::Nullish => self.eval(right, env),
                    op => {
                        let right = self.eval(right, env)?;
                        self.binary(*op, &left, &right)
                    }
                }
            }
            Expr::Assign {
                op, target, value, ..
            } => self.eval_assign(*op, target, value, env),
            Expr::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                if self.eval(test, env)?.is_truthy() {
                    self.eval(consequent, env)
                } else {
                    self.eval(alternate, env)
                }
            }
            Expr::Call { callee, args, .. } => {
                let (func, this) = match callee.unwrap_generated() {
                    Expr::Member {
                        object, property, ..
                    } => {
                        let base = self.eval(object, env)?;
                        let key = self.member_key(property, env)?;
                        (self.get_property(&base, &key)?, base)
                    }
                    other => (self.eval(other, env)?, Value::Undefined),
                };
                let args = self.eval_list(args, env)?;
                self.call(&func, this, args)
            }
            Expr::New { callee, args, .. } => {
                let callee = self.eval(callee, env)?;
                let args = self.eval_list(args, env)?;
                self.construct(&callee, args)
            }
            Expr::Member {
                object, property, ..
            } => {
                let base = self.eval(object, env)?;
                let key = self.member_key(property, env)?;
                self.get_property(&base, &key)
            }
            Expr::Sequence { exprs, .. } => {
                let mut last = Value::Undefined;
                for expr in exprs {
                    last = self.eval(expr, env)?;
                }
                Ok(last)
            }
            Expr::Generated(inner) => self.eval(inner, env),
        }
    }

    fn eval_list(&mut self, exprs: &[Expr], env: &Env) -> Result<Vec<Value>> {
        exprs.iter().map(|expr| self.eval(expr, env)).collect()
    }

    fn lookup(&self, name: Symbol, env: &Env) -> Result<Value> {
        env.get(name).ok_or_else(|| RuntimeError::UnknownIdentifier {
            name: self.name(name).to_string(),
        })
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr, env: &Env) -> Result<Value> {
        match op {
            UnaryOp::Typeof => {
                if let Expr::Identifier { name, .. } = operand.unwrap_generated() {
                    if !env.has(*name) {
                        return Ok(Value::string("undefined"));
                    }
                }
                let value = self.eval(operand, env)?;
                Ok(Value::string(value.type_of()))
            }
            UnaryOp::Delete => match operand.unwrap_generated() {
                Expr::Member {
                    object, property, ..
                } => {
                    let base = self.eval(object, env)?;
                    let key = self.member_key(property, env)?;
                    Ok(Value::Bool(match base.as_object() {
                        Some(obj) => obj.delete(&key),
                        None => true,
                    }))
                }
                _ => Ok(Value::Bool(true)),
            },
            op => {
                let value = self.eval(operand, env)?;
                Ok(match op {
                    UnaryOp::Plus => Value::Number(self.to_number(&value)?),
                    UnaryOp::Minus => Value::Number(-self.to_number(&value)?),
                    UnaryOp::BitNot => Value::Number(f64::from(!to_int32(self.to_number(&value)?))),
                    UnaryOp::Not => Value::Bool(!value.is_truthy()),
                    UnaryOp::Void | UnaryOp::Typeof | UnaryOp::Delete => Value::Undefined,
                })
            }
        }
    }

    fn eval_assign(&mut self, op: AssignOp, target: &Expr, value: &Expr, env: &Env) -> Result<Value> {
        let reference = self.reference(target, env)?;

        let result = match op {
            AssignOp::Assign => self.eval(value, env)?,
            AssignOp::And | AssignOp::Or | AssignOp::Nullish => {
                let current = self.get_reference(&reference, env)?;
                let keep = match op {
                    AssignOp::And => !current.is_truthy(),
                    AssignOp::Or => current.is_truthy(),
                    _ => !current.is_nullish(),
                };
                if keep {
                    return Ok(current);
                }
                self.eval(value, env)?
            }
            compound => {
                let current = self.get_reference(&reference, env)?;
                let rhs = self.eval(value, env)?;
                let op = compound.binary_op().ok_or(RuntimeError::InvalidTarget)?;
                self.binary(op, &current, &rhs)?
            }
        };

        self.put_reference(&reference, result.clone(), env)?;
        Ok(result)
    }

    fn reference(&mut self, target: &Expr, env: &Env) -> Result<Reference> {
        match target.unwrap_generated() {
            Expr::Identifier { name, .. } => Ok(Reference::Binding(*name)),
            Expr::Member {
                object, property, ..
            } => {
                let base = self.eval(object, env)?;
                let key = self.member_key(property, env)?;
                Ok(Reference::Property(base, key))
            }
            _ => Err(RuntimeError::InvalidTarget),
        }
    }

    fn get_reference(&mut self, reference: &Reference, env: &Env) -> Result<Value> {
        match reference {
            Reference::Binding(name) => self.lookup(*name, env),
            Reference::Property(base, key) => self.get_property(base, key),
        }
    }

    fn put_reference(&mut self, reference: &Reference, value: Value, env: &Env) -> Result<()> {
        match reference {
            Reference::Binding(name) => env.set(*name, value).map_err(|err| {
                let name = self.name(*name).to_string();
                match err {
                    BindingError::Unbound => RuntimeError::UnknownIdentifier { name },
                    BindingError::Immutable => RuntimeError::ConstAssignment { name },
                }
            }),
            Reference::Property(base, key) => self.set_property(base, key.clone(), value),
        }
    }

    fn member_key(&mut self, property: &MemberProp, env: &Env) -> Result<PropertyKey> {
        match property {
            MemberProp::Named(name) => Ok(PropertyKey::named(self.name(*name))),
            MemberProp::Computed(key) => {
                let key = self.eval(key, env)?;
                self.to_property_key(&key)
            }
        }
    }

    fn prop_key(&mut self, key: &PropKey, env: &Env) -> Result<PropertyKey> {
        match key {
            PropKey::Named(name) | PropKey::String(name) => {
                Ok(PropertyKey::named(self.name(*name)))
            }
            PropKey::Number(raw) => Ok(PropertyKey::named(&format_number(parse_number_literal(
                self.name(*raw),
            )))),
            PropKey::Computed(expr) => {
                let key = self.eval(expr, env)?;
                self.to_property_key(&key)
            }
        }
    }

    /// `base[key]`. Primitives other than strings have no properties.
    pub(crate) fn get_property(&mut self, base: &Value, key: &PropertyKey) -> Result<Value> {
        match base {
            Value::Undefined => Err(RuntimeError::PropertyOfNullish {
                property: key.to_string(),
                base: "undefined",
            }),
            Value::Null => Err(RuntimeError::PropertyOfNullish {
                property: key.to_string(),
                base: "null",
            }),
            Value::Object(obj) => Ok(obj.get(key).unwrap_or_default()),
            Value::String(s) => Ok(match key {
                PropertyKey::String(name) if name.as_ref() == "length" => {
                    Value::Number(s.chars().count() as f64)
                }
                key => key
                    .as_index()
                    .and_then(|index| s.chars().nth(index))
                    .map(|ch| Value::string(ch.encode_utf8(&mut [0; 4])))
                    .unwrap_or_default(),
            }),
            Value::Bool(_) | Value::Number(_) | Value::Symbol(_) => Ok(Value::Undefined),
        }
    }

    /// `base[key] = value`. Writes to primitives are dropped.
    pub(crate) fn set_property(&mut self, base: &Value, key: PropertyKey, value: Value) -> Result<()> {
        match base {
            Value::Undefined => Err(RuntimeError::PropertyOfNullish {
                property: key.to_string(),
                base: "undefined",
            }),
            Value::Null => Err(RuntimeError::PropertyOfNullish {
                property: key.to_string(),
                base: "null",
            }),
            Value::Object(obj) => {
                obj.set(key, value);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn to_property_key(&mut self, value: &Value) -> Result<PropertyKey> {
        match self.to_primitive_hint(value, Hint::String)? {
            Value::Symbol(id) => Ok(PropertyKey::Symbol(id)),
            primitive => Ok(PropertyKey::String(Rc::from(self.to_string(&primitive)?))),
        }
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// `ToPrimitive` with the default (number) hint.
    pub(crate) fn to_primitive(&mut self, value: &Value) -> Result<Value> {
        self.to_primitive_hint(value, Hint::Number)
    }

    fn to_primitive_hint(&mut self, value: &Value, hint: Hint) -> Result<Value> {
        let Value::Object(obj) = value else {
            return Ok(value.clone());
        };

        let order = match hint {
            Hint::Number => ["valueOf", "toString"],
            Hint::String => ["toString", "valueOf"],
        };
        for method in order {
            if let Some(func) = obj.get(&PropertyKey::named(method)) {
                if func.as_callable().is_some() {
                    let result = self.call(&func, value.clone(), Vec::new())?;
                    if !matches!(result, Value::Object(_)) {
                        return Ok(result);
                    }
                }
            }
        }

        if let Some(elements) = obj.elements() {
            let parts = elements
                .iter()
                .map(|element| match element {
                    Value::Undefined | Value::Null => Ok(String::new()),
                    element => self.to_string(element),
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(Value::string(&parts.join(",")));
        }
        if obj.is_callable() {
            return Ok(Value::string("function () { [code] }"));
        }
        Ok(Value::string("[object Object]"))
    }

    /// `ToNumber`.
    pub(crate) fn to_number(&mut self, value: &Value) -> Result<f64> {
        Ok(match value {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Symbol(_) => {
                return Err(RuntimeError::InvalidConversion {
                    from: "symbol",
                    to: "number",
                });
            }
            Value::Object(_) => {
                let primitive = self.to_primitive(value)?;
                self.to_number(&primitive)?
            }
        })
    }

    /// `ToString`.
    pub(crate) fn to_string(&mut self, value: &Value) -> Result<String> {
        Ok(match value {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.to_string(),
            Value::Symbol(_) => {
                return Err(RuntimeError::InvalidConversion {
                    from: "symbol",
                    to: "string",
                });
            }
            Value::Object(_) => {
                let primitive = self.to_primitive_hint(value, Hint::String)?;
                self.to_string(&primitive)?
            }
        })
    }

    // ========================================================================
    // Operators
    // ========================================================================

    /// Applies a non-short-circuit binary operator.
    pub(crate) fn binary(&mut self, op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
        Ok(match op {
            BinaryOp::Add => {
                let left = self.to_primitive(left)?;
                let right = self.to_primitive(right)?;
                if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
                    let mut text = self.to_string(&left)?;
                    text.push_str(&self.to_string(&right)?);
                    Value::string(&text)
                } else {
                    Value::Number(self.to_number(&left)? + self.to_number(&right)?)
                }
            }
            BinaryOp::Sub => Value::Number(self.to_number(left)? - self.to_number(right)?),
            BinaryOp::Mul => Value::Number(self.to_number(left)? * self.to_number(right)?),
            BinaryOp::Div => Value::Number(self.to_number(left)? / self.to_number(right)?),
            BinaryOp::Rem => Value::Number(self.to_number(left)? % self.to_number(right)?),
            BinaryOp::Exp => {
                let base = self.to_number(left)?;
                let exponent = self.to_number(right)?;
                Value::Number(if exponent.is_infinite() && base.abs() == 1.0 {
                    f64::NAN
                } else {
                    base.powf(exponent)
                })
            }
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
                let a = to_int32(self.to_number(left)?);
                let b = to_int32(self.to_number(right)?);
                Value::Number(f64::from(match op {
                    BinaryOp::BitAnd => a & b,
                    BinaryOp::BitOr => a | b,
                    _ => a ^ b,
                }))
            }
            BinaryOp::Shl | BinaryOp::Shr => {
                let a = to_int32(self.to_number(left)?);
                let count = to_uint32(self.to_number(right)?) & 31;
                Value::Number(f64::from(if op == BinaryOp::Shl {
                    a.wrapping_shl(count)
                } else {
                    a >> count
                }))
            }
            BinaryOp::UShr => {
                let a = to_uint32(self.to_number(left)?);
                let count = to_uint32(self.to_number(right)?) & 31;
                Value::Number(f64::from(a >> count))
            }
            BinaryOp::Lt => Value::Bool(self.compare(left, right)? == Some(Ordering::Less)),
            BinaryOp::Gt => Value::Bool(self.compare(left, right)? == Some(Ordering::Greater)),
            BinaryOp::Le => Value::Bool(matches!(
                self.compare(left, right)?,
                Some(Ordering::Less | Ordering::Equal)
            )),
            BinaryOp::Ge => Value::Bool(matches!(
                self.compare(left, right)?,
                Some(Ordering::Greater | Ordering::Equal)
            )),
            BinaryOp::Eq => Value::Bool(self.loose_equals(left, right)?),
            BinaryOp::NotEq => Value::Bool(!self.loose_equals(left, right)?),
            BinaryOp::StrictEq => Value::Bool(left.strict_equals(right)),
            BinaryOp::StrictNotEq => Value::Bool(!left.strict_equals(right)),
            BinaryOp::In => {
                let Value::Object(obj) = right else {
                    return Err(RuntimeError::InvalidOperand {
                        operator: "in",
                        expected: "an object",
                    });
                };
                let key = self.to_property_key(left)?;
                Value::Bool(obj.has(&key))
            }
            BinaryOp::InstanceOf => Value::Bool(self.instance_of(left, right)?),
            // `eval` short-circuits these before the right side is evaluated.
            BinaryOp::And if left.is_truthy() => right.clone(),
            BinaryOp::Or if !left.is_truthy() => right.clone(),
            BinaryOp::Nullish if left.is_nullish() => right.clone(),
            BinaryOp::And | BinaryOp::Or | BinaryOp::Nullish => left.clone(),
        })
    }

    /// Abstract relational comparison. `None` when either side is `NaN`.
    /// Strings compare by code point.
    fn compare(&mut self, left: &Value, right: &Value) -> Result<Option<Ordering>> {
        let left = self.to_primitive(left)?;
        let right = self.to_primitive(right)?;
        if let (Value::String(a), Value::String(b)) = (&left, &right) {
            return Ok(Some(a.cmp(b)));
        }
        let a = self.to_number(&left)?;
        let b = self.to_number(&right)?;
        Ok(a.partial_cmp(&b))
    }

    /// `==`.
    pub(crate) fn loose_equals(&mut self, left: &Value, right: &Value) -> Result<bool> {
        Ok(match (left, right) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
            (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
                self.to_number(left)? == self.to_number(right)?
            }
            (Value::Bool(b), other) | (other, Value::Bool(b)) if !matches!(other, Value::Bool(_)) => {
                let n = Value::Number(f64::from(u8::from(*b)));
                self.loose_equals(&n, other)?
            }
            (Value::Object(_), Value::Number(_) | Value::String(_) | Value::Symbol(_)) => {
                let primitive = self.to_primitive(left)?;
                self.loose_equals(&primitive, right)?
            }
            (Value::Number(_) | Value::String(_) | Value::Symbol(_), Value::Object(_)) => {
                let primitive = self.to_primitive(right)?;
                self.loose_equals(left, &primitive)?
            }
            _ => left.strict_equals(right),
        })
    }

    fn instance_of(&mut self, value: &Value, ctor: &Value) -> Result<bool> {
        let Some(ctor) = ctor.as_object().filter(|obj| obj.is_callable()) else {
            return Err(RuntimeError::InvalidOperand {
                operator: "instanceof",
                expected: "callable",
            });
        };
        let Some(Value::Object(proto)) = ctor.get(&PropertyKey::named("prototype")) else {
            return Ok(false);
        };

        let mut current = value.as_object().and_then(ObjectRef::proto);
        while let Some(obj) = current {
            if obj.ptr_eq(&proto) {
                return Ok(true);
            }
            current = obj.proto();
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::RuntimeError;
    use crate::Interpreter;

    fn run(source: &str) -> Result<Vec<String>, RuntimeError> {
        let (program, interner) = opov_syntax::parse_program(source)?;
        let mut interp = Interpreter::new(interner);
        interp.run(&program)?;
        Ok(interp.take_output())
    }

    fn log(expr: &str) -> String {
        run(&format!("console.log({expr});")).unwrap().concat()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(log("7 % 3, 2 ** 10, 1 / 0, -7 % 3"), "1 1024 Infinity -1");
        assert_eq!(log("'3' * '4', '3' - 1, '3' + 1"), "12 2 31");
        assert_eq!(log("0.1 + 0.2"), "0.30000000000000004");
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(log("5 & 3, 5 | 3, 5 ^ 3, ~5"), "1 7 6 -6");
        assert_eq!(log("1 << 31, -16 >> 2, -16 >>> 28"), "-2147483648 -4 15");
    }

    #[test]
    fn test_comparison() {
        assert_eq!(log("1 < 2, 'b' < 'a', 2 <= 2, NaN >= NaN"), "true false true false");
        assert_eq!(log("'10' > 9, 'abc' < 'abd'"), "true true");
    }

    #[test]
    fn test_loose_equality() {
        assert_eq!(log("null == undefined, 0 == '', '1' == 1, true == 1"), "true true true true");
        assert_eq!(log("null == 0, NaN == NaN, 1 != '1'"), "false false false");
        assert_eq!(log("[1, 2] == '1,2'"), "true");
    }

    #[test]
    fn test_unary_and_typeof() {
        assert_eq!(log("-'3', +true, !0, void 1"), "-3 1 true undefined");
        assert_eq!(log("typeof missing, typeof 1, typeof null, typeof (() => 1)"), "undefined number object function");
    }

    #[test]
    fn test_logical_short_circuit() {
        let out = run("let n = 0; const f = () => { n++; return 1; }; false && f(); true || f(); 1 ?? f(); null ?? f(); console.log(n);")
            .unwrap();
        assert_eq!(out, ["1"]);
    }

    #[test]
    fn test_compound_and_logical_assignment() {
        let source = "
            let a = 2; a += 3; a **= 2;
            let b = null; b ??= 4; b ||= 9; b &&= b + 1;
            const o = { n: 1 }; o.n <<= 3; o['n'] -= 1;
            console.log(a, b, o.n);
        ";
        assert_eq!(run(source).unwrap(), ["25 5 7"]);
    }

    #[test]
    fn test_updates_return_old_and_new() {
        let source = "let i = 5; const a = i++; const b = ++i; const o = { v: 1 }; o.v--; console.log(a, b, i, o.v);";
        assert_eq!(run(source).unwrap(), ["5 7 7 0"]);
    }

    #[test]
    fn test_value_of_and_to_string() {
        let source = "
            const money = { valueOf() { return 42; }, toString() { return '$42'; } };
            const k = {}; k[money] = 1;
            console.log(money + 1, money * 2, k['$42']);
        ";
        assert_eq!(run(source).unwrap(), ["43 84 1"]);
    }

    #[test]
    fn test_in_and_instanceof() {
        let source = "
            function A() {} const a = new A();
            console.log('x' in { x: 1 }, 'y' in { x: 1 }, a instanceof A, 1 instanceof A);
        ";
        assert_eq!(run(source).unwrap(), ["true false true false"]);
        assert_eq!(
            run("1 in 2;").unwrap_err(),
            RuntimeError::InvalidOperand {
                operator: "in",
                expected: "an object"
            }
        );
    }

    #[test]
    fn test_string_properties() {
        assert_eq!(log("'hello'.length, 'hello'[1]"), "5 e");
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            run("nope;").unwrap_err(),
            RuntimeError::UnknownIdentifier {
                name: "nope".to_string()
            }
        );
        assert_eq!(
            run("const c = 1; c = 2;").unwrap_err(),
            RuntimeError::ConstAssignment {
                name: "c".to_string()
            }
        );
        assert_eq!(
            run("null.x;").unwrap_err(),
            RuntimeError::PropertyOfNullish {
                property: "x".to_string(),
                base: "null"
            }
        );
        assert_eq!(
            run("(1)();").unwrap_err(),
            RuntimeError::NotCallable { kind: "number" }
        );
        assert_eq!(
            run("+Symbol.for('a');").unwrap_err(),
            RuntimeError::InvalidConversion {
                from: "symbol",
                to: "number"
            }
        );
    }

    #[test]
    fn test_delete() {
        assert_eq!(
            run("const o = { a: 1 }; console.log(delete o.a, 'a' in o);").unwrap(),
            ["true false"]
        );
    }
}
