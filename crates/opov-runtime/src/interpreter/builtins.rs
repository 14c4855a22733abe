//! The global object: `undefined`, `NaN`, `Infinity`, `Symbol`, `console`,
//! `Math`, `String`, and `Number`.

use super::Interpreter;
use crate::error::Result;
use crate::value::{Callable, Native, NativeFn, ObjectRef, PropertyKey, Value};

pub(super) fn install(interp: &mut Interpreter) {
    interp.define_const("undefined", Value::Undefined);
    interp.define_const("NaN", Value::Number(f64::NAN));
    interp.define_const("Infinity", Value::Number(f64::INFINITY));

    let symbol = namespace(&[("for", symbol_for), ("keyFor", symbol_key_for)]);
    interp.define_const("Symbol", symbol);

    let console = namespace(&[("log", console_log)]);
    interp.define_const("console", console);

    let math = namespace(&[
        ("abs", math_abs),
        ("floor", math_floor),
        ("sqrt", math_sqrt),
        ("max", math_max),
        ("min", math_min),
    ]);
    interp.define_const("Math", math);

    interp.define_const("String", function("String", to_string));
    interp.define_const("Number", function("Number", to_number));
}

impl Interpreter {
    fn define_const(&mut self, name: &str, value: Value) {
        let sym = self.interner.intern(name);
        self.globals.declare(sym, value, false);
    }
}

fn function(name: &'static str, func: NativeFn) -> Value {
    Value::Object(ObjectRef::function(Callable::Native(Native { name, func })))
}

fn namespace(methods: &[(&'static str, NativeFn)]) -> Value {
    let obj = ObjectRef::ordinary();
    for (name, func) in methods {
        obj.set(PropertyKey::named(name), function(*name, *func));
    }
    Value::Object(obj)
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

fn symbol_for(interp: &mut Interpreter, _: Value, args: &[Value]) -> Result<Value> {
    let key = interp.to_string(&arg(args, 0))?;
    Ok(Value::Symbol(interp.symbols.register(&key)))
}

fn symbol_key_for(interp: &mut Interpreter, _: Value, args: &[Value]) -> Result<Value> {
    Ok(match arg(args, 0) {
        Value::Symbol(id) => interp
            .symbols
            .key_for(id)
            .map_or(Value::Undefined, Value::string),
        _ => Value::Undefined,
    })
}

fn console_log(interp: &mut Interpreter, _: Value, args: &[Value]) -> Result<Value> {
    let parts = args
        .iter()
        .map(|value| interp.display(value))
        .collect::<Result<Vec<_>>>()?;
    let line = parts.join(" ");
    opov_log::trace!("console.log: {}", line);
    interp.output.push(line);
    Ok(Value::Undefined)
}

fn math_abs(interp: &mut Interpreter, _: Value, args: &[Value]) -> Result<Value> {
    Ok(Value::Number(interp.to_number(&arg(args, 0))?.abs()))
}

fn math_floor(interp: &mut Interpreter, _: Value, args: &[Value]) -> Result<Value> {
    Ok(Value::Number(interp.to_number(&arg(args, 0))?.floor()))
}

fn math_sqrt(interp: &mut Interpreter, _: Value, args: &[Value]) -> Result<Value> {
    Ok(Value::Number(interp.to_number(&arg(args, 0))?.sqrt()))
}

fn math_max(interp: &mut Interpreter, _: Value, args: &[Value]) -> Result<Value> {
    fold(interp, args, f64::NEG_INFINITY, f64::max)
}

fn math_min(interp: &mut Interpreter, _: Value, args: &[Value]) -> Result<Value> {
    fold(interp, args, f64::INFINITY, f64::min)
}

/// `Math.max`/`Math.min`: any `NaN` argument makes the result `NaN`.
fn fold(interp: &mut Interpreter, args: &[Value], init: f64, pick: fn(f64, f64) -> f64) -> Result<Value> {
    let mut acc = init;
    for value in args {
        let n = interp.to_number(value)?;
        if n.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        acc = pick(acc, n);
    }
    Ok(Value::Number(acc))
}

fn to_string(interp: &mut Interpreter, _: Value, args: &[Value]) -> Result<Value> {
    Ok(match args.first() {
        Some(value) => Value::string(&interp.display(value)?),
        None => Value::string(""),
    })
}

fn to_number(interp: &mut Interpreter, _: Value, args: &[Value]) -> Result<Value> {
    Ok(match args.first() {
        Some(value) => Value::Number(interp.to_number(value)?),
        None => Value::Number(0.0),
    })
}
