//! Tree-walking evaluator.
//!
//! [`Interpreter`] runs a parsed [`Program`] directly from the AST. It owns
//! the program's interner (identifiers are looked up by [`Symbol`]), the
//! realm's symbol registry, and the captured `console.log` output.
//!
//! # Example
//!
//! ```
//! use opov_runtime::Interpreter;
//!
//! let (program, interner) = opov_syntax::parse_program("console.log(1 + 2, 'x' + 1);").unwrap();
//! let mut interp = Interpreter::new(interner);
//! interp.run(&program).unwrap();
//! assert_eq!(interp.output(), ["3 x1"]);
//! ```

mod builtins;
mod expr;
mod stmt;

use crate::capability::{self, Overloadable, POLYFILL_MODULE};
use crate::env::Env;
use crate::error::{Result, RuntimeError};
use crate::symbol::SymbolRegistry;
use crate::value::{Callable, ClosureCode, ObjectRef, PropertyKey, Value, format_number};
use fxhash::FxHashMap;
use opov_mem::{StringInterner, Symbol};
use opov_syntax::ast::{ImportDecl, Program};

/// Default limit on nested calls.
pub const DEFAULT_MAX_DEPTH: u32 = 256;

/// Outcome of executing a statement.
pub(crate) enum Flow {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// The evaluator and its realm.
pub struct Interpreter {
    interner: StringInterner,
    globals: Env,
    symbols: SymbolRegistry,
    modules: FxHashMap<String, Value>,
    output: Vec<String>,
    depth: u32,
    max_depth: u32,
}

impl Interpreter {
    /// Creates an interpreter for programs parsed with `interner`.
    #[must_use]
    pub fn new(interner: StringInterner) -> Self {
        let mut interp = Self {
            interner,
            globals: Env::global(),
            symbols: SymbolRegistry::new(),
            modules: FxHashMap::default(),
            output: Vec::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        };
        builtins::install(&mut interp);
        interp
    }

    /// Sets the nested-call limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Runs a program's top-level statements in the global scope.
    ///
    /// # Errors
    ///
    /// Returns the first runtime error.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        let globals = self.globals.clone();
        self.exec_stmts(&program.body, &globals)?;
        Ok(())
    }

    /// Lines written by `console.log`, oldest first.
    #[must_use]
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Takes the captured output, leaving it empty.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// The interner identifiers are resolved with.
    #[must_use]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// The realm's symbol registry.
    pub fn symbols(&mut self) -> &mut SymbolRegistry {
        &mut self.symbols
    }

    /// Makes `value` importable under `module`.
    pub fn register_module(&mut self, module: &str, value: Value) {
        self.modules.insert(module.to_string(), value);
    }

    /// Reads a global binding by name.
    #[must_use]
    pub fn global(&self, name: &str) -> Option<Value> {
        self.interner.get(name).and_then(|sym| self.globals.get(sym))
    }

    /// Creates or replaces a global binding.
    pub fn set_global(&mut self, name: &str, value: Value) {
        let sym = self.interner.intern(name);
        self.globals.declare(sym, value, true);
    }

    /// The capability `value` registers for `protocol_key`, if any.
    pub fn capability(&mut self, value: &Value, protocol_key: &str) -> Option<Callable> {
        let key = self.symbols.register(protocol_key);
        value.try_get_capability(key)
    }

    /// Calls a function value.
    ///
    /// # Errors
    ///
    /// Fails if `callee` is not callable, if the call nests deeper than the
    /// limit, or with whatever error the function body raises.
    pub fn call(&mut self, callee: &Value, this: Value, args: Vec<Value>) -> Result<Value> {
        let callable = callee.as_callable().ok_or(RuntimeError::NotCallable {
            kind: callee.type_of(),
        })?;
        self.call_callable(&callable, this, args)
    }

    /// Calls a function.
    ///
    /// # Errors
    ///
    /// Fails if the call nests deeper than the limit, or with whatever error
    /// the function body raises.
    pub fn call_callable(
        &mut self,
        callable: &Callable,
        this: Value,
        args: Vec<Value>,
    ) -> Result<Value> {
        if self.depth >= self.max_depth {
            return Err(RuntimeError::StackOverflow { depth: self.depth });
        }

        self.depth += 1;
        let result = self.invoke(callable, this, args);
        self.depth -= 1;
        result
    }

    fn invoke(&mut self, callable: &Callable, this: Value, args: Vec<Value>) -> Result<Value> {
        let closure = match callable {
            Callable::Native(native) => return (native.func)(self, this, &args),
            Callable::Closure(closure) => closure,
        };

        match &closure.code {
            ClosureCode::Function(func) => {
                let env = closure.env.function_child(Some(this));
                bind_params(&env, &func.params, args);
                match self.exec_stmts(&func.body.body, &env)? {
                    Flow::Return(value) => Ok(value),
                    Flow::Normal | Flow::Break | Flow::Continue => Ok(Value::Undefined),
                }
            }
            ClosureCode::Arrow(arrow) => {
                let env = closure.env.function_child(None);
                bind_params(&env, &arrow.params, args);
                match &arrow.body {
                    opov_syntax::ast::ArrowBody::Expr(body) => self.eval(body, &env),
                    opov_syntax::ast::ArrowBody::Block(block) => {
                        match self.exec_stmts(&block.body, &env)? {
                            Flow::Return(value) => Ok(value),
                            Flow::Normal | Flow::Break | Flow::Continue => Ok(Value::Undefined),
                        }
                    }
                }
            }
        }
    }

    /// `new callee(...args)`.
    pub(crate) fn construct(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value> {
        let callable = callee.as_callable().ok_or(RuntimeError::NotConstructor {
            kind: callee.type_of(),
        })?;
        if !callable.is_constructor() {
            return Err(RuntimeError::NotConstructor {
                kind: "arrow function",
            });
        }

        let instance = ObjectRef::ordinary();
        if let Some(Value::Object(proto)) = callee
            .as_object()
            .and_then(|ctor| ctor.get(&PropertyKey::named("prototype")))
        {
            instance.set_proto(Some(proto));
        }

        let result = self.call_callable(&callable, Value::Object(instance.clone()), args)?;
        Ok(match result {
            Value::Object(obj) => Value::Object(obj),
            _ => Value::Object(instance),
        })
    }

    fn import(&mut self, decl: &ImportDecl, env: &Env) -> Result<()> {
        let module = self.name(decl.source).to_string();

        let value = if module == POLYFILL_MODULE {
            capability::register_protocol_keys(&mut self.symbols);
            opov_log::debug!("registered {} protocol keys", capability::PROTOCOL_KEYS.len());
            Value::Undefined
        } else {
            self.modules
                .get(&module)
                .cloned()
                .ok_or(RuntimeError::ImportNotFound { module })?
        };

        if let Some(name) = decl.default {
            env.declare(name, value, false);
        }
        Ok(())
    }

    /// Resolves an interned name.
    fn name(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym).unwrap_or("")
    }

    /// String form used by `console.log`: like `ToString`, but symbols and
    /// objects without a usable `toString` print instead of failing.
    pub(crate) fn display(&mut self, value: &Value) -> Result<String> {
        Ok(match value {
            Value::Symbol(id) => format!("Symbol({})", self.symbols.key_for(*id).unwrap_or("")),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.to_string(),
            other => {
                let primitive = self.to_primitive(other)?;
                match primitive {
                    Value::Symbol(_) => self.display(&primitive)?,
                    primitive => self.to_string(&primitive)?,
                }
            }
        })
    }
}

fn bind_params(env: &Env, params: &[Symbol], args: Vec<Value>) {
    let mut args = args.into_iter();
    for param in params {
        env.declare(*param, args.next().unwrap_or_default(), true);
    }
}
