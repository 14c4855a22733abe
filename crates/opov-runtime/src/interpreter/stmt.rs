//! Statement execution.

use super::{Flow, Interpreter};
use crate::env::Env;
use crate::error::Result;
use crate::value::{Callable, Closure, ClosureCode, ObjectRef, PropertyKey, Value};
use opov_syntax::ast::{ForInit, Function, Stmt, VarDecl, VarKind};
use std::rc::Rc;

impl Interpreter {
    /// Runs a statement list in `env`. Function declarations are hoisted to
    /// the top of the list.
    pub(crate) fn exec_stmts(&mut self, stmts: &[Stmt], env: &Env) -> Result<Flow> {
        for stmt in stmts {
            if let Stmt::Function(func) = stmt {
                if let Some(name) = func.name {
                    let value = self.make_function(func, env);
                    env.declare(name, value, true);
                }
            }
        }

        for stmt in stmts {
            match self.exec_stmt(stmt, env)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, env: &Env) -> Result<Flow> {
        match stmt {
            Stmt::Expr { expr, .. } => {
                self.eval(expr, env)?;
            }
            Stmt::VarDecl(decl) => self.exec_var_decl(decl, env)?,
            Stmt::Block(block) => return self.exec_stmts(&block.body, &env.child()),
            Stmt::If {
                test,
                consequent,
                alternate,
                ..
            } => {
                if self.eval(test, env)?.is_truthy() {
                    return self.exec_stmt(consequent, env);
                }
                if let Some(alternate) = alternate {
                    return self.exec_stmt(alternate, env);
                }
            }
            Stmt::While { test, body, .. } => {
                while self.eval(test, env)?.is_truthy() {
                    match self.exec_stmt(body, env)? {
                        Flow::Break => break,
                        Flow::Normal | Flow::Continue => {}
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
            }
            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => {
                let loop_env = env.child();
                match init {
                    Some(ForInit::VarDecl(decl)) => self.exec_var_decl(decl, &loop_env)?,
                    Some(ForInit::Expr(expr)) => {
                        self.eval(expr, &loop_env)?;
                    }
                    None => {}
                }

                loop {
                    if let Some(test) = test {
                        if !self.eval(test, &loop_env)?.is_truthy() {
                            break;
                        }
                    }
                    match self.exec_stmt(body, &loop_env)? {
                        Flow::Break => break,
                        Flow::Normal | Flow::Continue => {}
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                    if let Some(update) = update {
                        self.eval(update, &loop_env)?;
                    }
                }
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr, env)?,
                    None => Value::Undefined,
                };
                return Ok(Flow::Return(value));
            }
            Stmt::Break { .. } => return Ok(Flow::Break),
            Stmt::Continue { .. } => return Ok(Flow::Continue),
            Stmt::Import(decl) => self.import(decl, env)?,
            // Hoisted by `exec_stmts`.
            Stmt::Function(_) | Stmt::Empty { .. } => {}
        }
        Ok(Flow::Normal)
    }

    fn exec_var_decl(&mut self, decl: &VarDecl, env: &Env) -> Result<()> {
        for declarator in &decl.declarators {
            let value = match &declarator.init {
                Some(init) => Some(self.eval(init, env)?),
                None => None,
            };

            match decl.kind {
                VarKind::Var => {
                    let scope = env.var_scope();
                    match value {
                        Some(value) => scope.declare(declarator.name, value, true),
                        None if !scope.has(declarator.name) => {
                            scope.declare(declarator.name, Value::Undefined, true);
                        }
                        None => {}
                    }
                }
                kind => env.declare(
                    declarator.name,
                    value.unwrap_or_default(),
                    kind != VarKind::Const,
                ),
            }
        }
        Ok(())
    }

    /// Creates a function object for a `function` declaration or expression,
    /// with a fresh `prototype` object.
    pub(crate) fn make_function(&self, func: &Function, env: &Env) -> Value {
        let closure = Closure {
            code: ClosureCode::Function(Rc::new(func.clone())),
            env: env.clone(),
        };
        let obj = ObjectRef::function(Callable::Closure(Rc::new(closure)));
        obj.set(
            PropertyKey::named("prototype"),
            Value::Object(ObjectRef::ordinary()),
        );
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use crate::Interpreter;

    fn run(source: &str) -> Vec<String> {
        let (program, interner) = opov_syntax::parse_program(source).unwrap();
        let mut interp = Interpreter::new(interner);
        interp.run(&program).unwrap();
        interp.take_output()
    }

    #[test]
    fn test_function_hoisting() {
        assert_eq!(run("console.log(twice(4)); function twice(n) { return n * 2; }"), ["8"]);
    }

    #[test]
    fn test_for_loop_with_break_and_continue() {
        let source = "
            let total = 0;
            for (let i = 0; i < 10; i++) {
                if (i % 2 == 0) continue;
                if (i > 7) break;
                total += i;
            }
            console.log(total);
        ";
        assert_eq!(run(source), ["16"]);
    }

    #[test]
    fn test_while_and_return() {
        let source = "
            function firstOver(limit) {
                let n = 1;
                while (true) { n = n * 3; if (n > limit) return n; }
            }
            console.log(firstOver(50));
        ";
        assert_eq!(run(source), ["81"]);
    }

    #[test]
    fn test_block_scoping() {
        let source = "let x = 1; { let x = 2; console.log(x); } console.log(x);";
        assert_eq!(run(source), ["2", "1"]);
    }

    #[test]
    fn test_var_is_function_scoped() {
        let source = "function f() { { var v = 3; } return v; } console.log(f());";
        assert_eq!(run(source), ["3"]);
    }
}
