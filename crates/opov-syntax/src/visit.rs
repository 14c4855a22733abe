//! Mutable AST traversal.
//!
//! Implement [`VisitMut`] for a pass and override only the methods for the
//! nodes it cares about. Call the matching `walk_*` function inside an
//! override to keep the default recursion; omit it to prune the traversal
//! at that node.
//!
//! ```
//! use opov_syntax::ast::Expr;
//! use opov_syntax::visit::{VisitMut, walk_expr};
//! use opov_syntax::parse_program;
//!
//! struct CountIdents(usize);
//!
//! impl VisitMut for CountIdents {
//!     fn visit_expr(&mut self, expr: &mut Expr) {
//!         if let Expr::Identifier { .. } = expr {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//!
//! let (mut program, _) = parse_program("a + b * c;").unwrap();
//! let mut counter = CountIdents(0);
//! counter.visit_program(&mut program);
//! assert_eq!(counter.0, 3);
//! ```

use crate::ast::{
    ArrowBody, ArrowFunction, Block, Expr, ForInit, Function, MemberProp, Program, PropKey, Stmt,
    VarDecl,
};

/// In-place AST visitor. Default implementations recurse into all children
/// in source order.
pub trait VisitMut: Sized {
    /// Visits a compile unit.
    fn visit_program(&mut self, program: &mut Program) {
        walk_program(self, program);
    }

    /// Visits a braced statement list, including function and arrow bodies.
    fn visit_block(&mut self, block: &mut Block) {
        walk_block(self, block);
    }

    /// Visits a statement.
    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt(self, stmt);
    }

    /// Visits a variable declaration.
    fn visit_var_decl(&mut self, decl: &mut VarDecl) {
        walk_var_decl(self, decl);
    }

    /// Visits a function declaration or expression.
    fn visit_function(&mut self, func: &mut Function) {
        walk_function(self, func);
    }

    /// Visits an arrow function.
    fn visit_arrow(&mut self, arrow: &mut ArrowFunction) {
        walk_arrow(self, arrow);
    }

    /// Visits an expression.
    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr);
    }
}

/// Visits every top-level statement.
pub fn walk_program<V: VisitMut>(visitor: &mut V, program: &mut Program) {
    for stmt in &mut program.body {
        visitor.visit_stmt(stmt);
    }
}

/// Visits every statement of a block.
pub fn walk_block<V: VisitMut>(visitor: &mut V, block: &mut Block) {
    for stmt in &mut block.body {
        visitor.visit_stmt(stmt);
    }
}

/// Visits the children of a statement.
pub fn walk_stmt<V: VisitMut>(visitor: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::Expr { expr, .. } => visitor.visit_expr(expr),
        Stmt::VarDecl(decl) => visitor.visit_var_decl(decl),
        Stmt::Block(block) => visitor.visit_block(block),
        Stmt::If {
            test,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expr(test);
            visitor.visit_stmt(consequent);
            if let Some(alternate) = alternate {
                visitor.visit_stmt(alternate);
            }
        }
        Stmt::While { test, body, .. } => {
            visitor.visit_expr(test);
            visitor.visit_stmt(body);
        }
        Stmt::For {
            init,
            test,
            update,
            body,
            ..
        } => {
            match init {
                Some(ForInit::VarDecl(decl)) => visitor.visit_var_decl(decl),
                Some(ForInit::Expr(expr)) => visitor.visit_expr(expr),
                None => {}
            }
            if let Some(test) = test {
                visitor.visit_expr(test);
            }
            if let Some(update) = update {
                visitor.visit_expr(update);
            }
            visitor.visit_stmt(body);
        }
        Stmt::Return { value, .. } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Function(func) => visitor.visit_function(func),
        Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Import(_) | Stmt::Empty { .. } => {}
    }
}

/// Visits declarator initializers.
pub fn walk_var_decl<V: VisitMut>(visitor: &mut V, decl: &mut VarDecl) {
    for declarator in &mut decl.declarators {
        if let Some(init) = &mut declarator.init {
            visitor.visit_expr(init);
        }
    }
}

/// Visits a function body.
pub fn walk_function<V: VisitMut>(visitor: &mut V, func: &mut Function) {
    visitor.visit_block(&mut func.body);
}

/// Visits an arrow body.
pub fn walk_arrow<V: VisitMut>(visitor: &mut V, arrow: &mut ArrowFunction) {
    match &mut arrow.body {
        ArrowBody::Block(block) => visitor.visit_block(block),
        ArrowBody::Expr(expr) => visitor.visit_expr(expr),
    }
}

/// Visits the children of an expression, left to right.
pub fn walk_expr<V: VisitMut>(visitor: &mut V, expr: &mut Expr) {
    match expr {
        Expr::Number { .. }
        | Expr::String { .. }
        | Expr::Bool { .. }
        | Expr::Null { .. }
        | Expr::Identifier { .. }
        | Expr::This { .. } => {}
        Expr::Array { elements, .. } => {
            for element in elements {
                visitor.visit_expr(element);
            }
        }
        Expr::Object { props, .. } => {
            for prop in props {
                if let PropKey::Computed(key) = &mut prop.key {
                    visitor.visit_expr(key);
                }
                visitor.visit_expr(&mut prop.value);
            }
        }
        Expr::Function(func) => visitor.visit_function(func),
        Expr::Arrow(arrow) => visitor.visit_arrow(arrow),
        Expr::Unary { operand, .. } => visitor.visit_expr(operand),
        Expr::Update { target, .. } => visitor.visit_expr(target),
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Assign { target, value, .. } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expr(test);
            visitor.visit_expr(consequent);
            visitor.visit_expr(alternate);
        }
        Expr::Call { callee, args, .. } | Expr::New { callee, args, .. } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Member {
            object, property, ..
        } => {
            visitor.visit_expr(object);
            if let MemberProp::Computed(key) = property {
                visitor.visit_expr(key);
            }
        }
        Expr::Sequence { exprs, .. } => {
            for expr in exprs {
                visitor.visit_expr(expr);
            }
        }
        Expr::Generated(inner) => visitor.visit_expr(inner),
    }
}
