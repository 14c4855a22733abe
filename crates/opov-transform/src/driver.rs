//! The pass driver.
//!
//! [`PassDriver`] is a [`VisitMut`] that walks one compile unit in document
//! order. Programs and blocks are scopes: entering one reads its directive
//! prologue and pushes onto the [`ScopeStack`] through a [`ScopeGuard`], so
//! the frames come off again when the scope's traversal ends.
//!
//! Expressions are rewritten post-order. A node's operands are visited (and
//! possibly rewritten) before the node itself is offered to the
//! [`Rewriter`], and `Generated` subtrees are skipped entirely.

use crate::catalog::{Arity, POLYFILL_MODULE};
use crate::directive::{Override, scope_override};
use crate::options::TransformOptions;
use crate::rewrite::{Rewriter, ValueUse};
use crate::scope::{ScopeGuard, ScopeStack};
use opov_mem::StringInterner;
use opov_syntax::Span;
use opov_syntax::ast::{Block, Expr, ForInit, ImportDecl, Program, Stmt};
use opov_syntax::visit::{VisitMut, walk_block, walk_expr, walk_program, walk_stmt, walk_var_decl};
use std::fmt;

/// What a pass over one unit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformReport {
    /// Binary expressions rewritten
    pub binary: usize,
    /// Unary expressions rewritten
    pub unary: usize,
    /// Increments and decrements rewritten
    pub update: usize,
    /// Compound assignments rewritten
    pub compound: usize,
    /// The support import was added
    pub import_injected: bool,
}

impl TransformReport {
    /// Total number of rewrites.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.binary + self.unary + self.update + self.compound
    }

    /// Number of rewrites of one arity.
    #[must_use]
    pub const fn count(&self, arity: Arity) -> usize {
        match arity {
            Arity::Binary => self.binary,
            Arity::Unary => self.unary,
            Arity::Update => self.update,
            Arity::CompoundAssign => self.compound,
        }
    }

    fn record(&mut self, arity: Arity) {
        match arity {
            Arity::Binary => self.binary += 1,
            Arity::Unary => self.unary += 1,
            Arity::Update => self.update += 1,
            Arity::CompoundAssign => self.compound += 1,
        }
    }
}

impl fmt::Display for TransformReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rewrites (binary {}, unary {}, update {}, compound {})",
            self.total(),
            self.binary,
            self.unary,
            self.update,
            self.compound
        )?;
        if self.import_injected {
            f.write_str(", import injected")?;
        }
        Ok(())
    }
}

/// Per-unit traversal state.
pub struct PassContext<'a> {
    /// Enablement at the current depth
    pub scopes: ScopeStack,
    /// Builder for replacement subtrees
    pub rewriter: Rewriter<'a>,
    /// Running totals
    pub report: TransformReport,
}

impl<'a> PassContext<'a> {
    /// Creates fresh state over the unit's interner.
    pub fn new(interner: &'a mut StringInterner) -> Self {
        Self {
            scopes: ScopeStack::new(),
            rewriter: Rewriter::new(interner),
            report: TransformReport::default(),
        }
    }
}

/// Visitor that runs the pass over one unit.
pub struct PassDriver<'a> {
    cx: PassContext<'a>,
    options: TransformOptions,
}

impl<'a> PassDriver<'a> {
    /// Creates a driver for one unit.
    pub fn new(interner: &'a mut StringInterner, options: TransformOptions) -> Self {
        Self {
            cx: PassContext::new(interner),
            options,
        }
    }

    /// Runs the pass over `program` and returns the report.
    pub fn run(mut self, program: &mut Program) -> TransformReport {
        self.visit_program(program);
        self.cx.report
    }

    /// Visits an expression whose value is used as `usage` says, then
    /// offers it to the rewriter.
    fn visit_value(&mut self, expr: &mut Expr, usage: ValueUse) {
        if expr.is_generated() {
            return;
        }

        if let Expr::Sequence { exprs, .. } = expr {
            let last = exprs.len().saturating_sub(1);
            for (i, item) in exprs.iter_mut().enumerate() {
                let item_use = if i == last { usage } else { ValueUse::Discarded };
                self.visit_value(item, item_use);
            }
            return;
        }

        walk_expr(self, expr);
        if let Some(arity) = self.cx.rewriter.rewrite(expr, &self.cx.scopes, usage) {
            self.cx.report.record(arity);
        }
    }

    fn inject_import(&mut self, program: &mut Program) {
        let source = self.cx.rewriter.interner().intern(POLYFILL_MODULE);
        if program.imports(source) {
            opov_log::debug!("unit already imports '{}'", POLYFILL_MODULE);
            return;
        }

        let span = Span::default();
        program.body.insert(
            0,
            Stmt::Import(ImportDecl {
                default: None,
                source,
                span,
            }),
        );
        self.cx.report.import_injected = true;
    }
}

impl AsMut<ScopeStack> for PassDriver<'_> {
    fn as_mut(&mut self) -> &mut ScopeStack {
        &mut self.cx.scopes
    }
}

impl VisitMut for PassDriver<'_> {
    fn visit_program(&mut self, program: &mut Program) {
        let over = scope_override(&program.directives, self.cx.rewriter.interner());
        self.cx.scopes.enter_unit(over, self.options.enabled_by_default);
        opov_log::debug!(
            "unit directive {}, rewriting {}",
            over,
            if self.cx.scopes.is_active() { "on" } else { "off" }
        );

        walk_program(self, program);
        self.cx.scopes.exit(1);
        debug_assert!(self.cx.scopes.is_empty(), "unbalanced scope stack");

        if self.cx.report.total() > 0 {
            self.inject_import(program);
        }
        opov_log::debug!("{}", self.cx.report);
    }

    fn visit_block(&mut self, block: &mut Block) {
        let over = scope_override(&block.directives, self.cx.rewriter.interner());
        if over != Override::Inherit {
            opov_log::trace!("block at {} is {}", block.span, over);
        }

        let mut guard = ScopeGuard::enter(self, over);
        walk_block(&mut *guard, block);
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Expr { expr, .. } => self.visit_value(expr, ValueUse::Discarded),
            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => {
                match init {
                    Some(ForInit::VarDecl(decl)) => walk_var_decl(self, decl),
                    Some(ForInit::Expr(expr)) => self.visit_value(expr, ValueUse::Discarded),
                    None => {}
                }
                if let Some(test) = test {
                    self.visit_expr(test);
                }
                if let Some(update) = update {
                    self.visit_value(update, ValueUse::Discarded);
                }
                self.visit_stmt(body);
            }
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        self.visit_value(expr, ValueUse::Consumed);
    }
}

/// Runs the operator-overload pass over one compile unit.
///
/// `interner` must be the one the program was parsed with; generated
/// binding names are chosen so they clash with none of its identifiers.
/// The pass never fails: anything it does not recognize is left as is.
///
/// # Examples
///
/// ```
/// use opov_transform::{transform_program, TransformOptions};
///
/// let (mut program, mut interner) =
///     opov_syntax::parse_program("'operator-overload enabled'; a + b; a === b;").unwrap();
/// let report = transform_program(&mut program, &mut interner, &TransformOptions::default());
///
/// assert_eq!(report.binary, 1);
/// assert!(report.import_injected);
/// ```
pub fn transform_program(
    program: &mut Program,
    interner: &mut StringInterner,
    options: &TransformOptions,
) -> TransformReport {
    PassDriver::new(interner, *options).run(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opov_syntax::pretty::print_program;

    fn run(source: &str, options: TransformOptions) -> (String, TransformReport) {
        let (mut program, mut interner) = opov_syntax::parse_program(source).unwrap();
        let report = transform_program(&mut program, &mut interner, &options);
        (print_program(&program, &interner), report)
    }

    #[test]
    fn test_post_order_rewrites_operands_first() {
        let (text, report) = run("a + b * c;", TransformOptions::default());
        assert_eq!(report.binary, 2);
        assert!(text.contains("_lhs * _rhs;\n})(b, c));\n"));
    }

    #[test]
    fn test_default_disabled_unit() {
        let (text, report) = run("a + b;", TransformOptions::opt_in());
        assert_eq!(report.total(), 0);
        assert!(!report.import_injected);
        assert_eq!(text, "a + b;\n");
    }

    #[test]
    fn test_block_scope_is_restored() {
        let source = "a + b; { 'operator-overload disabled'; a + b; } a + b;";
        let (text, report) = run(source, TransformOptions::default());
        assert_eq!(report.binary, 2);
        assert!(text.contains("{\n  \"operator-overload disabled\";\n  a + b;\n}\n"));
    }

    #[test]
    fn test_function_body_is_a_scope() {
        let source = "'operator-overload disabled'; function f() { 'operator-overload enabled'; return x - y; } x - y;";
        let (text, report) = run(source, TransformOptions::default());
        assert_eq!(report.binary, 1);
        assert!(text.ends_with("x - y;\n"));
    }

    #[test]
    fn test_for_update_is_discarded_context() {
        let (text, report) = run("for (let i = 0; i < n; i++) {}", TransformOptions::default());
        assert_eq!(report.update, 1);
        assert_eq!(report.binary, 1);
        assert!(!text.contains("_old"));
        assert!(text.contains("; i = ((_arg) => {"));
    }

    #[test]
    fn test_sequence_discards_all_but_last() {
        let (text, report) = run("y = (i++, j++);", TransformOptions::default());
        assert_eq!(report.update, 2);
        // Only the consumed element needs the saved old value.
        assert_eq!(text.matches("const _old").count(), 1);
    }

    #[test]
    fn test_existing_import_not_duplicated() {
        let source = "import 'operator-overload-polyfills'; a + b;";
        let (text, report) = run(source, TransformOptions::default());
        assert_eq!(report.binary, 1);
        assert!(!report.import_injected);
        assert_eq!(text.matches("import").count(), 1);
    }

    #[test]
    fn test_import_follows_directives() {
        let (text, _) = run("'use strict'; a * 2;", TransformOptions::default());
        assert!(text.starts_with("\"use strict\";\nimport \"operator-overload-polyfills\";\n"));
    }

    #[test]
    fn test_report_display() {
        let report = TransformReport {
            binary: 2,
            update: 1,
            import_injected: true,
            ..TransformReport::default()
        };
        assert_eq!(
            report.to_string(),
            "3 rewrites (binary 2, unary 0, update 1, compound 0), import injected"
        );
        assert_eq!(report.count(Arity::Update), 1);
    }
}
