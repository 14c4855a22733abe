//! Expression rewriting.
//!
//! [`Rewriter`] turns one operator expression into its capability-checked
//! dispatch. Every operand is passed to an immediately invoked arrow, so it
//! is evaluated exactly once and in source order:
//!
//! ```text
//! a + b
//! ((_lhs, _rhs) => {
//!   "operator-overload disabled";
//!   return _lhs !== undefined && _lhs !== null && _lhs[Symbol.for("+")] ? _lhs[Symbol.for("+")](_rhs) : _lhs + _rhs;
//! })(a, b)
//! ```
//!
//! Assignment targets are split into a [`Place`] whose object and key are
//! bound once, then read and written through the bindings.
//!
//! The result is wrapped in [`Expr::Generated`], and every generated block
//! body opens with the `disabled` directive, so neither a second pass over
//! the tree nor one over its printed text rewrites it again.

use crate::catalog::{self, Arity, Operator, OperatorEntry};
use crate::directive::DISABLED_DIRECTIVE;
use crate::scope::ScopeStack;
use hashbrown::HashMap;
use opov_mem::{StringInterner, Symbol};
use opov_syntax::Span;
use opov_syntax::ast::{
    ArrowBody, ArrowFunction, AssignOp, BinaryOp, Block, Declarator, Directive, Expr, Fixity,
    MemberProp, Stmt, UnaryOp, UpdateOp, VarDecl, VarKind,
};

/// Whether the surrounding code uses an expression's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueUse {
    /// The value flows into an enclosing expression
    Consumed,
    /// The value is dropped: expression statements, `for` updates, and
    /// all but the last element of a sequence
    Discarded,
}

/// An assignment target with its object and key bound to fresh names.
enum Place {
    Ident(Symbol),
    Named { object: Expr, name: Symbol },
    Computed { object: Expr, key: Expr },
}

/// Builds dispatch subtrees for one compile unit.
pub struct Rewriter<'a> {
    interner: &'a mut StringInterner,
    /// Hygienic binding names, allocated once per unit
    bindings: HashMap<&'static str, Symbol>,
}

impl<'a> Rewriter<'a> {
    /// Creates a rewriter over the unit's interner.
    pub fn new(interner: &'a mut StringInterner) -> Self {
        Self {
            interner,
            bindings: HashMap::new(),
        }
    }

    /// Returns the interner.
    pub fn interner(&mut self) -> &mut StringInterner {
        self.interner
    }

    /// Rewrites `expr` in place if it is a catalogued, non-excluded operator
    /// expression in an active scope. Returns the arity of the rewrite.
    ///
    /// Operands are taken as they are; callers rewrite them first.
    pub fn rewrite(
        &mut self,
        expr: &mut Expr,
        scopes: &ScopeStack,
        usage: ValueUse,
    ) -> Option<Arity> {
        if !scopes.is_active() {
            return None;
        }

        let entry = rewritable_entry(expr)?;
        let (rewritten, arity) = match expr {
            Expr::Binary {
                op,
                left,
                right,
                span,
            } => (
                self.binary_dispatch(*op, entry.key, take(left), take(right), *span),
                Arity::Binary,
            ),
            Expr::Unary { op, operand, span } => (
                self.unary_dispatch(*op, entry.key, take(operand), *span),
                Arity::Unary,
            ),
            Expr::Update {
                op,
                fixity,
                target,
                span,
            } => (
                self.update(*op, *fixity, entry.key, take(target), usage, *span),
                Arity::Update,
            ),
            Expr::Assign {
                op,
                target,
                value,
                span,
            } => {
                let Some(bin) = op.binary_op() else {
                    unreachable!("'{op}' has no binary form, so the catalog excludes it");
                };
                (
                    self.compound(bin, entry.key, take(target), take(value), *span),
                    Arity::CompoundAssign,
                )
            }
            _ => unreachable!("the catalog only lists operator expressions"),
        };

        opov_log::trace!("rewrote {} '{}' as {}", arity, entry.token, entry.key);
        *expr = Expr::Generated(Box::new(rewritten));
        Some(arity)
    }

    /// Returns the unit's binding named after `base`, allocating it on
    /// first use.
    fn binding(&mut self, base: &'static str) -> Symbol {
        if let Some(sym) = self.bindings.get(base) {
            return *sym;
        }
        let sym = self.interner.fresh(base);
        self.bindings.insert(base, sym);
        sym
    }

    fn ident(&mut self, text: &str, span: Span) -> Expr {
        Expr::ident(self.interner.intern(text), span)
    }

    /// `param[Symbol.for("key")]`
    fn capability(&mut self, param: Symbol, key: &str, span: Span) -> Expr {
        let symbol = self.ident("Symbol", span);
        let for_name = self.interner.intern("for");
        let key = Expr::string(self.interner.intern(key), span);
        let registered = Expr::call(Expr::member(symbol, for_name, span), vec![key], span);
        Expr::index(Expr::ident(param, span), registered, span)
    }

    /// `param !== undefined && param !== null && param[Symbol.for("key")]`
    fn has_capability(&mut self, param: Symbol, key: &str, span: Span) -> Expr {
        let undefined = self.ident("undefined", span);
        let not_undefined = Expr::binary(
            BinaryOp::StrictNotEq,
            Expr::ident(param, span),
            undefined,
            span,
        );
        let not_null = Expr::binary(
            BinaryOp::StrictNotEq,
            Expr::ident(param, span),
            Expr::Null { span },
            span,
        );
        let capability = self.capability(param, key, span);
        Expr::binary(
            BinaryOp::And,
            Expr::binary(BinaryOp::And, not_undefined, not_null, span),
            capability,
            span,
        )
    }

    /// A block whose prologue keeps a re-run pass from touching its body.
    fn guarded_block(&mut self, body: Vec<Stmt>, span: Span) -> Block {
        let directive = Directive {
            value: self.interner.intern(DISABLED_DIRECTIVE),
            span,
        };
        Block {
            directives: vec![directive],
            body,
            span,
        }
    }

    /// `((params) => { guard; return RECEIVER has KEY ? RECEIVER[KEY](args) : fallback; })`
    fn dispatch_fn(
        &mut self,
        params: Vec<Symbol>,
        key: &str,
        args: Vec<Expr>,
        fallback: Expr,
        span: Span,
    ) -> Expr {
        let receiver = params[0];
        let test = self.has_capability(receiver, key, span);
        let call = Expr::call(self.capability(receiver, key, span), args, span);
        let choice = Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(call),
            alternate: Box::new(fallback),
            span,
        };
        let body = self.guarded_block(
            vec![Stmt::Return {
                value: Some(choice),
                span,
            }],
            span,
        );
        arrow(params, ArrowBody::Block(body), span)
    }

    fn binary_dispatch(
        &mut self,
        op: BinaryOp,
        key: &str,
        left: Expr,
        right: Expr,
        span: Span,
    ) -> Expr {
        let lhs = self.binding("_lhs");
        let rhs = self.binding("_rhs");
        let fallback = Expr::binary(op, Expr::ident(lhs, span), Expr::ident(rhs, span), span);
        let func = self.dispatch_fn(
            vec![lhs, rhs],
            key,
            vec![Expr::ident(rhs, span)],
            fallback,
            span,
        );
        Expr::call(func, vec![left, right], span)
    }

    fn unary_dispatch(&mut self, op: UnaryOp, key: &str, operand: Expr, span: Span) -> Expr {
        let arg = self.binding("_arg");
        let fallback = Expr::Unary {
            op,
            operand: Box::new(Expr::ident(arg, span)),
            span,
        };
        let func = self.dispatch_fn(vec![arg], key, Vec::new(), fallback, span);
        Expr::call(func, vec![operand], span)
    }

    /// The value to store after an update: the capability's result, or the
    /// natively updated parameter.
    fn update_dispatch(&mut self, op: UpdateOp, key: &str, current: Expr, span: Span) -> Expr {
        let arg = self.binding("_arg");
        let fallback = Expr::Update {
            op,
            fixity: Fixity::Prefix,
            target: Box::new(Expr::ident(arg, span)),
            span,
        };
        let func = self.dispatch_fn(vec![arg], key, Vec::new(), fallback, span);
        Expr::call(func, vec![current], span)
    }

    /// Splits a target into a place plus the parameters and arguments that
    /// bind its object and key. Targets that cannot be written come back
    /// unchanged as the error.
    fn place(&mut self, target: Expr) -> Result<(Place, Vec<Symbol>, Vec<Expr>), Expr> {
        match target {
            Expr::Identifier { name, .. } => Ok((Place::Ident(name), Vec::new(), Vec::new())),
            Expr::Member {
                object,
                property: MemberProp::Named(name),
                span,
            } => {
                let obj = self.binding("_obj");
                Ok((
                    Place::Named {
                        object: Expr::ident(obj, span),
                        name,
                    },
                    vec![obj],
                    vec![*object],
                ))
            }
            Expr::Member {
                object,
                property: MemberProp::Computed(key),
                span,
            } => {
                let obj = self.binding("_obj");
                let key_name = self.binding("_key");
                Ok((
                    Place::Computed {
                        object: Expr::ident(obj, span),
                        key: Expr::ident(key_name, span),
                    },
                    vec![obj, key_name],
                    vec![*object, *key],
                ))
            }
            other => Err(other),
        }
    }

    /// `t OP= v` becomes `t = D(t, v)`, with member objects and keys cached.
    fn compound(&mut self, op: BinaryOp, key: &str, target: Expr, value: Expr, span: Span) -> Expr {
        let (place, params, args) = match self.place(target) {
            Ok(parts) => parts,
            Err(target) => {
                return Expr::Assign {
                    op: compound_op(op),
                    target: Box::new(target),
                    value: Box::new(value),
                    span,
                };
            }
        };

        let current = place.read(span);
        let dispatch = self.binary_dispatch(op, key, current, value, span);
        let store = Expr::assign(place.read(span), dispatch, span);
        bind(params, args, ArrowBody::Expr(Box::new(store)), span)
    }

    fn update(
        &mut self,
        op: UpdateOp,
        fixity: Fixity,
        key: &str,
        target: Expr,
        usage: ValueUse,
        span: Span,
    ) -> Expr {
        let (place, params, args) = match self.place(target) {
            Ok(parts) => parts,
            Err(target) => {
                return Expr::Update {
                    op,
                    fixity,
                    target: Box::new(target),
                    span,
                };
            }
        };

        if fixity == Fixity::Prefix || usage == ValueUse::Discarded {
            let dispatch = self.update_dispatch(op, key, place.read(span), span);
            let store = Expr::assign(place.read(span), dispatch, span);
            return bind(params, args, ArrowBody::Expr(Box::new(store)), span);
        }

        // Consumed postfix: hand back the value read before the update.
        let old = self.binding("_old");
        let read = VarDecl {
            kind: VarKind::Const,
            declarators: vec![Declarator {
                name: old,
                init: Some(place.read(span)),
                span,
            }],
            span,
        };
        let dispatch = self.update_dispatch(op, key, Expr::ident(old, span), span);
        let store = Expr::assign(place.read(span), dispatch, span);
        let body = self.guarded_block(
            vec![
                Stmt::VarDecl(read),
                Stmt::Expr { expr: store, span },
                Stmt::Return {
                    value: Some(Expr::ident(old, span)),
                    span,
                },
            ],
            span,
        );
        Expr::call(arrow(params, ArrowBody::Block(body), span), args, span)
    }
}

impl Place {
    /// A fresh read (or write) expression for this place.
    fn read(&self, span: Span) -> Expr {
        match self {
            Place::Ident(name) => Expr::ident(*name, span),
            Place::Named { object, name } => Expr::member(object.clone(), *name, span),
            Place::Computed { object, key } => Expr::index(object.clone(), key.clone(), span),
        }
    }
}

/// Returns the catalog entry for `expr` if the pass may rewrite it.
fn rewritable_entry(expr: &Expr) -> Option<&'static OperatorEntry> {
    let op = match expr {
        Expr::Binary { op, .. } => Operator::Binary(*op),
        Expr::Unary { op, .. } => Operator::Unary(*op),
        Expr::Update { op, fixity, .. } => Operator::Update(*op, *fixity),
        Expr::Assign { op, .. } => Operator::Assign(*op),
        _ => return None,
    };
    catalog::entry(op).filter(|entry| entry.is_rewritable())
}

/// Moves a child out of its box, leaving a placeholder until the parent is
/// replaced.
fn take(slot: &mut Expr) -> Expr {
    std::mem::replace(slot, Expr::Null { span: Span::default() })
}

fn arrow(params: Vec<Symbol>, body: ArrowBody, span: Span) -> Expr {
    Expr::Arrow(Box::new(ArrowFunction { params, body, span }))
}

/// Wraps `body` in an immediately invoked arrow binding `params` to `args`,
/// or returns the body expression itself when there is nothing to bind.
fn bind(params: Vec<Symbol>, args: Vec<Expr>, body: ArrowBody, span: Span) -> Expr {
    match body {
        ArrowBody::Expr(expr) if params.is_empty() => *expr,
        body => Expr::call(arrow(params, body, span), args, span),
    }
}

fn compound_op(op: BinaryOp) -> AssignOp {
    AssignOp::ALL
        .into_iter()
        .find(|assign| assign.binary_op() == Some(op))
        .unwrap_or(AssignOp::Assign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Override;
    use opov_syntax::pretty::PrettyPrinter;

    fn active() -> ScopeStack {
        let mut scopes = ScopeStack::new();
        scopes.enter_unit(Override::Inherit, true);
        scopes
    }

    /// Parses one expression statement, rewrites its root, prints it.
    fn rewrite_root(source: &str, usage: ValueUse) -> (Option<Arity>, String) {
        let (mut program, mut interner) = opov_syntax::parse_program(source).unwrap();
        let scopes = active();
        let arity = match &mut program.body[0] {
            Stmt::Expr { expr, .. } => Rewriter::new(&mut interner).rewrite(expr, &scopes, usage),
            other => panic!("expected expression statement, found {other:?}"),
        };
        let text = PrettyPrinter::new(&interner).print_program(&program);
        (arity, text)
    }

    #[test]
    fn test_binary_shape() {
        let (arity, text) = rewrite_root("a + b;", ValueUse::Consumed);
        assert_eq!(arity, Some(Arity::Binary));
        assert_eq!(
            text,
            "((_lhs, _rhs) => {\n  \"operator-overload disabled\";\n  return _lhs !== undefined && _lhs !== null && _lhs[Symbol.for(\"+\")] ? _lhs[Symbol.for(\"+\")](_rhs) : _lhs + _rhs;\n})(a, b);\n"
        );
    }

    #[test]
    fn test_unary_shape() {
        let (arity, text) = rewrite_root("-a;", ValueUse::Consumed);
        assert_eq!(arity, Some(Arity::Unary));
        assert!(text.contains("_arg[Symbol.for(\"unary-minus\")]()"));
        assert!(text.contains(": -_arg;"));
        assert!(text.ends_with("})(a);\n"));
    }

    #[test]
    fn test_excluded_and_unknown_left_alone() {
        for source in ["a === b;", "a !== b;", "a && b;", "a || b;", "a ?? b;", "!a;", "typeof a;", "a in b;", "x = 1;", "x ||= y;"] {
            let (arity, text) = rewrite_root(source, ValueUse::Consumed);
            assert_eq!(arity, None, "{source}");
            assert_eq!(text, format!("{source}\n"));
        }
    }

    #[test]
    fn test_inactive_scope_is_noop() {
        let (mut program, mut interner) = opov_syntax::parse_program("a * b;").unwrap();
        let mut scopes = active();
        scopes.enter(Override::Disabled);
        if let Stmt::Expr { expr, .. } = &mut program.body[0] {
            assert_eq!(
                Rewriter::new(&mut interner).rewrite(expr, &scopes, ValueUse::Consumed),
                None
            );
            assert!(!expr.is_generated());
        }
    }

    #[test]
    fn test_generated_is_not_rewritten_twice() {
        let (mut program, mut interner) = opov_syntax::parse_program("a - b;").unwrap();
        let scopes = active();
        if let Stmt::Expr { expr, .. } = &mut program.body[0] {
            let mut rewriter = Rewriter::new(&mut interner);
            assert!(rewriter.rewrite(expr, &scopes, ValueUse::Consumed).is_some());
            assert!(rewriter.rewrite(expr, &scopes, ValueUse::Consumed).is_none());
        }
    }

    #[test]
    fn test_compound_identifier() {
        let (arity, text) = rewrite_root("x += y;", ValueUse::Discarded);
        assert_eq!(arity, Some(Arity::CompoundAssign));
        assert!(text.starts_with("x = ((_lhs, _rhs) => {"));
        assert!(text.ends_with("})(x, y);\n"));
    }

    #[test]
    fn test_every_rewritable_compound_has_binary_form() {
        for entry in catalog::rewritable().filter(|e| e.arity == Arity::CompoundAssign) {
            let source = format!("x {} y;", entry.token);
            let (arity, text) = rewrite_root(&source, ValueUse::Discarded);
            assert_eq!(arity, Some(Arity::CompoundAssign), "{source}");
            assert!(text.contains(&format!("Symbol.for(\"{}\")", entry.key)), "{text}");
        }
    }

    #[test]
    fn test_compound_member_caches_object() {
        let (_, text) = rewrite_root("f().p *= v;", ValueUse::Discarded);
        assert!(text.starts_with("((_obj) => _obj.p = ((_lhs, _rhs) => {"));
        assert!(text.contains("})(_obj.p, v))(f());"));
    }

    #[test]
    fn test_compound_computed_caches_key() {
        let (_, text) = rewrite_root("o[k()] -= 1;", ValueUse::Discarded);
        assert!(text.starts_with("((_obj, _key) => _obj[_key] = "));
        assert!(text.contains("})(_obj[_key], 1))(o, k());"));
    }

    #[test]
    fn test_update_discarded() {
        let (arity, text) = rewrite_root("i++;", ValueUse::Discarded);
        assert_eq!(arity, Some(Arity::Update));
        assert!(text.starts_with("i = ((_arg) => {"));
        assert!(text.contains("_arg[Symbol.for(\"postfix-increment\")]()"));
        assert!(text.contains(": ++_arg;"));
        assert!(text.ends_with("})(i);\n"));
    }

    #[test]
    fn test_prefix_update_consumed_keeps_assignment_shape() {
        let (_, text) = rewrite_root("--o.n;", ValueUse::Consumed);
        assert!(text.starts_with("((_obj) => _obj.n = ((_arg) => {"));
        assert!(text.contains("prefix-decrement"));
        assert!(text.contains(": --_arg;"));
    }

    #[test]
    fn test_postfix_update_consumed_returns_old_value() {
        let (_, text) = rewrite_root("i++;", ValueUse::Consumed);
        assert!(text.starts_with("(() => {\n  \"operator-overload disabled\";\n  const _old = i;\n  i = ((_arg) => {"));
        assert!(text.contains("})(_old);\n  return _old;\n})();\n"));
    }

    #[test]
    fn test_hygiene_avoids_user_names() {
        let (_, text) = rewrite_root("_lhs + _rhs2 + _rhs;", ValueUse::Consumed);
        assert!(text.starts_with("((_lhs2, _rhs3) => {"));
        assert!(text.contains("_lhs2 + _rhs3;"));
    }

    #[test]
    fn test_compound_op_inverse() {
        assert_eq!(compound_op(BinaryOp::Add), AssignOp::Add);
        assert_eq!(compound_op(BinaryOp::UShr), AssignOp::UShr);
    }
}
