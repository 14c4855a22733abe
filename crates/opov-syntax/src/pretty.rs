//! Pretty-printer: AST back to source text.
//!
//! The tree carries no parentheses, so the printer inserts them from
//! operator precedence. Printed output re-parses to the same tree shape,
//! which is what makes print, re-parse, re-transform round trips work.
//!
//! # Examples
//!
//! ```
//! use opov_syntax::{parse_program, pretty::PrettyPrinter};
//!
//! let (program, interner) = parse_program("(a + b) * c").unwrap();
//! let text = PrettyPrinter::new(&interner).print_program(&program);
//! assert_eq!(text, "(a + b) * c;\n");
//! ```

use crate::ast::{
    ArrowBody, ArrowFunction, BinaryOp, Block, Directive, Expr, Fixity, ForInit, Function,
    MemberProp, Program, PropKey, Property, Stmt, UnaryOp, UpdateOp, VarDecl,
};
use opov_mem::{StringInterner, Symbol};
use std::fmt::Write as _;

/// Configuration for pretty-printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettyConfig {
    /// Indentation string (e.g., "  " or "\t")
    pub indent: String,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
        }
    }
}

impl PrettyConfig {
    /// Indents with `width` spaces.
    #[must_use]
    pub fn with_indent_width(width: usize) -> Self {
        Self {
            indent: " ".repeat(width),
        }
    }
}

// Expression binding levels, loosest first.
const PREC_SEQUENCE: u8 = 0;
const PREC_ASSIGN: u8 = 1;
const PREC_CONDITIONAL: u8 = 2;
const PREC_BINARY_BASE: u8 = 3;
const PREC_UNARY: u8 = 16;
const PREC_POSTFIX: u8 = 17;
const PREC_CALL: u8 = 18;
const PREC_PRIMARY: u8 = 19;
const PREC_FORCE_PARENS: u8 = 20;

/// Pretty-printer for the AST.
pub struct PrettyPrinter<'a> {
    /// Interner that resolves the tree's symbols
    interner: &'a StringInterner,
    /// Configuration
    config: PrettyConfig,
    /// Current indentation level
    indent_level: usize,
}

impl<'a> PrettyPrinter<'a> {
    /// Creates a printer with the default configuration.
    #[must_use]
    pub fn new(interner: &'a StringInterner) -> Self {
        Self {
            interner,
            config: PrettyConfig::default(),
            indent_level: 0,
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: PrettyConfig) -> Self {
        self.config = config;
        self
    }

    fn current_indent(&self) -> String {
        self.config.indent.repeat(self.indent_level)
    }

    fn name(&self, sym: Symbol) -> &'a str {
        self.interner.resolve(sym).unwrap_or("<unknown>")
    }

    /// Prints a whole program, one statement per line.
    pub fn print_program(&mut self, program: &Program) -> String {
        let mut out = String::new();
        for directive in &program.directives {
            let _ = writeln!(out, "{}", self.print_directive(directive));
        }
        for stmt in &program.body {
            let _ = writeln!(out, "{}", self.print_stmt(stmt));
        }
        out
    }

    fn print_directive(&self, directive: &Directive) -> String {
        format!("{};", quote(self.name(directive.value)))
    }

    /// Prints a statement at the current indentation level, without the
    /// leading indent or trailing newline.
    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expr { expr, .. } => {
                let text = self.print_expr(expr);
                if needs_statement_parens(expr) {
                    format!("({text});")
                } else {
                    format!("{text};")
                }
            }
            Stmt::VarDecl(decl) => format!("{};", self.print_var_decl(decl)),
            Stmt::Block(block) => self.print_block(block),
            Stmt::If {
                test,
                consequent,
                alternate,
                ..
            } => {
                let mut out = format!("if ({})", self.print_expr(test));
                out.push_str(&self.print_nested(consequent));
                if let Some(alternate) = alternate {
                    if matches!(**consequent, Stmt::Block(_)) {
                        out.push_str(" else");
                    } else {
                        let _ = write!(out, "\n{}else", self.current_indent());
                    }
                    if matches!(**alternate, Stmt::If { .. }) {
                        out.push(' ');
                        out.push_str(&self.print_stmt(alternate));
                    } else {
                        out.push_str(&self.print_nested(alternate));
                    }
                }
                out
            }
            Stmt::While { test, body, .. } => {
                let test = self.print_expr(test);
                format!("while ({test}){}", self.print_nested(body))
            }
            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => {
                let init = match init {
                    Some(ForInit::VarDecl(decl)) => self.print_var_decl(decl),
                    Some(ForInit::Expr(expr)) => self.print_expr(expr),
                    None => String::new(),
                };
                let test = test
                    .as_ref()
                    .map(|e| format!(" {}", self.print_expr(e)))
                    .unwrap_or_default();
                let update = update
                    .as_ref()
                    .map(|e| format!(" {}", self.print_expr(e)))
                    .unwrap_or_default();
                format!("for ({init};{test};{update}){}", self.print_nested(body))
            }
            Stmt::Return { value, .. } => match value {
                Some(value) => format!("return {};", self.print_expr(value)),
                None => "return;".to_string(),
            },
            Stmt::Break { .. } => "break;".to_string(),
            Stmt::Continue { .. } => "continue;".to_string(),
            Stmt::Function(func) => self.print_function(func),
            Stmt::Import(import) => {
                let source = quote(self.name(import.source));
                match import.default {
                    Some(name) => format!("import {} from {source};", self.name(name)),
                    None => format!("import {source};"),
                }
            }
            Stmt::Empty { .. } => ";".to_string(),
        }
    }

    /// Body of `if`/`while`/`for`: a block stays on the header line, any
    /// other statement goes on the next line, one level deeper.
    fn print_nested(&mut self, stmt: &Stmt) -> String {
        if let Stmt::Block(block) = stmt {
            return format!(" {}", self.print_block(block));
        }
        self.indent_level += 1;
        let text = format!("\n{}{}", self.current_indent(), self.print_stmt(stmt));
        self.indent_level -= 1;
        text
    }

    fn print_block(&mut self, block: &Block) -> String {
        if block.directives.is_empty() && block.body.is_empty() {
            return "{}".to_string();
        }

        let mut out = String::from("{\n");
        self.indent_level += 1;
        let indent = self.current_indent();
        for directive in &block.directives {
            let _ = writeln!(out, "{indent}{}", self.print_directive(directive));
        }
        for stmt in &block.body {
            let _ = writeln!(out, "{indent}{}", self.print_stmt(stmt));
        }
        self.indent_level -= 1;
        let _ = write!(out, "{}}}", self.current_indent());
        out
    }

    fn print_var_decl(&mut self, decl: &VarDecl) -> String {
        let declarators: Vec<String> = decl
            .declarators
            .iter()
            .map(|d| match &d.init {
                Some(init) => format!(
                    "{} = {}",
                    self.name(d.name),
                    self.print_expr_prec(init, PREC_ASSIGN)
                ),
                None => self.name(d.name).to_string(),
            })
            .collect();
        format!("{} {}", decl.kind.as_str(), declarators.join(", "))
    }

    fn print_params(&self, params: &[Symbol]) -> String {
        let names: Vec<&str> = params.iter().map(|p| self.name(*p)).collect();
        format!("({})", names.join(", "))
    }

    fn print_function(&mut self, func: &Function) -> String {
        let name = func.name.map(|n| format!(" {}", self.name(n))).unwrap_or_default();
        let params = self.print_params(&func.params);
        format!("function{name}{params} {}", self.print_block(&func.body))
    }

    fn print_arrow(&mut self, arrow: &ArrowFunction) -> String {
        let params = self.print_params(&arrow.params);
        let body = match &arrow.body {
            ArrowBody::Block(block) => self.print_block(block),
            ArrowBody::Expr(expr) => {
                // `=> {` would start a block
                let min = if matches!(expr.unwrap_generated(), Expr::Object { .. }) {
                    PREC_FORCE_PARENS
                } else {
                    PREC_ASSIGN
                };
                self.print_expr_prec(expr, min)
            }
        };
        format!("{params} => {body}")
    }

    /// Prints an expression with no surrounding context.
    pub fn print_expr(&mut self, expr: &Expr) -> String {
        self.print_expr_prec(expr, PREC_SEQUENCE)
    }

    /// Prints `expr`, parenthesized if it binds looser than `min`.
    fn print_expr_prec(&mut self, expr: &Expr, min: u8) -> String {
        let text = self.print_expr_bare(expr);
        if precedence(expr) < min {
            format!("({text})")
        } else {
            text
        }
    }

    fn print_args(&mut self, args: &[Expr]) -> String {
        let args: Vec<String> = args
            .iter()
            .map(|a| self.print_expr_prec(a, PREC_ASSIGN))
            .collect();
        format!("({})", args.join(", "))
    }

    #[allow(clippy::too_many_lines)]
    fn print_expr_bare(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Number { raw, .. } => self.name(*raw).to_string(),
            Expr::String { value, .. } => quote(self.name(*value)),
            Expr::Bool { value, .. } => value.to_string(),
            Expr::Null { .. } => "null".to_string(),
            Expr::Identifier { name, .. } => self.name(*name).to_string(),
            Expr::This { .. } => "this".to_string(),

            Expr::Array { elements, .. } => {
                let items: Vec<String> = elements
                    .iter()
                    .map(|e| self.print_expr_prec(e, PREC_ASSIGN))
                    .collect();
                format!("[{}]", items.join(", "))
            }

            Expr::Object { props, .. } => {
                if props.is_empty() {
                    return "{}".to_string();
                }
                let items: Vec<String> = props.iter().map(|p| self.print_property(p)).collect();
                format!("{{ {} }}", items.join(", "))
            }

            Expr::Function(func) => self.print_function(func),
            Expr::Arrow(arrow) => self.print_arrow(arrow),

            Expr::Unary { op, operand, .. } => {
                let operand_str = self.print_expr_prec(operand, PREC_UNARY);
                if op.is_word() || needs_unary_space(*op, operand) {
                    format!("{op} {operand_str}")
                } else {
                    format!("{op}{operand_str}")
                }
            }

            Expr::Update {
                op, fixity, target, ..
            } => {
                let target = self.print_expr_prec(target, PREC_CALL);
                match fixity {
                    Fixity::Prefix => format!("{op}{target}"),
                    Fixity::Postfix => format!("{target}{op}"),
                }
            }

            Expr::Binary {
                op, left, right, ..
            } => {
                let level = PREC_BINARY_BASE + op.precedence();
                let (mut left_min, mut right_min) = if *op == BinaryOp::Exp {
                    // `-a ** b` is a syntax error; the base must be postfix or tighter.
                    (PREC_POSTFIX, level)
                } else {
                    (level, level + 1)
                };
                if mixes_nullish(*op, left) {
                    left_min = PREC_FORCE_PARENS;
                }
                if mixes_nullish(*op, right) {
                    right_min = PREC_FORCE_PARENS;
                }
                let left = self.print_expr_prec(left, left_min);
                let right = self.print_expr_prec(right, right_min);
                format!("{left} {op} {right}")
            }

            Expr::Assign {
                op, target, value, ..
            } => {
                let target = self.print_expr_prec(target, PREC_CALL);
                let value = self.print_expr_prec(value, PREC_ASSIGN);
                format!("{target} {op} {value}")
            }

            Expr::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                let test = self.print_expr_prec(test, PREC_CONDITIONAL + 1);
                let consequent = self.print_expr_prec(consequent, PREC_ASSIGN);
                let alternate = self.print_expr_prec(alternate, PREC_ASSIGN);
                format!("{test} ? {consequent} : {alternate}")
            }

            Expr::Call { callee, args, .. } => {
                let callee = self.print_expr_prec(callee, PREC_CALL);
                format!("{callee}{}", self.print_args(args))
            }

            Expr::New { callee, args, .. } => {
                let min = if contains_call(callee) {
                    PREC_FORCE_PARENS
                } else {
                    PREC_CALL
                };
                let callee = self.print_expr_prec(callee, min);
                format!("new {callee}{}", self.print_args(args))
            }

            Expr::Member {
                object, property, ..
            } => {
                let min = if matches!(object.unwrap_generated(), Expr::Number { .. }) {
                    PREC_FORCE_PARENS
                } else {
                    PREC_CALL
                };
                let object = self.print_expr_prec(object, min);
                match property {
                    MemberProp::Named(name) => format!("{object}.{}", self.name(*name)),
                    MemberProp::Computed(key) => {
                        format!("{object}[{}]", self.print_expr(key))
                    }
                }
            }

            Expr::Sequence { exprs, .. } => {
                let items: Vec<String> = exprs
                    .iter()
                    .map(|e| self.print_expr_prec(e, PREC_ASSIGN))
                    .collect();
                items.join(", ")
            }

            Expr::Generated(inner) => self.print_expr_bare(inner),
        }
    }

    fn print_property(&mut self, prop: &Property) -> String {
        let key = match &prop.key {
            PropKey::Named(name) | PropKey::Number(name) => self.name(*name).to_string(),
            PropKey::String(value) => quote(self.name(*value)),
            PropKey::Computed(expr) => format!("[{}]", self.print_expr_prec(expr, PREC_ASSIGN)),
        };

        if let (true, Expr::Function(func)) = (prop.method, &prop.value) {
            let params = self.print_params(&func.params);
            return format!("{key}{params} {}", self.print_block(&func.body));
        }
        format!("{key}: {}", self.print_expr_prec(&prop.value, PREC_ASSIGN))
    }
}

/// Binding level of an expression's outermost operator.
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Sequence { .. } => PREC_SEQUENCE,
        Expr::Assign { .. } | Expr::Arrow(_) => PREC_ASSIGN,
        Expr::Conditional { .. } => PREC_CONDITIONAL,
        Expr::Binary { op, .. } => PREC_BINARY_BASE + op.precedence(),
        Expr::Unary { .. } => PREC_UNARY,
        Expr::Update { fixity, .. } => match fixity {
            Fixity::Prefix => PREC_UNARY,
            Fixity::Postfix => PREC_POSTFIX,
        },
        Expr::Call { .. } | Expr::New { .. } | Expr::Member { .. } => PREC_CALL,
        Expr::Generated(inner) => precedence(inner),
        _ => PREC_PRIMARY,
    }
}

/// `??` cannot be mixed with `&&`/`||` without parentheses.
fn mixes_nullish(parent: BinaryOp, child: &Expr) -> bool {
    let Expr::Binary { op: child, .. } = child.unwrap_generated() else {
        return false;
    };
    match parent {
        BinaryOp::Nullish => matches!(child, BinaryOp::And | BinaryOp::Or),
        BinaryOp::And | BinaryOp::Or => *child == BinaryOp::Nullish,
        _ => false,
    }
}

/// `- -x` and `+ ++x` need a space to stay two tokens.
fn needs_unary_space(op: UnaryOp, operand: &Expr) -> bool {
    match (op, operand.unwrap_generated()) {
        (UnaryOp::Minus, Expr::Unary { op: UnaryOp::Minus, .. })
        | (UnaryOp::Plus, Expr::Unary { op: UnaryOp::Plus, .. }) => true,
        (UnaryOp::Minus, Expr::Update { op: UpdateOp::Decrement, fixity: Fixity::Prefix, .. })
        | (UnaryOp::Plus, Expr::Update { op: UpdateOp::Increment, fixity: Fixity::Prefix, .. }) => {
            true
        }
        _ => false,
    }
}

/// A call inside a `new` callee would bind the arguments to the call.
fn contains_call(expr: &Expr) -> bool {
    match expr.unwrap_generated() {
        Expr::Call { .. } => true,
        Expr::Member { object, .. } => contains_call(object),
        _ => false,
    }
}

/// Expression statements cannot start with `{` or `function`, and a lone
/// string literal would read back as a directive.
fn needs_statement_parens(expr: &Expr) -> bool {
    if matches!(expr.unwrap_generated(), Expr::String { .. }) {
        return true;
    }
    let mut current = expr;
    loop {
        current = match current {
            Expr::Object { .. } | Expr::Function(_) => return true,
            Expr::Generated(inner) => inner,
            Expr::Binary { left, .. } => left,
            Expr::Assign { target, .. } => target,
            Expr::Conditional { test, .. } => test,
            Expr::Call { callee, .. } => callee,
            Expr::Member { object, .. } => object,
            Expr::Update {
                fixity: Fixity::Postfix,
                target,
                ..
            } => target,
            Expr::Sequence { exprs, .. } => match exprs.first() {
                Some(first) => first,
                None => return false,
            },
            _ => return false,
        };
    }
}

/// Double-quoted string literal with JavaScript escapes.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Prints a program with the default configuration.
#[must_use]
pub fn print_program(program: &Program, interner: &StringInterner) -> String {
    PrettyPrinter::new(interner).print_program(program)
}
