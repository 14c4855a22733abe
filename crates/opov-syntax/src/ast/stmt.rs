//! Statement nodes, blocks, and directive prologues.

use super::expr::{Expr, Function};
use crate::span::{Span, Spanned};
use opov_mem::Symbol;

/// A directive: a string-literal statement at the head of a program or
/// block body, such as `"use strict";`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Decoded literal text
    pub value: Symbol,
    /// Source location
    pub span: Span,
}

/// A braced statement list, with its directive prologue split off.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Leading directives, in source order
    pub directives: Vec<Directive>,
    /// Statements after the prologue
    pub body: Vec<Stmt>,
    /// Source location
    pub span: Span,
}

impl Block {
    /// Creates a block with no directives.
    #[must_use]
    pub const fn new(body: Vec<Stmt>, span: Span) -> Self {
        Self {
            directives: Vec::new(),
            body,
            span,
        }
    }
}

/// `var`, `let`, or `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// `var`
    Var,
    /// `let`
    Let,
    /// `const`
    Const,
}

impl VarKind {
    /// Keyword text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

/// A variable declaration: `let a = 1, b;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// Declaration keyword
    pub kind: VarKind,
    /// Declared bindings
    pub declarators: Vec<Declarator>,
    /// Source location
    pub span: Span,
}

/// One binding of a [`VarDecl`].
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    /// Bound name
    pub name: Symbol,
    /// Initializer
    pub init: Option<Expr>,
    /// Source location
    pub span: Span,
}

/// Initializer clause of a `for(;;)` loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// `for (let i = 0; ...)`
    VarDecl(VarDecl),
    /// `for (i = 0; ...)`
    Expr(Expr),
}

/// `import "m";` or `import name from "m";`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Default binding, if any
    pub default: Option<Symbol>,
    /// Module specifier
    pub source: Symbol,
    /// Source location
    pub span: Span,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression statement: `f();`
    Expr {
        /// The expression
        expr: Expr,
        /// Source location
        span: Span,
    },

    /// Variable declaration
    VarDecl(VarDecl),

    /// Nested block: `{ ... }`
    Block(Block),

    /// `if (test) consequent else alternate`
    If {
        /// Condition
        test: Expr,
        /// Taken branch
        consequent: Box<Stmt>,
        /// `else` branch
        alternate: Option<Box<Stmt>>,
        /// Source location
        span: Span,
    },

    /// `while (test) body`
    While {
        /// Condition
        test: Expr,
        /// Loop body
        body: Box<Stmt>,
        /// Source location
        span: Span,
    },

    /// `for (init; test; update) body`
    For {
        /// Initializer
        init: Option<ForInit>,
        /// Condition
        test: Option<Expr>,
        /// Update clause; its value is discarded
        update: Option<Expr>,
        /// Loop body
        body: Box<Stmt>,
        /// Source location
        span: Span,
    },

    /// `return value;`
    Return {
        /// Returned value
        value: Option<Expr>,
        /// Source location
        span: Span,
    },

    /// `break;`
    Break {
        /// Source location
        span: Span,
    },

    /// `continue;`
    Continue {
        /// Source location
        span: Span,
    },

    /// Function declaration
    Function(Function),

    /// Import declaration
    Import(ImportDecl),

    /// `;`
    Empty {
        /// Source location
        span: Span,
    },
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        match self {
            Self::Expr { span, .. }
            | Self::If { span, .. }
            | Self::While { span, .. }
            | Self::For { span, .. }
            | Self::Return { span, .. }
            | Self::Break { span }
            | Self::Continue { span }
            | Self::Empty { span } => *span,
            Self::VarDecl(decl) => decl.span,
            Self::Block(block) => block.span,
            Self::Function(func) => func.span,
            Self::Import(import) => import.span,
        }
    }
}

impl Spanned for Block {
    fn span(&self) -> Span {
        self.span
    }
}
