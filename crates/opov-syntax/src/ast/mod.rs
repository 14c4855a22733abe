//! Abstract syntax tree for the JavaScript subset.
//!
//! A [`Program`] is one compile unit. Programs and [`Block`]s keep their
//! directive prologue separate from their statements, because directives
//! are what scope-sensitive transforms read on entry.

pub mod expr;
pub mod stmt;

pub use expr::{
    ArrowBody, ArrowFunction, AssignOp, BinaryOp, Expr, Fixity, Function, MemberProp,
    PropKey, Property, UnaryOp, UpdateOp,
};
pub use stmt::{Block, Declarator, Directive, ForInit, ImportDecl, Stmt, VarDecl, VarKind};

use crate::span::{Span, Spanned};

/// A compile unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Leading directives, in source order
    pub directives: Vec<Directive>,
    /// Top-level statements after the prologue
    pub body: Vec<Stmt>,
    /// Source location
    pub span: Span,
}

impl Program {
    /// Returns `true` if the program has an `import` of `source` at top level.
    #[must_use]
    pub fn imports(&self, source: opov_mem::Symbol) -> bool {
        self.body
            .iter()
            .any(|stmt| matches!(stmt, Stmt::Import(import) if import.source == source))
    }
}

impl Spanned for Program {
    fn span(&self) -> Span {
        self.span
    }
}
