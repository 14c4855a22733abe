//! Expression nodes.
//!
//! Expressions own their children through `Box`, so the rewriting pass can
//! take a subtree out of its parent with [`std::mem::replace`], build a new
//! subtree around it, and put the result back in place.
//!
//! [`Expr::Generated`] marks a subtree built by a transform rather than
//! written in source. Visitors that rewrite expressions skip it, which makes
//! every rewrite one-shot.

use super::stmt::Block;
use crate::span::{Span, Spanned};
use opov_mem::Symbol;
use std::fmt;

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal, kept as source text: `42`, `0xff`, `1e3`
    Number {
        /// Literal text
        raw: Symbol,
        /// Source location
        span: Span,
    },

    /// String literal: `"text"`
    String {
        /// Decoded value
        value: Symbol,
        /// Source location
        span: Span,
    },

    /// `true` or `false`
    Bool {
        /// The value
        value: bool,
        /// Source location
        span: Span,
    },

    /// `null`
    Null {
        /// Source location
        span: Span,
    },

    /// Identifier reference: `x`
    Identifier {
        /// Referenced name
        name: Symbol,
        /// Source location
        span: Span,
    },

    /// `this`
    This {
        /// Source location
        span: Span,
    },

    /// Array literal: `[a, b]`
    Array {
        /// Elements
        elements: Vec<Expr>,
        /// Source location
        span: Span,
    },

    /// Object literal: `{ a: 1, [k]: 2, m() {} }`
    Object {
        /// Properties in source order
        props: Vec<Property>,
        /// Source location
        span: Span,
    },

    /// Function expression: `function name(a) { ... }`
    Function(Box<Function>),

    /// Arrow function: `(a, b) => a + b`
    Arrow(Box<ArrowFunction>),

    /// Unary operation: `-x`, `!x`, `typeof x`
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// Increment or decrement: `++x`, `x--`
    Update {
        /// `++` or `--`
        op: UpdateOp,
        /// Prefix or postfix
        fixity: Fixity,
        /// Identifier or member target
        target: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// Binary operation, including `&&`, `||`, `??`: `a + b`
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// Plain or compound assignment: `x = v`, `o.p += v`
    Assign {
        /// Operator
        op: AssignOp,
        /// Identifier or member target
        target: Box<Expr>,
        /// Assigned value
        value: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// Conditional: `test ? a : b`
    Conditional {
        /// Condition
        test: Box<Expr>,
        /// Value when truthy
        consequent: Box<Expr>,
        /// Value when falsy
        alternate: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// Call: `f(a, b)`
    Call {
        /// Called expression
        callee: Box<Expr>,
        /// Arguments
        args: Vec<Expr>,
        /// Source location
        span: Span,
    },

    /// Constructor call: `new C(a)`
    New {
        /// Constructor expression
        callee: Box<Expr>,
        /// Arguments
        args: Vec<Expr>,
        /// Source location
        span: Span,
    },

    /// Member access: `o.p` or `o[k]`
    Member {
        /// Object expression
        object: Box<Expr>,
        /// Accessed property
        property: MemberProp,
        /// Source location
        span: Span,
    },

    /// Comma sequence: `a, b, c`
    Sequence {
        /// Expressions, evaluated left to right
        exprs: Vec<Expr>,
        /// Source location
        span: Span,
    },

    /// Subtree produced by a transform; never rewritten again
    Generated(Box<Expr>),
}

impl Expr {
    /// Creates an identifier reference.
    #[must_use]
    pub const fn ident(name: Symbol, span: Span) -> Self {
        Self::Identifier { name, span }
    }

    /// Creates a string literal.
    #[must_use]
    pub const fn string(value: Symbol, span: Span) -> Self {
        Self::String { value, span }
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(op: BinaryOp, left: Expr, right: Expr, span: Span) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    /// Creates a call.
    #[must_use]
    pub fn call(callee: Expr, args: Vec<Expr>, span: Span) -> Self {
        Self::Call {
            callee: Box::new(callee),
            args,
            span,
        }
    }

    /// Creates a named member access: `object.name`.
    #[must_use]
    pub fn member(object: Expr, name: Symbol, span: Span) -> Self {
        Self::Member {
            object: Box::new(object),
            property: MemberProp::Named(name),
            span,
        }
    }

    /// Creates a computed member access: `object[key]`.
    #[must_use]
    pub fn index(object: Expr, key: Expr, span: Span) -> Self {
        Self::Member {
            object: Box::new(object),
            property: MemberProp::Computed(Box::new(key)),
            span,
        }
    }

    /// Creates a plain `=` assignment.
    #[must_use]
    pub fn assign(target: Expr, value: Expr, span: Span) -> Self {
        Self::Assign {
            op: AssignOp::Assign,
            target: Box::new(target),
            value: Box::new(value),
            span,
        }
    }

    /// Returns `true` if this expression can be assigned to.
    #[must_use]
    pub fn is_valid_target(&self) -> bool {
        match self {
            Self::Identifier { .. } | Self::Member { .. } => true,
            Self::Generated(inner) => inner.is_valid_target(),
            _ => false,
        }
    }

    /// Returns `true` if this subtree was produced by a transform.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }

    /// Strips any `Generated` wrappers.
    #[must_use]
    pub fn unwrap_generated(&self) -> &Self {
        match self {
            Self::Generated(inner) => inner.unwrap_generated(),
            other => other,
        }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Self::Number { span, .. }
            | Self::String { span, .. }
            | Self::Bool { span, .. }
            | Self::Null { span }
            | Self::Identifier { span, .. }
            | Self::This { span }
            | Self::Array { span, .. }
            | Self::Object { span, .. }
            | Self::Unary { span, .. }
            | Self::Update { span, .. }
            | Self::Binary { span, .. }
            | Self::Assign { span, .. }
            | Self::Conditional { span, .. }
            | Self::Call { span, .. }
            | Self::New { span, .. }
            | Self::Member { span, .. }
            | Self::Sequence { span, .. } => *span,
            Self::Function(func) => func.span,
            Self::Arrow(arrow) => arrow.span,
            Self::Generated(inner) => inner.span(),
        }
    }
}

/// The property part of a member expression.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    /// `.name`
    Named(Symbol),
    /// `[expr]`
    Computed(Box<Expr>),
}

/// A property in an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property key
    pub key: PropKey,
    /// Property value; a `Function` for method shorthand
    pub value: Expr,
    /// Written as `name(params) { ... }`
    pub method: bool,
    /// Source location
    pub span: Span,
}

/// An object literal key.
#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    /// Bare name: `{ a: 1 }`
    Named(Symbol),
    /// Quoted name: `{ "a b": 1 }`
    String(Symbol),
    /// Numeric name: `{ 1: "one" }`
    Number(Symbol),
    /// Computed: `{ [expr]: 1 }`
    Computed(Box<Expr>),
}

/// A `function` declaration or expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Name, required for declarations
    pub name: Option<Symbol>,
    /// Parameter names
    pub params: Vec<Symbol>,
    /// Body
    pub body: Block,
    /// Source location
    pub span: Span,
}

/// An arrow function.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    /// Parameter names
    pub params: Vec<Symbol>,
    /// Body
    pub body: ArrowBody,
    /// Source location
    pub span: Span,
}

/// Body of an arrow function.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// `=> expr`
    Expr(Box<Expr>),
    /// `=> { ... }`
    Block(Block),
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `+x`
    Plus,
    /// `-x`
    Minus,
    /// `~x`
    BitNot,
    /// `!x`
    Not,
    /// `typeof x`
    Typeof,
    /// `void x`
    Void,
    /// `delete x`
    Delete,
}

impl UnaryOp {
    /// Source text of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::BitNot => "~",
            Self::Not => "!",
            Self::Typeof => "typeof",
            Self::Void => "void",
            Self::Delete => "delete",
        }
    }

    /// Returns `true` for keyword operators, which print with a trailing space.
    #[must_use]
    pub const fn is_word(self) -> bool {
        matches!(self, Self::Typeof | Self::Void | Self::Delete)
    }
}

/// `++` or `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOp {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

impl UpdateOp {
    /// Source text of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }
}

/// Position of an update operator relative to its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    /// `++x`
    Prefix,
    /// `x++`
    Postfix,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `**`
    Exp,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `>>>`
    UShr,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNotEq,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `??`
    Nullish,
    /// `in`
    In,
    /// `instanceof`
    InstanceOf,
}

impl BinaryOp {
    /// Every binary operator.
    pub const ALL: [BinaryOp; 25] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Rem,
        Self::Exp,
        Self::BitAnd,
        Self::BitOr,
        Self::BitXor,
        Self::Shl,
        Self::Shr,
        Self::UShr,
        Self::Lt,
        Self::Le,
        Self::Gt,
        Self::Ge,
        Self::Eq,
        Self::NotEq,
        Self::StrictEq,
        Self::StrictNotEq,
        Self::And,
        Self::Or,
        Self::Nullish,
        Self::In,
        Self::InstanceOf,
    ];

    /// Source text of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Exp => "**",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::StrictEq => "===",
            Self::StrictNotEq => "!==",
            Self::And => "&&",
            Self::Or => "||",
            Self::Nullish => "??",
            Self::In => "in",
            Self::InstanceOf => "instanceof",
        }
    }

    /// Binding power; matches [`TokenKind::binary_precedence`].
    ///
    /// [`TokenKind::binary_precedence`]: crate::token::TokenKind::binary_precedence
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Nullish => 1,
            Self::Or => 2,
            Self::And => 3,
            Self::BitOr => 4,
            Self::BitXor => 5,
            Self::BitAnd => 6,
            Self::Eq | Self::NotEq | Self::StrictEq | Self::StrictNotEq => 7,
            Self::Lt | Self::Le | Self::Gt | Self::Ge | Self::In | Self::InstanceOf => 8,
            Self::Shl | Self::Shr | Self::UShr => 9,
            Self::Add | Self::Sub => 10,
            Self::Mul | Self::Div | Self::Rem => 11,
            Self::Exp => 12,
        }
    }

    /// Returns `true` for `&&`, `||`, and `??`.
    #[must_use]
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Nullish)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UpdateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `%=`
    Rem,
    /// `**=`
    Exp,
    /// `&=`
    BitAnd,
    /// `|=`
    BitOr,
    /// `^=`
    BitXor,
    /// `<<=`
    Shl,
    /// `>>=`
    Shr,
    /// `>>>=`
    UShr,
    /// `&&=`
    And,
    /// `||=`
    Or,
    /// `??=`
    Nullish,
}

impl AssignOp {
    /// Every assignment operator.
    pub const ALL: [AssignOp; 16] = [
        Self::Assign,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Rem,
        Self::Exp,
        Self::BitAnd,
        Self::BitOr,
        Self::BitXor,
        Self::Shl,
        Self::Shr,
        Self::UShr,
        Self::And,
        Self::Or,
        Self::Nullish,
    ];

    /// Source text of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Div => "/=",
            Self::Rem => "%=",
            Self::Exp => "**=",
            Self::BitAnd => "&=",
            Self::BitOr => "|=",
            Self::BitXor => "^=",
            Self::Shl => "<<=",
            Self::Shr => ">>=",
            Self::UShr => ">>>=",
            Self::And => "&&=",
            Self::Or => "||=",
            Self::Nullish => "??=",
        }
    }

    /// The binary operator a compound assignment applies: `+=` gives `+`.
    ///
    /// Returns `None` for plain `=`.
    #[must_use]
    pub const fn binary_op(self) -> Option<BinaryOp> {
        Some(match self {
            Self::Assign => return None,
            Self::Add => BinaryOp::Add,
            Self::Sub => BinaryOp::Sub,
            Self::Mul => BinaryOp::Mul,
            Self::Div => BinaryOp::Div,
            Self::Rem => BinaryOp::Rem,
            Self::Exp => BinaryOp::Exp,
            Self::BitAnd => BinaryOp::BitAnd,
            Self::BitOr => BinaryOp::BitOr,
            Self::BitXor => BinaryOp::BitXor,
            Self::Shl => BinaryOp::Shl,
            Self::Shr => BinaryOp::Shr,
            Self::UShr => BinaryOp::UShr,
            Self::And => BinaryOp::And,
            Self::Or => BinaryOp::Or,
            Self::Nullish => BinaryOp::Nullish,
        })
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
