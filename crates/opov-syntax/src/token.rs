//! Token types for the JavaScript subset.
//!
//! A [`Token`] pairs a [`TokenKind`] with its [`Span`] and remembers whether
//! a line terminator preceded it, which the parser needs for automatic
//! semicolon insertion and for the no-line-break rules of postfix `++`/`--`
//! and `return`.
//!
//! # Examples
//!
//! ```
//! use opov_syntax::token::{Token, TokenKind};
//! use opov_syntax::span::Span;
//!
//! let token = Token::new(TokenKind::PlusEq, Span::new(2, 4, 1, 3, 1, 5));
//! assert!(token.kind.is_assign_op());
//! ```

use crate::span::{Span, Spanned};
use opov_mem::Symbol;
use std::fmt;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ===== Keywords =====
    /// `var`
    Var,
    /// `let`
    Let,
    /// `const`
    Const,
    /// `function`
    Function,
    /// `return`
    Return,
    /// `if`
    If,
    /// `else`
    Else,
    /// `while`
    While,
    /// `for`
    For,
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `import`
    Import,
    /// `new`
    New,
    /// `typeof`
    Typeof,
    /// `void`
    Void,
    /// `delete`
    Delete,
    /// `in`
    In,
    /// `instanceof`
    Instanceof,
    /// `this`
    This,
    /// `true` / `false`
    BoolLiteral(bool),
    /// `null`
    Null,

    // ===== Literals =====
    /// Identifier
    Ident(Symbol),
    /// Numeric literal, kept as its source text
    NumberLiteral(Symbol),
    /// String literal, escapes already decoded
    StringLiteral(Symbol),

    // ===== Arithmetic =====
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `**`
    StarStar,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,

    // ===== Bitwise =====
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `>>>`
    UShr,

    // ===== Logical =====
    /// `!`
    Bang,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `??`
    QuestionQuestion,

    // ===== Comparison =====
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `===`
    EqEqEq,
    /// `!==`
    BangEqEq,

    // ===== Assignment =====
    /// `=`
    Eq,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `%=`
    PercentEq,
    /// `**=`
    StarStarEq,
    /// `&=`
    AmpEq,
    /// `|=`
    PipeEq,
    /// `^=`
    CaretEq,
    /// `<<=`
    ShlEq,
    /// `>>=`
    ShrEq,
    /// `>>>=`
    UShrEq,
    /// `&&=`
    AmpAmpEq,
    /// `||=`
    PipePipeEq,
    /// `??=`
    QuestionQuestionEq,

    // ===== Delimiters =====
    /// `=>`
    FatArrow,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `?`
    Question,

    /// End of input
    EOF,
}

impl TokenKind {
    /// Returns `true` for reserved words.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Var
                | Self::Let
                | Self::Const
                | Self::Function
                | Self::Return
                | Self::If
                | Self::Else
                | Self::While
                | Self::For
                | Self::Break
                | Self::Continue
                | Self::Import
                | Self::New
                | Self::Typeof
                | Self::Void
                | Self::Delete
                | Self::In
                | Self::Instanceof
                | Self::This
                | Self::BoolLiteral(_)
                | Self::Null
        )
    }

    /// Returns `true` for `=` and every compound assignment token.
    #[must_use]
    pub const fn is_assign_op(&self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::PlusEq
                | Self::MinusEq
                | Self::StarEq
                | Self::SlashEq
                | Self::PercentEq
                | Self::StarStarEq
                | Self::AmpEq
                | Self::PipeEq
                | Self::CaretEq
                | Self::ShlEq
                | Self::ShrEq
                | Self::UShrEq
                | Self::AmpAmpEq
                | Self::PipePipeEq
                | Self::QuestionQuestionEq
        )
    }

    /// Binding power of a binary operator token; higher binds tighter.
    ///
    /// Returns `None` for tokens that are not binary operators.
    #[must_use]
    pub const fn binary_precedence(&self) -> Option<u8> {
        match self {
            Self::QuestionQuestion => Some(1),
            Self::PipePipe => Some(2),
            Self::AmpAmp => Some(3),
            Self::Pipe => Some(4),
            Self::Caret => Some(5),
            Self::Amp => Some(6),
            Self::EqEq | Self::BangEq | Self::EqEqEq | Self::BangEqEq => Some(7),
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq | Self::In | Self::Instanceof => {
                Some(8)
            }
            Self::Shl | Self::Shr | Self::UShr => Some(9),
            Self::Plus | Self::Minus => Some(10),
            Self::Star | Self::Slash | Self::Percent => Some(11),
            Self::StarStar => Some(12),
            _ => None,
        }
    }

    /// Source text of keyword tokens, used where keywords are valid
    /// property names (`obj.new`, `{ for: 1 }`).
    #[must_use]
    pub const fn keyword_text(&self) -> Option<&'static str> {
        Some(match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
            Self::Function => "function",
            Self::Return => "return",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Import => "import",
            Self::New => "new",
            Self::Typeof => "typeof",
            Self::Void => "void",
            Self::Delete => "delete",
            Self::In => "in",
            Self::Instanceof => "instanceof",
            Self::This => "this",
            Self::BoolLiteral(true) => "true",
            Self::BoolLiteral(false) => "false",
            Self::Null => "null",
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.keyword_text() {
            return write!(f, "'{text}'");
        }
        let text = match self {
            Self::Ident(_) => "identifier",
            Self::NumberLiteral(_) => "number",
            Self::StringLiteral(_) => "string",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::Percent => "'%'",
            Self::StarStar => "'**'",
            Self::PlusPlus => "'++'",
            Self::MinusMinus => "'--'",
            Self::Amp => "'&'",
            Self::Pipe => "'|'",
            Self::Caret => "'^'",
            Self::Tilde => "'~'",
            Self::Shl => "'<<'",
            Self::Shr => "'>>'",
            Self::UShr => "'>>>'",
            Self::Bang => "'!'",
            Self::AmpAmp => "'&&'",
            Self::PipePipe => "'||'",
            Self::QuestionQuestion => "'??'",
            Self::Lt => "'<'",
            Self::LtEq => "'<='",
            Self::Gt => "'>'",
            Self::GtEq => "'>='",
            Self::EqEq => "'=='",
            Self::BangEq => "'!='",
            Self::EqEqEq => "'==='",
            Self::BangEqEq => "'!=='",
            Self::Eq => "'='",
            Self::PlusEq => "'+='",
            Self::MinusEq => "'-='",
            Self::StarEq => "'*='",
            Self::SlashEq => "'/='",
            Self::PercentEq => "'%='",
            Self::StarStarEq => "'**='",
            Self::AmpEq => "'&='",
            Self::PipeEq => "'|='",
            Self::CaretEq => "'^='",
            Self::ShlEq => "'<<='",
            Self::ShrEq => "'>>='",
            Self::UShrEq => "'>>>='",
            Self::AmpAmpEq => "'&&='",
            Self::PipePipeEq => "'||='",
            Self::QuestionQuestionEq => "'??='",
            Self::FatArrow => "'=>'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Dot => "'.'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::Colon => "':'",
            Self::Question => "'?'",
            Self::EOF => "end of input",
            _ => "keyword",
        };
        f.write_str(text)
    }
}

/// A lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// What the token is
    pub kind: TokenKind,
    /// Where it is
    pub span: Span,
    /// Whether a line terminator appeared between the previous token and this one
    pub newline_before: bool,
}

impl Token {
    /// Creates a token with no preceding line break.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            newline_before: false,
        }
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_precedence_order() {
        let add = TokenKind::Plus.binary_precedence().unwrap();
        let mul = TokenKind::Star.binary_precedence().unwrap();
        let exp = TokenKind::StarStar.binary_precedence().unwrap();
        let and = TokenKind::AmpAmp.binary_precedence().unwrap();

        assert!(mul > add);
        assert!(exp > mul);
        assert!(add > and);
        assert_eq!(TokenKind::Eq.binary_precedence(), None);
    }

    #[test]
    fn test_assign_ops() {
        assert!(TokenKind::UShrEq.is_assign_op());
        assert!(TokenKind::QuestionQuestionEq.is_assign_op());
        assert!(!TokenKind::EqEq.is_assign_op());
    }

    #[test]
    fn test_keyword_text() {
        assert_eq!(TokenKind::For.keyword_text(), Some("for"));
        assert_eq!(TokenKind::BoolLiteral(false).keyword_text(), Some("false"));
        assert_eq!(TokenKind::Plus.keyword_text(), None);
        assert!(TokenKind::Instanceof.is_keyword());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(TokenKind::BangEqEq.to_string(), "'!=='");
        assert_eq!(TokenKind::Return.to_string(), "'return'");
        assert_eq!(TokenKind::EOF.to_string(), "end of input");
    }
}
