//! Reserved words of the JavaScript subset.
//!
//! Keywords are pre-interned in every unit's string interner, so they occupy
//! the IDs `0..KEYWORD_COUNT` and can never be handed out as generated
//! binding names.

use crate::token::TokenKind;

/// All keywords, in interning order.
pub const KEYWORDS: &[&str] = &[
    "var", "let", "const", "function", "return", "if", "else", "while", "for",
    "break", "continue", "import", "new", "typeof", "void", "delete", "in",
    "instanceof", "this", "true", "false", "null",
];

/// Number of keywords.
#[allow(clippy::cast_possible_truncation)]
pub const KEYWORD_COUNT: u32 = KEYWORDS.len() as u32;

/// Maps identifier text to its keyword token, if it is one.
#[must_use]
pub fn lookup(text: &str) -> Option<TokenKind> {
    Some(match text {
        "var" => TokenKind::Var,
        "let" => TokenKind::Let,
        "const" => TokenKind::Const,
        "function" => TokenKind::Function,
        "return" => TokenKind::Return,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "import" => TokenKind::Import,
        "new" => TokenKind::New,
        "typeof" => TokenKind::Typeof,
        "void" => TokenKind::Void,
        "delete" => TokenKind::Delete,
        "in" => TokenKind::In,
        "instanceof" => TokenKind::Instanceof,
        "this" => TokenKind::This,
        "true" => TokenKind::BoolLiteral(true),
        "false" => TokenKind::BoolLiteral(false),
        "null" => TokenKind::Null,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_count() {
        assert_eq!(KEYWORD_COUNT as usize, KEYWORDS.len());
    }

    #[test]
    fn test_every_keyword_has_a_token() {
        for kw in KEYWORDS {
            let kind = lookup(kw).unwrap();
            assert_eq!(kind.keyword_text(), Some(*kw));
        }
    }

    #[test]
    fn test_no_duplicates() {
        let unique: std::collections::HashSet<_> = KEYWORDS.iter().collect();
        assert_eq!(unique.len(), KEYWORDS.len());
    }

    #[test]
    fn test_contextual_words_are_identifiers() {
        assert!(lookup("from").is_none());
        assert!(lookup("undefined").is_none());
        assert!(lookup("Symbol").is_none());
    }
}
