//! Defines the `Token`, `TokenKind` and `Span` types.
//!
//! These are the intermediate representation between the
//! `Tokenizer` (lexer) and the `Recognizer` (parser).

use crate::error::LexicalError;
use std::fmt;

/// The specific kind of a `Token`.
///
/// Strings and numbers carry no decoded value: the validator only needs
/// to know that a well-formed literal was there.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// A well-formed string literal, quotes included in its span.
    String,
    /// A well-formed number literal.
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// No more input. Returned forever once reached.
    EndOfInput,
    /// A lexical error. Recognition must stop here.
    Invalid(LexicalError),
}

impl TokenKind {
    /// Returns `true` if a value can start with this token.
    pub fn starts_value(self) -> bool {
        matches!(
            self,
            TokenKind::LeftBrace
                | TokenKind::LeftBracket
                | TokenKind::String
                | TokenKind::Number
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LeftBrace => f.write_str("'{'"),
            TokenKind::RightBrace => f.write_str("'}'"),
            TokenKind::LeftBracket => f.write_str("'['"),
            TokenKind::RightBracket => f.write_str("']'"),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::String => f.write_str("a string"),
            TokenKind::Number => f.write_str("a number"),
            TokenKind::True => f.write_str("'true'"),
            TokenKind::False => f.write_str("'false'"),
            TokenKind::Null => f.write_str("'null'"),
            TokenKind::EndOfInput => f.write_str("end of input"),
            TokenKind::Invalid(reason) => write!(f, "an invalid token ({})", reason),
        }
    }
}

/// A byte range in the input, as `start` offset and `len`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Span {
    /// Byte offset of the first byte of the token.
    pub start: usize,
    /// Length of the token in bytes.
    pub len: usize,
}

impl Span {
    /// The offset one past the last byte of the token.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A single token produced by the `Tokenizer`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token {
    /// The kind of the token.
    pub kind: TokenKind,
    /// Where the token sits in the input.
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_value() {
        assert!(TokenKind::LeftBrace.starts_value());
        assert!(TokenKind::Number.starts_value());
        assert!(TokenKind::Null.starts_value());
        assert!(!TokenKind::Comma.starts_value());
        assert!(!TokenKind::RightBracket.starts_value());
        assert!(!TokenKind::EndOfInput.starts_value());
        assert!(!TokenKind::Invalid(LexicalError::InvalidLiteral).starts_value());
    }

    #[test]
    fn test_token_kind_display() {
        assert_eq!(TokenKind::RightBrace.to_string(), "'}'");
        assert_eq!(TokenKind::String.to_string(), "a string");
        assert_eq!(TokenKind::EndOfInput.to_string(), "end of input");
        assert_eq!(
            TokenKind::Invalid(LexicalError::UnterminatedString).to_string(),
            "an invalid token (unterminated string)"
        );
    }

    #[test]
    fn test_span_end() {
        let span = Span { start: 3, len: 4 };
        assert_eq!(span.end(), 7);
    }
}
