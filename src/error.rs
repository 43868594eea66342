//! Contains the `ValidationError` type and its taxonomy.
use crate::token::TokenKind;
use std::fmt;

/// Why the tokenizer could not produce a token.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LexicalError {
    /// A byte that cannot start any token (e.g. `?`, `.`, `+`).
    UnexpectedCharacter(u8),
    /// A misspelled keyword, or a keyword glued to an identifier (`truex`).
    InvalidLiteral,
    /// The input ended before the closing quote.
    UnterminatedString,
    /// A backslash followed by something other than `"\/bfnrtu`.
    InvalidEscape,
    /// `\u` not followed by exactly four hex digits.
    InvalidUnicodeEscape,
    /// A raw byte below `0x20` inside a string.
    ControlCharacter,
    /// String contents that are not valid UTF-8.
    InvalidUtf8,
    /// A number like `01` or `-00`.
    LeadingZero,
    /// A `-` with no digits after it.
    MissingIntegerDigits,
    /// A `.` with no digits after it.
    MissingFractionDigits,
    /// An `e`/`E` (and optional sign) with no digits after it.
    MissingExponentDigits,
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexicalError::UnexpectedCharacter(byte) if byte.is_ascii_graphic() => {
                write!(f, "unexpected character '{}'", *byte as char)
            }
            LexicalError::UnexpectedCharacter(byte) => {
                write!(f, "unexpected byte 0x{:02x}", byte)
            }
            LexicalError::InvalidLiteral => f.write_str("invalid literal"),
            LexicalError::UnterminatedString => f.write_str("unterminated string"),
            LexicalError::InvalidEscape => f.write_str("invalid escape sequence"),
            LexicalError::InvalidUnicodeEscape => f.write_str("invalid unicode escape"),
            LexicalError::ControlCharacter => {
                f.write_str("unescaped control character in string")
            }
            LexicalError::InvalidUtf8 => f.write_str("invalid UTF-8 in string"),
            LexicalError::LeadingZero => f.write_str("leading zeros not allowed"),
            LexicalError::MissingIntegerDigits => f.write_str("expected digits after '-'"),
            LexicalError::MissingFractionDigits => {
                f.write_str("expected digits after decimal point")
            }
            LexicalError::MissingExponentDigits => f.write_str("expected exponent digits"),
        }
    }
}

/// The category of a `ValidationError`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// A malformed token.
    Lexical(LexicalError),
    /// A well-formed token in a place the grammar does not allow it.
    UnexpectedToken {
        /// What the grammar wanted at this point.
        expected: &'static str,
        /// What was actually there.
        found: TokenKind,
    },
    /// A complete value followed by something other than whitespace.
    TrailingContent,
    /// The input holds no value at all (empty or whitespace only).
    EmptyInput,
    /// Objects and arrays are nested deeper than the configured limit.
    DepthLimitExceeded {
        /// The configured limit.
        max_depth: usize,
    },
    /// The input is larger than the configured limit.
    InputTooLarge {
        /// The configured limit, in bytes.
        limit: usize,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical(reason) => write!(f, "Invalid token: {}", reason),
            ErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "Expected {}, found {}", expected, found)
            }
            ErrorKind::TrailingContent => f.write_str("Unexpected trailing content"),
            ErrorKind::EmptyInput => f.write_str("Empty input, expected a value"),
            ErrorKind::DepthLimitExceeded { max_depth } => {
                write!(f, "Maximum nesting depth of {} exceeded", max_depth)
            }
            ErrorKind::InputTooLarge { limit } => {
                write!(f, "Input exceeds maximum size of {} bytes", limit)
            }
        }
    }
}

/// The error returned by `validate` when the input is not valid JSON.
///
/// It records the first fault found, with its byte offset and the
/// 1-indexed line and column of that offset.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ValidationError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Byte offset where the fault was detected.
    pub offset: usize,
    /// The line number (1-indexed) where the fault was detected.
    pub line: usize,
    /// The column number (1-indexed, in bytes) where the fault was detected.
    pub column: usize,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error: {} at line {}, column {}.",
            self.kind, self.line, self.column
        )
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ValidationError {
            kind: ErrorKind::UnexpectedToken {
                expected: "',' or ']'",
                found: TokenKind::True,
            },
            offset: 3,
            line: 10,
            column: 5,
        };
        assert_eq!(
            error.to_string(),
            "Error: Expected ',' or ']', found 'true' at line 10, column 5."
        );
    }

    #[test]
    fn test_lexical_error_display() {
        let error = ValidationError {
            kind: ErrorKind::Lexical(LexicalError::UnexpectedCharacter(b'?')),
            offset: 0,
            line: 1,
            column: 1,
        };
        assert_eq!(
            error.to_string(),
            "Error: Invalid token: unexpected character '?' at line 1, column 1."
        );
        assert_eq!(
            LexicalError::UnexpectedCharacter(0x01).to_string(),
            "unexpected byte 0x01"
        );
    }

    #[test]
    fn test_limit_display() {
        assert_eq!(
            ErrorKind::DepthLimitExceeded { max_depth: 100 }.to_string(),
            "Maximum nesting depth of 100 exceeded"
        );
        assert_eq!(
            ErrorKind::InputTooLarge { limit: 16 }.to_string(),
            "Input exceeds maximum size of 16 bytes"
        );
    }
}
