//! The byte-based tokenizer (lexer).
//!
//! It consumes the raw input as `&[u8]` and produces `Token`s on demand,
//! one per call to `next_token`. Lexical errors are not returned as `Err`:
//! they become an `Invalid` token, after which the tokenizer is stuck and
//! keeps returning that same token.

use crate::error::LexicalError;
use crate::token::{Span, Token, TokenKind};
use memchr::{memchr2, memchr_iter, memrchr};
use std::str;

// --- The Lookup Table (LUT) ---
// A 256-entry array classifying every byte for token dispatch.
pub(crate) const W: u8 = 1; // Whitespace
pub(crate) const S: u8 = 2; // Structural
pub(crate) const L: u8 = 3; // Literal
pub(crate) const D: u8 = 4; // Digit (or '-')
pub(crate) const Q: u8 = 5; // Quote

static BYTE_PROPERTIES: [u8; 256] = {
    let mut table = [0; 256];
    // 1: Whitespace. JSON has exactly these four.
    table[b' ' as usize] = W;
    table[b'\n' as usize] = W;
    table[b'\r' as usize] = W;
    table[b'\t' as usize] = W;

    // 2: Structural
    table[b'{' as usize] = S;
    table[b'}' as usize] = S;
    table[b'[' as usize] = S;
    table[b']' as usize] = S;
    table[b':' as usize] = S;
    table[b',' as usize] = S;

    // 3: Literal
    table[b't' as usize] = L;
    table[b'f' as usize] = L;
    table[b'n' as usize] = L;

    // 5: Quote
    table[b'"' as usize] = Q;

    // 4: Digit (and '-')
    table[b'-' as usize] = D;
    let mut digit = b'0';
    while digit <= b'9' {
        table[digit as usize] = D;
        digit += 1;
    }

    // 0: All other bytes cannot start a token.
    table
};

/// Computes the 1-indexed line and column (in bytes) of `offset`.
///
/// Offsets past the end are clamped to the end of the input.
pub(crate) fn line_column(bytes: &[u8], offset: usize) -> (usize, usize) {
    let prefix = &bytes[..offset.min(bytes.len())];
    let line = memchr_iter(b'\n', prefix).count() + 1;
    let line_start = memrchr(b'\n', prefix).map_or(0, |i| i + 1);
    (line, prefix.len() - line_start + 1)
}

/// The tokenizer (lexer).
///
/// It owns the scan position; nothing outside the tokenizer moves it.
/// Bytes are classified with a lookup table (`BYTE_PROPERTIES`), and
/// string bodies are scanned with `memchr2`.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    /// The raw byte slice of the input JSON.
    bytes: &'a [u8],
    /// The current position (index) in the `bytes` slice.
    cursor: usize,
    /// The `EndOfInput` or `Invalid` token, once one has been produced.
    terminal: Option<Token>,
}

impl<'a> From<&'a str> for Tokenizer<'a> {
    fn from(input: &'a str) -> Self {
        Tokenizer::new(input.as_bytes())
    }
}

impl<'a> Tokenizer<'a> {
    /// Creates a new `Tokenizer` over raw input bytes.
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            bytes: input,
            cursor: 0,
            terminal: None,
        }
    }

    /// The input this tokenizer scans.
    pub fn input(&self) -> &'a [u8] {
        self.bytes
    }

    /// The 1-indexed line and column of a byte offset in the input.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        line_column(self.bytes, offset)
    }

    /// Produces the next token.
    ///
    /// After `EndOfInput` or `Invalid` has been returned once, every
    /// later call returns that same token again.
    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.terminal {
            return token;
        }

        self.skip_whitespace();
        let start = self.cursor;

        let kind = match self.peek() {
            None => TokenKind::EndOfInput,
            Some(byte) => {
                let result = match BYTE_PROPERTIES[byte as usize] {
                    S => {
                        self.cursor += 1;
                        Ok(match byte {
                            b'{' => TokenKind::LeftBrace,
                            b'}' => TokenKind::RightBrace,
                            b'[' => TokenKind::LeftBracket,
                            b']' => TokenKind::RightBracket,
                            b':' => TokenKind::Colon,
                            _ => TokenKind::Comma,
                        })
                    }
                    L => self.lex_literal(byte),
                    D => self.lex_number(),
                    Q => self.lex_string(),
                    // Whitespace was skipped, so this byte starts no token.
                    _ => Err(LexicalError::UnexpectedCharacter(byte)),
                };
                result.unwrap_or_else(TokenKind::Invalid)
            }
        };

        let token = Token {
            kind,
            span: Span {
                start,
                len: self.cursor - start,
            },
        };
        if matches!(kind, TokenKind::EndOfInput | TokenKind::Invalid(_)) {
            self.terminal = Some(token);
        }
        token
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    /// Skips insignificant whitespace using the LUT.
    #[inline]
    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            if BYTE_PROPERTIES[byte as usize] != W {
                break;
            }
            self.cursor += 1;
        }
    }

    /// Advances over ASCII digits and returns how many there were.
    #[inline]
    fn skip_digits(&mut self) -> usize {
        let count = self.bytes[self.cursor..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        self.cursor += count;
        count
    }

    /// Lexes `true`, `false` or `null`.
    ///
    /// A keyword glued to an identifier byte (`nullable`, `true_`) is
    /// rejected as a whole rather than split.
    fn lex_literal(&mut self, first: u8) -> Result<TokenKind, LexicalError> {
        let (expected, kind): (&[u8], TokenKind) = match first {
            b't' => (b"true", TokenKind::True),
            b'f' => (b"false", TokenKind::False),
            _ => (b"null", TokenKind::Null),
        };

        let end = self.cursor + expected.len();
        if self.bytes.get(self.cursor..end) != Some(expected) {
            return Err(LexicalError::InvalidLiteral);
        }
        self.cursor = end;

        match self.peek() {
            Some(b) if b.is_ascii_alphanumeric() || b == b'_' => Err(LexicalError::InvalidLiteral),
            _ => Ok(kind),
        }
    }

    /// Lexes a number: `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
    ///
    /// On failure the cursor rests on the offending byte.
    fn lex_number(&mut self) -> Result<TokenKind, LexicalError> {
        if self.peek() == Some(b'-') {
            self.cursor += 1;
        }

        match self.peek() {
            Some(b'0') => {
                self.cursor += 1;
                if matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                    return Err(LexicalError::LeadingZero);
                }
            }
            Some(b'1'..=b'9') => {
                self.skip_digits();
            }
            _ => return Err(LexicalError::MissingIntegerDigits),
        }

        if self.peek() == Some(b'.') {
            self.cursor += 1;
            if self.skip_digits() == 0 {
                return Err(LexicalError::MissingFractionDigits);
            }
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.cursor += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.cursor += 1;
            }
            if self.skip_digits() == 0 {
                return Err(LexicalError::MissingExponentDigits);
            }
        }

        Ok(TokenKind::Number)
    }

    /// Lexes a string, checking escapes, control bytes and UTF-8.
    ///
    /// `memchr2` jumps straight to the next quote or backslash; the plain
    /// run before it is checked in one pass.
    fn lex_string(&mut self) -> Result<TokenKind, LexicalError> {
        let bytes = self.bytes;
        self.cursor += 1; // Opening '"'

        loop {
            let rest = &bytes[self.cursor..];
            let Some(i) = memchr2(b'"', b'\\', rest) else {
                self.check_plain(rest.len())?;
                return Err(LexicalError::UnterminatedString);
            };
            self.check_plain(i)?;

            if bytes[self.cursor] == b'"' {
                self.cursor += 1; // Closing '"'
                return Ok(TokenKind::String);
            }

            // A backslash: the cursor stays on it if the escape is bad.
            match bytes.get(self.cursor + 1) {
                Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
                    self.cursor += 2;
                }
                Some(b'u') => {
                    let hex = bytes.get(self.cursor + 2..self.cursor + 6);
                    match hex {
                        Some(digits) if digits.iter().all(u8::is_ascii_hexdigit) => {
                            self.cursor += 6;
                        }
                        _ => return Err(LexicalError::InvalidUnicodeEscape),
                    }
                }
                Some(_) => return Err(LexicalError::InvalidEscape),
                None => {
                    self.cursor += 1;
                    return Err(LexicalError::UnterminatedString);
                }
            }
        }
    }

    /// Checks the next `len` bytes of string content (no quotes or
    /// backslashes among them) and advances past them.
    ///
    /// `"` and `\` are ASCII, so they never split a UTF-8 sequence and each
    /// run can be validated on its own.
    fn check_plain(&mut self, len: usize) -> Result<(), LexicalError> {
        let bytes = self.bytes;
        let run = &bytes[self.cursor..self.cursor + len];
        let control = run.iter().position(|&b| b < 0x20);
        let text = &run[..control.unwrap_or(len)];

        if let Err(e) = str::from_utf8(text) {
            self.cursor += e.valid_up_to();
            return Err(LexicalError::InvalidUtf8);
        }
        if let Some(pos) = control {
            self.cursor += pos;
            return Err(LexicalError::ControlCharacter);
        }

        self.cursor += len;
        Ok(())
    }
}

/// Yields every token up to and including the first `EndOfInput` or
/// `Invalid` token, then stops.
impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.terminal.is_some() {
            return None;
        }
        Some(self.next_token())
    }
}
