//! Contains the recursive-descent `Recognizer`.
//!
//! Each grammar rule is one method:
//!
//! ```text
//! value   := object | array | string | number | "true" | "false" | "null"
//! object  := "{" [ member ("," member)* ] "}"
//! member  := string ":" value
//! array   := "[" [ value ("," value)* ] "]"
//! ```
//!
//! The recognizer holds exactly one lookahead token and pulls the next
//! one from the `Tokenizer` only after consuming the current one. The
//! first fault of any kind ends recognition.

use crate::error::{ErrorKind, ValidationError};
use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::{DEFAULT_MAX_DEPTH, MAX_SAFE_DEPTH};

/// A recursive-descent recognizer for the JSON grammar.
pub struct Recognizer<'a> {
    /// The token source. It owns the scan position.
    tokenizer: Tokenizer<'a>,
    /// The current, not yet consumed, token.
    lookahead: Token,
    /// The maximum allowed nesting depth of objects and arrays.
    max_depth: usize,
    /// The *current* nesting depth.
    depth: usize,
}

impl<'a> Recognizer<'a> {
    /// Creates a `Recognizer` and primes its lookahead token.
    ///
    /// `max_depth` is capped at `MAX_SAFE_DEPTH`.
    pub fn new(mut tokenizer: Tokenizer<'a>, max_depth: usize) -> Self {
        let lookahead = tokenizer.next_token();
        Recognizer {
            tokenizer,
            lookahead,
            max_depth: max_depth.min(MAX_SAFE_DEPTH),
            depth: 0,
        }
    }

    /// Recognizes exactly one value followed by the end of input.
    pub fn recognize(mut self) -> Result<(), ValidationError> {
        if self.lookahead.kind == TokenKind::EndOfInput {
            return Err(self.error(ErrorKind::EmptyInput));
        }

        self.value()?;

        match self.lookahead.kind {
            TokenKind::EndOfInput => Ok(()),
            TokenKind::Invalid(reason) => Err(self.error(ErrorKind::Lexical(reason))),
            _ => Err(self.error(ErrorKind::TrailingContent)),
        }
    }

    /// Consumes the lookahead and pulls the next token.
    #[inline]
    fn advance(&mut self) {
        self.lookahead = self.tokenizer.next_token();
    }

    /// Builds an error located at the lookahead token.
    ///
    /// Lexical errors point at the offending byte, which is where the
    /// tokenizer stopped.
    fn error(&self, kind: ErrorKind) -> ValidationError {
        let offset = match kind {
            ErrorKind::Lexical(_) => self.lookahead.span.end(),
            _ => self.lookahead.span.start,
        };
        let (line, column) = self.tokenizer.position(offset);
        ValidationError {
            kind,
            offset,
            line,
            column,
        }
    }

    /// The error for a lookahead that does not fit the grammar here.
    ///
    /// An `Invalid` lookahead always reports its lexical reason.
    fn unexpected(&self, expected: &'static str) -> ValidationError {
        let kind = match self.lookahead.kind {
            TokenKind::Invalid(reason) => ErrorKind::Lexical(reason),
            found => ErrorKind::UnexpectedToken { expected, found },
        };
        self.error(kind)
    }

    /// Consumes a token of `kind`, or fails.
    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), ValidationError> {
        if self.lookahead.kind != kind {
            return Err(self.unexpected(expected));
        }
        self.advance();
        Ok(())
    }

    /// Enters an object or array, enforcing the depth limit.
    fn enter(&mut self) -> Result<(), ValidationError> {
        if self.depth >= self.max_depth {
            log::trace!("nesting depth limit {} reached", self.max_depth);
            return Err(self.error(ErrorKind::DepthLimitExceeded {
                max_depth: self.max_depth,
            }));
        }
        self.depth += 1;
        self.advance();
        Ok(())
    }

    fn value(&mut self) -> Result<(), ValidationError> {
        match self.lookahead.kind {
            TokenKind::LeftBrace => self.object(),
            TokenKind::LeftBracket => self.array(),
            kind if kind.starts_value() => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected("a value")),
        }
    }

    fn object(&mut self) -> Result<(), ValidationError> {
        self.enter()?;

        if self.lookahead.kind == TokenKind::RightBrace {
            self.advance();
            self.depth -= 1;
            return Ok(());
        }

        // Duplicate keys are syntactically fine and are not tracked.
        loop {
            self.member()?;
            match self.lookahead.kind {
                TokenKind::Comma => self.advance(),
                TokenKind::RightBrace => {
                    self.advance();
                    self.depth -= 1;
                    return Ok(());
                }
                _ => return Err(self.unexpected("',' or '}'")),
            }
        }
    }

    fn member(&mut self) -> Result<(), ValidationError> {
        // After a comma this also rejects a trailing `}`.
        self.expect(TokenKind::String, "a string key")?;
        self.expect(TokenKind::Colon, "':'")?;
        self.value()
    }

    fn array(&mut self) -> Result<(), ValidationError> {
        self.enter()?;

        if self.lookahead.kind == TokenKind::RightBracket {
            self.advance();
            self.depth -= 1;
            return Ok(());
        }

        loop {
            // After a comma this also rejects a trailing `]`.
            self.value()?;
            match self.lookahead.kind {
                TokenKind::Comma => self.advance(),
                TokenKind::RightBracket => {
                    self.advance();
                    self.depth -= 1;
                    return Ok(());
                }
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }
    }
}

/// Returns `true` if the tokenizer yields exactly one valid JSON value
/// followed by the end of input.
///
/// Nesting is limited to `DEFAULT_MAX_DEPTH`.
pub fn recognize(tokenizer: Tokenizer<'_>) -> bool {
    Recognizer::new(tokenizer, DEFAULT_MAX_DEPTH)
        .recognize()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexicalError;

    fn run(input: &str) -> Result<(), ValidationError> {
        Recognizer::new(Tokenizer::from(input), DEFAULT_MAX_DEPTH).recognize()
    }

    fn run_with_depth(input: &str, max_depth: usize) -> Result<(), ValidationError> {
        Recognizer::new(Tokenizer::from(input), max_depth).recognize()
    }

    #[test]
    fn test_recognize_scalars_and_containers() {
        for input in ["null", "true", "false", "0", "-1.5e3", r#""a""#, "{}", "[]"] {
            assert!(recognize(Tokenizer::from(input)), "{input}");
        }
        assert!(run(r#"[{"a": 1, "b": [null, {"c": {}}]}]"#).is_ok());
    }

    #[test]
    fn test_array_errors() {
        let err = run("[1 true]").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken {
                expected: "',' or ']'",
                found: TokenKind::True
            }
        );
        assert_eq!((err.line, err.column), (1, 4));

        let err = run("[1, 2,]").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken {
                expected: "a value",
                found: TokenKind::RightBracket
            }
        );
        assert_eq!(err.column, 7);

        let err = run("[1,,2]").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken {
                expected: "a value",
                found: TokenKind::Comma
            }
        );
    }

    #[test]
    fn test_object_errors() {
        let err = run("{ : 1 }").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken {
                expected: "a string key",
                found: TokenKind::Colon
            }
        );
        assert_eq!((err.line, err.column), (1, 3));

        let err = run("{\"key\" 1}").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken {
                expected: "':'",
                found: TokenKind::Number
            }
        );
        assert_eq!(err.column, 8);

        let err = run("{\"key\": 1,}").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken {
                expected: "a string key",
                found: TokenKind::RightBrace
            }
        );
        assert_eq!(err.column, 11);

        let err = run(r#"{ "hello": "world!", "oops" }"#).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken {
                expected: "':'",
                found: TokenKind::RightBrace
            }
        );

        let err = run("{1: 2}").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn test_duplicate_keys_accepted() {
        assert!(run(r#"{"a":1,"a":2}"#).is_ok());
    }

    #[test]
    fn test_unclosed_structures() {
        let err = run("[1, 2").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken {
                expected: "',' or ']'",
                found: TokenKind::EndOfInput
            }
        );
        assert_eq!(err.offset, 5);

        let err = run("{\"a\":").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken {
                expected: "a value",
                found: TokenKind::EndOfInput
            }
        );
    }

    #[test]
    fn test_lexical_errors_surface_with_reason() {
        let err = run("[1, ?]").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::Lexical(LexicalError::UnexpectedCharacter(b'?'))
        );
        assert_eq!((err.line, err.column), (1, 5));

        let err = run("\"\n\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lexical(LexicalError::ControlCharacter));
        assert_eq!((err.line, err.column), (1, 2));

        // A bad token after a complete value is still a lexical error.
        let err = run("1 @").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::Lexical(LexicalError::UnexpectedCharacter(b'@'))
        );
    }

    #[test]
    fn test_trailing_and_empty() {
        let err = run("[1] [2]").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TrailingContent);
        assert_eq!((err.line, err.column), (1, 5));

        assert_eq!(run("").unwrap_err().kind, ErrorKind::EmptyInput);
        assert_eq!(run(" \n ").unwrap_err().kind, ErrorKind::EmptyInput);
    }

    #[test]
    fn test_depth_limit() {
        let evil_input = "[".repeat(101) + &"]".repeat(101);
        let err = run_with_depth(&evil_input, 100).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthLimitExceeded { max_depth: 100 });
        assert_eq!((err.line, err.column), (1, 101));

        let ok_input = "[".repeat(100) + &"]".repeat(100);
        assert!(run_with_depth(&ok_input, 100).is_ok());

        // Depth is released when a container closes.
        let siblings = "[".to_string() + &vec!["[[]]"; 50].join(",") + "]";
        assert!(run_with_depth(&siblings, 3).is_ok());
        assert!(run_with_depth("{\"a\":{\"b\":[]}}", 2).is_err());
        assert!(run_with_depth("1", 0).is_ok());
        assert!(run_with_depth("[]", 0).is_err());
    }

    #[test]
    fn test_depth_limit_is_capped() {
        let depth = MAX_SAFE_DEPTH + 1;
        let input = "[".repeat(depth) + &"]".repeat(depth);
        let err = run_with_depth(&input, usize::MAX).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::DepthLimitExceeded {
                max_depth: MAX_SAFE_DEPTH
            }
        );
    }

    #[test]
    fn test_very_deep_input_fails_closed() {
        let depth = 10_000;
        let input = "[".repeat(depth) + &"]".repeat(depth);
        let err = run(&input).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::DepthLimitExceeded {
                max_depth: DEFAULT_MAX_DEPTH
            }
        );
    }
}
