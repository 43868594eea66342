//! # rill-validate
//!
//! `rill-validate` is a fast, 100% safe, RFC 8259 JSON syntax validator,
//! built from scratch in pure Rust.
//!
//! It answers one question: is this buffer exactly one valid JSON
//! document? Nothing is decoded and no tree is built.
//!
//! ## Key Features
//!
//! * **100% Safe Rust:** Contains no `unsafe` code.
//! * **Pull-based:** The recognizer asks the tokenizer for one token at a
//!   time; no token list is ever materialized.
//! * **Fast paths:** A byte-class Lookup Table (LUT) for dispatch and
//!   `memchr` for scanning string bodies.
//! * **Fail-closed:** Nesting depth (and optionally input size) is
//!   limited, so hostile input cannot exhaust the stack.
//!
//! ## Quick Start
//!
//! ```
//! use rill_validate::is_valid;
//!
//! assert!(is_valid(r#"{ "hello": "world!" }"#));
//! assert!(!is_valid(r#"{ "hello": "world!", "oops" }"#));
//! assert!(is_valid("42"));
//! assert!(!is_valid("[1, 2,]"));
//! ```
//!
//! ## Diagnostics
//!
//! `validate` returns the first fault found:
//!
//! ```
//! use rill_validate::{validate, ErrorKind};
//!
//! let err = validate("[1, 2,]").unwrap_err();
//! assert!(matches!(err.kind, ErrorKind::UnexpectedToken { .. }));
//! assert_eq!((err.line, err.column), (1, 7));
//! ```

/// Contains the `ValidationError` type and its taxonomy.
pub mod error;
/// Contains the recursive-descent `Recognizer`.
pub mod recognizer;
/// Contains the `Token`, `TokenKind` and `Span` types.
pub mod token;
/// Contains the byte-based `Tokenizer`.
pub mod tokenizer;

pub use error::{ErrorKind, LexicalError, ValidationError};
pub use recognizer::{recognize, Recognizer};
pub use token::{Span, Token, TokenKind};
pub use tokenizer::Tokenizer;

// --- Constants ---
/// The default maximum nesting depth (e.g., `[[[]]]`) to prevent stack overflows.
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// The largest nesting depth the recognizer will honour.
///
/// Each level costs two stack frames, and 1024 levels fit comfortably in
/// the 2MB stack of a spawned thread. Larger limits are lowered to this.
pub const MAX_SAFE_DEPTH: usize = 1024;
/// The recommended maximum input size (10MB) for untrusted input.
pub const MAX_JSON_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Limits applied while validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// The deepest allowed nesting of objects and arrays.
    pub max_depth: usize,
    /// Inputs longer than this many bytes are rejected without scanning.
    pub max_input_bytes: Option<usize>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        ValidatorOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_bytes: None,
        }
    }
}

impl ValidatorOptions {
    /// Sets the maximum nesting depth.
    ///
    /// Values above `MAX_SAFE_DEPTH` are lowered to it when validating,
    /// so deeply nested input is rejected instead of overflowing the stack.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets (or clears) the maximum input size in bytes.
    pub fn max_input_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_input_bytes = limit;
        self
    }
}

/// A reusable JSON validator with fixed limits.
///
/// It holds no state between calls, so one `Validator` can be shared
/// across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validator {
    options: ValidatorOptions,
}

impl Validator {
    /// Creates a validator with the given limits.
    pub fn new(options: ValidatorOptions) -> Self {
        Validator { options }
    }

    /// The limits this validator applies.
    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    /// Checks that `input` is exactly one valid JSON document.
    ///
    /// # Errors
    /// Returns the first `ValidationError` found, whether lexical,
    /// grammatical or a limit.
    pub fn validate<T>(&self, input: &T) -> Result<(), ValidationError>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        let bytes = input.as_ref();

        if let Some(limit) = self.options.max_input_bytes {
            if bytes.len() > limit {
                log::trace!("input of {} bytes exceeds limit {}", bytes.len(), limit);
                return Err(ValidationError {
                    kind: ErrorKind::InputTooLarge { limit },
                    offset: 0,
                    line: 1,
                    column: 1,
                });
            }
        }

        let result =
            Recognizer::new(Tokenizer::new(bytes), self.options.max_depth).recognize();
        if let Err(e) = &result {
            log::debug!("rejected {} byte input: {}", bytes.len(), e);
        }
        result
    }

    /// Returns `true` if `input` is exactly one valid JSON document.
    pub fn is_valid<T>(&self, input: &T) -> bool
    where
        T: AsRef<[u8]> + ?Sized,
    {
        self.validate(input).is_ok()
    }
}

/// Checks that `input` is exactly one valid JSON document, using the
/// default limits.
///
/// # Errors
/// Returns the first `ValidationError` found.
///
/// # Examples
/// ```
/// use rill_validate::{validate, ErrorKind};
///
/// assert!(validate("[1, null]").is_ok());
/// assert_eq!(validate("").unwrap_err().kind, ErrorKind::EmptyInput);
/// assert_eq!(validate("{} x").unwrap_err().kind, ErrorKind::Lexical(
///     rill_validate::LexicalError::UnexpectedCharacter(b'x'),
/// ));
/// ```
pub fn validate<T>(input: &T) -> Result<(), ValidationError>
where
    T: AsRef<[u8]> + ?Sized,
{
    Validator::default().validate(input)
}

/// Returns `true` iff `input` is one complete, valid RFC 8259 JSON
/// document, with nothing but whitespace around it.
///
/// Accepts `&str`, `&[u8]`, `String` and `Vec<u8>`. A NUL byte is an
/// ordinary byte, never a terminator.
///
/// # Examples
/// ```
/// use rill_validate::is_valid;
///
/// assert!(is_valid("null"));
/// assert!(is_valid(b"[1, 2, 3]"));
/// assert!(!is_valid(""));
/// assert!(!is_valid("01"));
/// ```
pub fn is_valid<T>(input: &T) -> bool
where
    T: AsRef<[u8]> + ?Sized,
{
    validate(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_accepts_bytes_and_strings() {
        assert!(is_valid("[1]"));
        assert!(is_valid(&String::from("[1]")));
        assert!(is_valid(b"[1]"));
        assert!(is_valid(&vec![b'[', b'1', b']']));
        assert!(is_valid(&b"[1]"[..]));
    }

    #[test]
    fn test_nul_is_an_ordinary_byte() {
        assert!(!is_valid("1\0"));
        assert!(!is_valid("\"a\0\""));
        assert!(is_valid("\"a\\u0000\""));
    }

    #[test]
    fn test_default_options() {
        let options = ValidatorOptions::default();
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(options.max_input_bytes, None);
        assert_eq!(Validator::default().options(), options);
    }

    #[test]
    fn test_size_limit() {
        let validator = Validator::new(ValidatorOptions::default().max_input_bytes(Some(4)));
        assert!(validator.is_valid("[1]"));
        assert!(validator.is_valid("[10]"));

        let err = validator.validate("[100]").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InputTooLarge { limit: 4 });
        assert_eq!((err.offset, err.line, err.column), (0, 1, 1));
    }

    #[test]
    fn test_depth_option() {
        let validator = Validator::new(ValidatorOptions::default().max_depth(2));
        assert!(validator.is_valid("[[1]]"));
        assert_eq!(
            validator.validate("[[[1]]]").unwrap_err().kind,
            ErrorKind::DepthLimitExceeded { max_depth: 2 }
        );
    }

    #[test]
    fn test_depth_option_is_capped() {
        let depth = 20_000;
        let input = "[".repeat(depth) + &"]".repeat(depth);
        let handle = std::thread::spawn(move || {
            Validator::new(ValidatorOptions::default().max_depth(depth)).validate(&input)
        });
        let err = handle.join().unwrap().unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::DepthLimitExceeded {
                max_depth: MAX_SAFE_DEPTH
            }
        );
        assert_eq!(err.offset, MAX_SAFE_DEPTH);

        let at_cap = "[".repeat(MAX_SAFE_DEPTH) + &"]".repeat(MAX_SAFE_DEPTH);
        let validator = Validator::new(ValidatorOptions::default().max_depth(usize::MAX));
        assert!(std::thread::spawn(move || validator.is_valid(&at_cap))
            .join()
            .unwrap());
    }

    #[test]
    fn test_validator_is_shareable_across_threads() {
        let validator = Validator::default();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let doc = format!("{{\"n\": {}}}", i);
                    validator.is_valid(&doc) && !validator.is_valid("[")
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
