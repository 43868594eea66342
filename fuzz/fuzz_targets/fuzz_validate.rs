#![no_main]
use libfuzzer_sys::fuzz_target;

use rill_validate::{is_valid, validate, Tokenizer, TokenKind};

fuzz_target!(|data: &[u8]| {
    // We are looking for panics, so raw bytes go straight in.
    let verdict = is_valid(data);

    // No hidden state: a second run agrees.
    assert_eq!(verdict, is_valid(data));

    // Errors always point inside the input.
    if let Err(e) = validate(data) {
        assert!(e.offset <= data.len());
    }

    // The `&str` and `&[u8]` entry points agree.
    if let Ok(s) = std::str::from_utf8(data) {
        assert_eq!(verdict, is_valid(s));
    }

    // Every span is in bounds, and the tokenizer stops.
    let mut tokens = 0;
    for token in Tokenizer::new(data) {
        assert!(token.span.end() <= data.len());
        tokens += 1;
        if matches!(token.kind, TokenKind::EndOfInput | TokenKind::Invalid(_)) {
            break;
        }
    }
    assert!(tokens <= data.len() + 1);
});
