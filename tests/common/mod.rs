#![allow(dead_code)]

use kbm_rs::{Context, Diagnostic, Error, Keymap, format, parse_reader, parse_str};

/// Parse `input`, collecting every diagnostic.
pub fn parse_collect(input: &str) -> (Result<Keymap, Error>, Vec<Diagnostic>) {
    let ctx = Context::new();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let result = parse_reader(&ctx, "test.kbm", input.as_bytes(), &mut sink);
    (result, sink)
}

pub fn parse_ok(input: &str) -> Keymap {
    parse_str(&Context::new(), input).unwrap_or_else(|e| panic!("parse failed: {e}\n{input}"))
}

pub fn roundtrip(input: &str) {
    let keymap = parse_ok(input);
    let output = format(&keymap).unwrap_or_else(|e| panic!("format failed: {e}"));
    assert_eq!(
        output, input,
        "round-trip mismatch:\n--- expected ---\n{input}\n--- got ---\n{output}"
    );
}

/// Helper: format a keymap, parse it back, assert structural equality.
pub fn assert_keymap_roundtrip(original: &Keymap) {
    let formatted = format(original).unwrap_or_else(|e| panic!("format failed: {e}"));
    let parsed = parse_str(&Context::new(), &formatted).unwrap_or_else(|e| {
        panic!(
            "failed to re-parse formatted output: {e}\n\
             --- formatted ---\n{formatted}"
        )
    });

    assert_eq!(
        original.windows, parsed.windows,
        "windows mismatch\n--- formatted ---\n{formatted}"
    );
    assert_eq!(
        original.hotkeys, parsed.hotkeys,
        "hotkeys mismatch\n--- formatted ---\n{formatted}"
    );
}
