//! Property-based tests with proptest.
//!
//! Generate random keymaps, format them, parse them back, and verify
//! the result is equal to what was generated and formats identically.

use kbm_rs::{
    Context, Hotkey, HotkeyFlags, Keycode, Keymap, KeymapFlags, Modifiers, Operation, format,
    parse_str, render_key,
};
use proptest::prelude::*;

// -- Leaf strategies --

fn keycode() -> impl Strategy<Value = Keycode> {
    prop::sample::select(Keycode::ALL)
}

fn modifiers() -> impl Strategy<Value = Modifiers> {
    (0u8..16).prop_map(Modifiers::from_bits_truncate)
}

/// Key and modifiers, never combining a modifier key with itself.
fn key_combo() -> impl Strategy<Value = (Keycode, Modifiers)> {
    (keycode(), modifiers()).prop_map(|(key, mods)| match key.as_modifier() {
        Some(own) => (key, mods - own),
        None => (key, mods),
    })
}

/// String literal content: printable ASCII including quotes and
/// backslashes, no line breaks.
fn literal() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .:/\"\\\\_#-]{0,24}"
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::Click),
        Just(Operation::RClick),
        (any::<i32>(), any::<i32>()).prop_map(|(dx, dy)| Operation::Jump { dx, dy }),
        key_combo().prop_map(|(key, modifiers)| Operation::SendKey { key, modifiers }),
        Just(Operation::Toggle),
        Just(Operation::Quit),
        prop::collection::vec(literal(), 1..=4).prop_map(|argv| Operation::Exec { argv }),
    ]
}

fn hotkey() -> impl Strategy<Value = Hotkey> {
    (key_combo(), operation(), any::<bool>()).prop_map(|((key, modifiers), operation, norepeat)| {
        Hotkey {
            key,
            modifiers,
            operation,
            flags: if norepeat {
                HotkeyFlags::NOREPEAT
            } else {
                HotkeyFlags::empty()
            },
        }
    })
}

fn keymap() -> impl Strategy<Value = Keymap> {
    (
        prop::collection::vec(literal(), 0..=3),
        prop::collection::vec(hotkey(), 0..=8),
    )
        .prop_map(|(windows, hotkeys)| Keymap {
            flags: if windows.is_empty() {
                KeymapFlags::empty()
            } else {
                KeymapFlags::ACTIVE_WINDOW
            },
            windows,
            hotkeys,
        })
}

/// Spell a key combination with named prefixes instead of sigils.
fn prefix_spelling(key: Keycode, modifiers: Modifiers) -> String {
    let mut out = String::new();
    for (flag, prefix) in [
        (Modifiers::SHIFT, "shift-"),
        (Modifiers::META, "alt-"),
        (Modifiers::SUPER, "win-"),
        (Modifiers::CTRL, "ctrl-"),
    ] {
        if modifiers.contains(flag) {
            out.push_str(prefix);
        }
    }
    out.push_str(key.lexeme());
    out
}

// -- Property tests --

proptest! {
    /// Parsing the formatted text yields the same keymap.
    #[test]
    fn format_then_parse_is_identity(km in keymap()) {
        let formatted = format(&km).unwrap();
        let parsed = parse_str(&Context::new(), &formatted)
            .map_err(|e| {
                TestCaseError::fail(
                    std::format!("parse error: {e}\n--- output ---\n{formatted}"))
            })?;
        prop_assert_eq!(km, parsed);
    }

    /// Formatting is idempotent: format(parse(format(x))) == format(x).
    #[test]
    fn format_idempotent(km in keymap()) {
        let ctx = Context::new();
        let r1 = format(&km).unwrap();
        let parsed = parse_str(&ctx, &r1).unwrap();
        let r2 = format(&parsed).unwrap();
        prop_assert_eq!(r1, r2);
    }

    /// Parsing the same text twice gives equal keymaps.
    #[test]
    fn parse_is_deterministic(km in keymap()) {
        let ctx = Context::new();
        let text = format(&km).unwrap();
        prop_assert_eq!(parse_str(&ctx, &text).unwrap(), parse_str(&ctx, &text).unwrap());
    }

    /// Named prefixes and sigils describe the same combination.
    #[test]
    fn prefix_and_sigil_agree((key, mods) in key_combo()) {
        let ctx = Context::new();
        let named = parse_str(&ctx, &std::format!("{} -> click", prefix_spelling(key, mods)))
            .unwrap();
        let sigils = parse_str(&ctx, &std::format!("{}{} -> click", mods.sigils(), key.lexeme()))
            .unwrap();
        prop_assert_eq!(&named, &sigils);
        prop_assert_eq!(named.hotkeys[0].key, key);
        prop_assert_eq!(named.hotkeys[0].modifiers, mods);
    }

    /// Rendering never yields an empty string and is stable.
    #[test]
    fn render_is_stable((key, mods) in key_combo()) {
        let rendered = render_key(key, mods);
        prop_assert!(!rendered.is_empty());
        prop_assert!(rendered.ends_with(key.name()));
        prop_assert_eq!(rendered, render_key(key, mods));
    }

    /// Arbitrary printable input never panics the parser.
    #[test]
    fn arbitrary_input_does_not_panic(input in "[ -~\n]{0,64}") {
        let _ = parse_str(&Context::new(), &input);
    }
}
