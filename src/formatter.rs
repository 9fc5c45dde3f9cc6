//! Pretty-printer that serializes a `Keymap` back into canonical text.
//!
//! Produces one statement per line with modifier sigils in a fixed
//! order, so parsing the output yields an equal keymap. Long string
//! lists continue on indented lines.

use crate::hotkey::{Hotkey, Keymap, Operation};
use crate::keycode::{Keycode, Modifiers, render_key};
use crate::lexer::{MAX_LINE_LEN, MAX_LITERAL_LEN};

/// Indentation of a continued string list.
const INDENT: &str = "    ";

/// Room kept at the end of a line for ` norepeat` and the line break.
const TAIL: usize = " norepeat\n".len();

/// A keymap value that configuration text cannot express.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// String containing a line break.
    #[error("string {0:?} contains a line break")]
    LineBreak(String),
    /// String longer than a literal can hold.
    #[error("string of {0} bytes exceeds the {max}-byte literal limit", max = MAX_LITERAL_LEN)]
    TooLong(usize),
    /// Modifier key combined with its own modifier.
    #[error("key {0} modified with itself")]
    SelfModifiedKey(String),
}

/// Format a `Keymap` into configuration text.
///
/// The `active_window` declaration comes first, followed by a blank
/// line and the bindings in order.
///
/// # Errors
///
/// Returns [`FormatError`] if a string holds a line break or is longer
/// than [`MAX_LITERAL_LEN`], or a modifier key carries its own bit.
pub fn format(keymap: &Keymap) -> Result<String, FormatError> {
    let mut out = String::new();

    if keymap.restricts_windows() && !keymap.windows.is_empty() {
        out.push_str("active_window");
        push_strings(&mut out, &keymap.windows)?;
        out.push('\n');
        if !keymap.is_empty() {
            out.push('\n');
        }
    }

    for hotkey in keymap {
        format_hotkey(&mut out, hotkey)?;
    }

    Ok(out)
}

fn format_hotkey(out: &mut String, hotkey: &Hotkey) -> Result<(), FormatError> {
    format_key_expr(out, hotkey.key, hotkey.modifiers)?;
    out.push_str(" -> ");
    format_operation(out, &hotkey.operation)?;
    if hotkey.is_norepeat() {
        out.push_str(" norepeat");
    }
    out.push('\n');
    Ok(())
}

fn format_key_expr(
    out: &mut String,
    key: Keycode,
    modifiers: Modifiers,
) -> Result<(), FormatError> {
    if key.as_modifier().is_some_and(|own| modifiers.contains(own)) {
        return Err(FormatError::SelfModifiedKey(render_key(key, modifiers)));
    }
    out.push_str(&modifiers.sigils());
    out.push_str(key.lexeme());
    Ok(())
}

fn format_operation(out: &mut String, operation: &Operation) -> Result<(), FormatError> {
    use std::fmt::Write as _;

    match operation {
        Operation::SendKey { key, modifiers } => {
            out.push_str("key ");
            format_key_expr(out, *key, *modifiers)?;
        }
        Operation::Exec { argv } => {
            out.push_str("exec");
            push_strings(out, argv)?;
        }
        // Display already spells the rest the way the parser reads it.
        _ => {
            let _ = write!(out, "{operation}");
        }
    }
    Ok(())
}

/// Append each string quoted, breaking the line before one that would
/// push it past [`MAX_LINE_LEN`].
fn push_strings(out: &mut String, strings: &[String]) -> Result<(), FormatError> {
    for s in strings {
        if s.contains('\n') {
            return Err(FormatError::LineBreak(s.clone()));
        }
        if s.len() > MAX_LITERAL_LEN {
            return Err(FormatError::TooLong(s.len()));
        }
        let quoted = quote(s);
        let line_len = out.len() - out.rfind('\n').map_or(0, |i| i + 1);
        if line_len + 1 + quoted.len() + TAIL > MAX_LINE_LEN {
            out.push('\n');
            out.push_str(INDENT);
        } else {
            out.push(' ');
        }
        out.push_str(&quoted);
    }
    Ok(())
}

/// Wrap `s` in double quotes, escaping `"` and `\\`.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
