//! Lexer, parser, and diagnostics for kbm hotkey configuration files.
//!
//! A configuration maps key combinations to operations, one binding per
//! line, optionally preceded by global declarations:
//!
//! ```text
//! active_window "Firefox" "Terminal"
//!
//! ^!q -> quit
//! @!o -> exec "firefox" "https://example.com"
//! f -> jump 100 200
//! ^k -> key !k norepeat
//! ```
//!
//! Parsing stops at the first fatal error. Every problem found is
//! reported to a [`DiagnosticSink`] as a compiler-style diagnostic, and
//! the caller gets back either a complete [`Keymap`] or an [`Error`].
//!
//! # Quick start
//!
//! ## Parse and re-format a configuration
//!
//! ```
//! use kbm_rs::{Context, format, parse_str};
//!
//! let ctx = Context::new();
//! let keymap = parse_str(&ctx, "ctrl-shift-q -> quit\n").unwrap();
//! assert_eq!(keymap.len(), 1);
//! assert_eq!(format(&keymap).unwrap(), "^!q -> quit\n");
//! ```
//!
//! ## Build a keymap programmatically
//!
//! ```
//! use kbm_rs::{Hotkey, Keycode, Keymap, Modifiers, Operation, format};
//!
//! let keymap = Keymap::new()
//!     .active_window("Firefox")
//!     .bind(Hotkey::new(Keycode::K, Modifiers::CTRL, Operation::Toggle).norepeat());
//!
//! let output = format(&keymap).unwrap();
//! assert!(output.contains("^k -> toggle norepeat"));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod builder;
pub mod diagnostic;
pub mod formatter;
pub mod hotkey;
pub mod keycode;
pub mod lexer;
pub mod parser;
pub mod symbols;
pub mod token;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

pub use diagnostic::{Diagnostic, DiagnosticSink, Emitter, Label, Note, Renderer, Severity};
pub use formatter::{FormatError, format};
pub use hotkey::{Hotkey, HotkeyFlags, Keymap, KeymapFlags, Operation};
pub use keycode::{Keycode, Modifiers, lookup_keycode, render_key};
pub use lexer::{LexError, LexErrorKind, Lexer, MAX_LINE_LEN, MAX_LITERAL_LEN, tokenize};
pub use parser::{ParseError, ParseErrorKind, parse_reader};
pub use symbols::{Context, Function, GlobalDef, Qualifier, Reserved, Symbols};
pub use token::{Span, Token, TokenKind};

/// Unified error type covering reading, lexing, and parsing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input could not be read.
    #[error("{0}")]
    Io(#[from] io::Error),
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// Parse the configuration file at `path`; `-` reads standard input.
pub fn parse_file<'a>(
    ctx: &'a Context,
    path: &Path,
    sink: &'a mut dyn DiagnosticSink,
) -> Result<Keymap, Error> {
    let keymap = if path.as_os_str() == "-" {
        parse_reader(ctx, "<stdin>", io::stdin().lock(), sink)?
    } else {
        let file = File::open(path)?;
        let name = path.display().to_string();
        parse_reader(ctx, &name, BufReader::new(file), sink)?
    };
    tracing::debug!(
        path = %path.display(),
        hotkeys = keymap.len(),
        windows = keymap.windows.len(),
        "keymap loaded"
    );
    Ok(keymap)
}

/// Parse a configuration held in memory, discarding non-fatal diagnostics.
pub fn parse_str(ctx: &Context, input: &str) -> Result<Keymap, Error> {
    let mut sink: Vec<Diagnostic> = Vec::new();
    parse_reader(ctx, "<input>", input.as_bytes(), &mut sink)
}
