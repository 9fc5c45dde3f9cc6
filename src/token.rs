use std::rc::Rc;

use crate::diagnostic::Label;
use crate::keycode::Modifiers;
use crate::symbols::{Function, GlobalDef, Qualifier};

/// Source location for error reporting.
///
/// `line` and `column` are 1-based; `column` and `len` count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub len: usize,
}

impl Span {
    #[must_use]
    pub const fn new(line: usize, column: usize, len: usize) -> Self {
        Self { line, column, len }
    }

    /// Byte offset of the first column.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.column.saturating_sub(1)
    }

    /// Byte offset one past the last column.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset() + self.len
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Unsigned decimal integer.
    Num(i64),
    /// Identifier that is not a reserved word.
    Ident(String),
    /// `->`
    Arrow,
    /// Reserved operation name.
    Func(Function),
    /// Reserved qualifier.
    Qual(Qualifier),
    /// Reserved global declaration keyword.
    GlobalDef(GlobalDef),
    /// Double-quoted string literal, escapes resolved.
    StrLit(String),
    /// Modifier sigil (`^ ! ~ @`).
    Mod(Modifiers),
    /// Any other single ASCII punctuation character.
    Punct(char),
}

/// A single token with its kind, location, and the line it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub source: Rc<str>,
}

impl Token {
    /// Source text of the token on its starting line.
    #[must_use]
    pub fn lexeme(&self) -> &str {
        let end = self.span.end().min(self.source.len());
        self.source.get(self.span.offset()..end).unwrap_or_default()
    }

    /// Label pointing at this token, for diagnostics.
    #[must_use]
    pub fn label(&self) -> Label {
        Label::new(self.span, Rc::clone(&self.source))
    }

    /// How the token is named in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Num(n) => n.to_string(),
            TokenKind::Ident(s) | TokenKind::StrLit(s) => s.clone(),
            TokenKind::Arrow => "->".to_string(),
            TokenKind::Func(f) => f.as_str().to_string(),
            TokenKind::Qual(q) => q.as_str().to_string(),
            TokenKind::GlobalDef(g) => g.as_str().to_string(),
            TokenKind::Mod(m) => m.sigils(),
            TokenKind::Punct(c) => c.to_string(),
        }
    }

    #[must_use]
    pub const fn is_punct(&self, ch: char) -> bool {
        matches!(self.kind, TokenKind::Punct(c) if c == ch)
    }
}
