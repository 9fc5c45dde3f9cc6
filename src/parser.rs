use std::fmt;
use std::io::BufRead;
use std::rc::Rc;

use crate::Error;
use crate::diagnostic::{Diagnostic, DiagnosticSink, Label};
use crate::hotkey::{Hotkey, HotkeyFlags, Keymap, KeymapFlags, Operation};
use crate::keycode::{Keycode, Modifiers, lookup_keycode, render_key};
use crate::lexer::Lexer;
use crate::symbols::{Context, Function, GlobalDef, Qualifier};
use crate::token::{Span, Token, TokenKind};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A required construct was missing.
    Expected { what: &'static str, found: String },
    /// Token in key position that names no key.
    InvalidKey(String),
    /// Modifier key combined with its own modifier.
    SelfModifiedKey,
    /// Input ended in the middle of a statement.
    UnexpectedEof,
    /// `jump` offset that does not fit in 32 bits.
    NumberOutOfRange(i64),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected { what, found } => {
                write!(f, "expected {what}, found '{found}'")
            }
            Self::InvalidKey(key) => write!(f, "invalid key '{key}'"),
            Self::SelfModifiedKey => write!(f, "key modified with itself"),
            Self::UnexpectedEof => write!(f, "unexpected EOF when parsing"),
            Self::NumberOutOfRange(n) => write!(f, "number {n} out of range"),
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Parse a whole configuration from `reader`.
///
/// `path` only names the input in diagnostics. Warnings and notes go to
/// `sink` as they are found; a fatal error is reported there too before
/// it is returned, and no partial keymap survives it.
///
/// # Errors
///
/// Returns the first lexical, syntax or semantic error, or an I/O error
/// from the reader.
pub fn parse_reader<'a, R: BufRead>(
    ctx: &'a Context,
    path: &str,
    reader: R,
    sink: &'a mut dyn DiagnosticSink,
) -> Result<Keymap, Error> {
    Parser::new(Lexer::new(ctx, path, reader, sink)).parse()
}

struct Parser<'a, R> {
    lexer: Lexer<'a, R>,
    peeked: Option<Token>,
    /// First token of the statement being parsed.
    stmt_start: Option<Label>,
    /// Most recently consumed token.
    last: Option<Label>,
}

impl<'a, R: BufRead> Parser<'a, R> {
    const fn new(lexer: Lexer<'a, R>) -> Self {
        Self {
            lexer,
            peeked: None,
            stmt_start: None,
            last: None,
        }
    }

    fn parse(mut self) -> Result<Keymap, Error> {
        let mut keymap = Keymap::new();

        self.parse_globals(&mut keymap)?;

        while self.peek()?.is_some() {
            let hotkey = self.parse_binding()?;
            tracing::debug!(
                key = %render_key(hotkey.key, hotkey.modifiers),
                operation = %hotkey.operation,
                "hotkey"
            );
            keymap.hotkeys.push(hotkey);
        }

        Ok(keymap)
    }

    fn parse_globals(&mut self, keymap: &mut Keymap) -> Result<(), Error> {
        loop {
            let def = match self.peek()? {
                Some(Token {
                    kind: TokenKind::GlobalDef(def),
                    ..
                }) => *def,
                _ => return Ok(()),
            };
            self.begin_statement();
            self.bump()?;
            match def {
                GlobalDef::ActiveWindow => {
                    keymap.flags |= KeymapFlags::ACTIVE_WINDOW;
                    keymap.windows.extend(self.parse_strings()?);
                }
            }
        }
    }

    fn parse_binding(&mut self) -> Result<Hotkey, Error> {
        self.begin_statement();
        let (key, modifiers) = self.parse_key_expr()?;

        let token = self.next_required()?;
        if token.kind != TokenKind::Arrow {
            return Err(self.expected("'->'", &token));
        }

        let operation = self.parse_operation()?;

        let mut flags = HotkeyFlags::empty();
        if self
            .bump_if(|kind| *kind == TokenKind::Qual(Qualifier::NoRepeat))?
            .is_some()
        {
            flags |= HotkeyFlags::NOREPEAT;
        }

        Ok(Hotkey {
            key,
            modifiers,
            operation,
            flags,
        })
    }

    /// Parse modifier sigils and prefixes up to and including the key.
    ///
    /// `ctrl-q` and `^q` produce the same result: a modifier key name
    /// followed by `-` on the same line is folded into the mask.
    fn parse_key_expr(&mut self) -> Result<(Keycode, Modifiers), Error> {
        let mut declared: Vec<(Modifiers, Label)> = Vec::new();
        let mut start: Option<Label> = None;

        loop {
            let token = self.next_required()?;
            let label = token.label();
            if start.is_none() {
                start = Some(label.clone());
            }

            if let TokenKind::Mod(modifier) = token.kind {
                self.add_modifier(&mut declared, modifier, label);
                continue;
            }

            let key = self.resolve_key(&token)?;
            let prefix = match (&token.kind, key.as_modifier()) {
                (TokenKind::Ident(_), Some(modifier)) => Some(modifier),
                _ => None,
            };
            if let Some(modifier) = prefix {
                if self.minus_follows(token.span.line)? {
                    self.bump()?;
                    self.add_modifier(&mut declared, modifier, label);
                    continue;
                }
            }

            let modifiers = declared
                .iter()
                .fold(Modifiers::empty(), |mask, (m, _)| mask | *m);
            if key.as_modifier().is_some_and(|m| modifiers.contains(m)) {
                let label = start.map_or_else(|| label.clone(), |s| s.through(&label));
                return Err(self.fail(ParseErrorKind::SelfModifiedKey, label, None));
            }
            return Ok((key, modifiers));
        }
    }

    /// Record a modifier, reporting repeats without failing.
    fn add_modifier(
        &mut self,
        declared: &mut Vec<(Modifiers, Label)>,
        modifier: Modifiers,
        label: Label,
    ) {
        if let Some((_, first)) = declared.iter().find(|(m, _)| *m == modifier) {
            let diagnostic = Diagnostic::note(
                Rc::clone(self.lexer.path()),
                "duplicate modifier declaration",
                label,
            )
            .with_note("first declared here", first.clone());
            self.lexer.emit(diagnostic);
            return;
        }
        declared.push((modifier, label));
    }

    fn resolve_key(&mut self, token: &Token) -> Result<Keycode, Error> {
        let key = match &token.kind {
            TokenKind::Ident(name) => lookup_keycode(name),
            TokenKind::Num(n) => Keycode::from_digit(*n),
            TokenKind::Punct(c) => Keycode::from_punct(*c),
            _ => None,
        };
        match key {
            Some(key) => Ok(key),
            None => Err(self.fail(
                ParseErrorKind::InvalidKey(token.describe()),
                token.label(),
                None,
            )),
        }
    }

    fn minus_follows(&mut self, line: usize) -> Result<bool, Error> {
        Ok(self
            .peek()?
            .is_some_and(|t| t.is_punct('-') && t.span.line == line))
    }

    fn parse_operation(&mut self) -> Result<Operation, Error> {
        let token = self.next_required()?;
        let function = match &token.kind {
            TokenKind::Func(function) => *function,
            _ => return Err(self.expected("operation", &token)),
        };

        let operation = match function {
            Function::Click => Operation::Click,
            Function::RClick => Operation::RClick,
            Function::Jump => {
                let dx = self.parse_offset()?;
                let dy = self.parse_offset()?;
                Operation::Jump { dx, dy }
            }
            Function::Key => {
                let (key, modifiers) = self.parse_key_expr()?;
                Operation::SendKey { key, modifiers }
            }
            Function::Toggle => Operation::Toggle,
            Function::Quit => Operation::Quit,
            Function::Exec => Operation::Exec {
                argv: self.parse_strings()?,
            },
        };
        Ok(operation)
    }

    /// Parse an integer with an optional leading `-`.
    fn parse_offset(&mut self) -> Result<i32, Error> {
        let first = self.next_required()?;
        let (minus, token) = if first.is_punct('-') {
            (Some(first.label()), self.next_required()?)
        } else {
            (None, first)
        };

        let n = match token.kind {
            TokenKind::Num(n) => n,
            _ => return Err(self.expected("number", &token)),
        };
        let value = if minus.is_some() { -n } else { n };
        i32::try_from(value).map_err(|_| {
            let label = minus.map_or_else(|| token.label(), |m| m.through(&token.label()));
            self.fail(ParseErrorKind::NumberOutOfRange(value), label, None)
        })
    }

    /// Parse one or more string literals.
    fn parse_strings(&mut self) -> Result<Vec<String>, Error> {
        let token = self.next_required()?;
        let first = match token.kind {
            TokenKind::StrLit(s) => s,
            _ => return Err(self.expected("string literal", &token)),
        };

        let mut strings = vec![first];
        while let Some(Token {
            kind: TokenKind::StrLit(s),
            ..
        }) = self.bump_if(|kind| matches!(kind, TokenKind::StrLit(_)))?
        {
            strings.push(s);
        }
        Ok(strings)
    }

    fn peek(&mut self) -> Result<Option<&Token>, Error> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.scan()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn bump(&mut self) -> Result<Option<Token>, Error> {
        let token = match self.peeked.take() {
            Some(token) => Some(token),
            None => self.lexer.scan()?,
        };
        if let Some(token) = &token {
            let label = token.label();
            if self.stmt_start.is_none() {
                self.stmt_start = Some(label.clone());
            }
            self.last = Some(label);
        }
        Ok(token)
    }

    /// Consume the lookahead token only if `accept` matches its kind.
    fn bump_if(
        &mut self,
        accept: impl FnOnce(&TokenKind) -> bool,
    ) -> Result<Option<Token>, Error> {
        if self.peek()?.is_some_and(|t| accept(&t.kind)) {
            self.bump()
        } else {
            Ok(None)
        }
    }

    /// Consume a token that the grammar requires to be present.
    fn next_required(&mut self) -> Result<Token, Error> {
        if let Some(token) = self.bump()? {
            return Ok(token);
        }
        let note = match (&self.stmt_start, &self.last) {
            (Some(start), Some(last)) => Some(start.through(last)),
            (Some(start), None) => Some(start.clone()),
            _ => None,
        };
        let label = self.lexer.eof_label();
        Err(self.fail(ParseErrorKind::UnexpectedEof, label, note))
    }

    fn begin_statement(&mut self) {
        self.stmt_start = None;
    }

    fn expected(&mut self, what: &'static str, token: &Token) -> Error {
        let kind = ParseErrorKind::Expected {
            what,
            found: token.describe(),
        };
        self.fail(kind, token.label(), None)
    }

    /// Report a fatal error to the sink and build the matching [`Error`].
    fn fail(
        &mut self,
        kind: ParseErrorKind,
        label: Label,
        last_statement: Option<Label>,
    ) -> Error {
        let span = label.span;
        let mut diagnostic =
            Diagnostic::error(Rc::clone(self.lexer.path()), kind.to_string(), label);
        if let Some(note) = last_statement {
            diagnostic = diagnostic.with_note("last statement here", note);
        }
        self.lexer.emit(diagnostic);
        Error::Parse(ParseError { kind, span })
    }
}
