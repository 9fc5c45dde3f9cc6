use std::fmt;
use std::io::{self, BufRead, Read};
use std::rc::Rc;

use crate::Error;
use crate::diagnostic::{Diagnostic, DiagnosticSink, Label};
use crate::keycode::Modifiers;
use crate::symbols::{Context, Reserved, Symbols};
use crate::token::{Span, Token, TokenKind};

/// Longest string literal kept, in bytes. Anything past it is dropped
/// with a warning.
pub const MAX_LITERAL_LEN: usize = 1023;

/// Longest physical line accepted, in bytes, counting its line break.
pub const MAX_LINE_LEN: usize = 4096;

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// String literal not closed before end of line or file.
    UnterminatedString,
    /// Character that cannot start any token.
    UnrecognizedCharacter(char),
    /// Integer literal larger than `i64::MAX`.
    IntegerOverflow,
    /// Physical line longer than [`MAX_LINE_LEN`].
    LineTooLong,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => {
                write!(f, "unterminated string literal")
            }
            Self::UnrecognizedCharacter(ch) => {
                write!(f, "unrecognized character '{}'", ch.escape_default())
            }
            Self::IntegerOverflow => {
                write!(f, "integer literal too large")
            }
            Self::LineTooLong => {
                write!(f, "line longer than {MAX_LINE_LEN} bytes")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokenize a source string, discarding warnings.
///
/// # Errors
///
/// Returns the first lexical error in `input`.
pub fn tokenize(ctx: &Context, input: &str) -> Result<Vec<Token>, Error> {
    let mut sink: Vec<Diagnostic> = Vec::new();
    let mut lexer = Lexer::new(ctx, "<input>", input.as_bytes(), &mut sink);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.scan()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// Streaming lexer that reads its input one physical line at a time.
pub struct Lexer<'a, R> {
    symbols: &'a Symbols,
    reader: R,
    sink: &'a mut dyn DiagnosticSink,
    path: Rc<str>,
    line_num: usize,
    line: Rc<str>,
    pos: usize,
    at_eof: bool,
}

impl<'a, R: BufRead> Lexer<'a, R> {
    #[must_use]
    pub fn new(
        ctx: &'a Context,
        path: &str,
        reader: R,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            symbols: ctx.symbols(),
            reader,
            sink,
            path: Rc::from(path),
            line_num: 0,
            line: Rc::from(""),
            pos: 0,
            at_eof: false,
        }
    }

    #[must_use]
    pub const fn path(&self) -> &Rc<str> {
        &self.path
    }

    /// Number of the line currently buffered (1-based, 0 before the first read).
    #[must_use]
    pub const fn line_number(&self) -> usize {
        self.line_num
    }

    /// Advance to the next line that is not blank.
    ///
    /// Returns `false` at end of input; the last non-blank line stays
    /// buffered so diagnostics can still point into it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the reader fails or the input is not UTF-8,
    /// and [`LexErrorKind::LineTooLong`] for a line over [`MAX_LINE_LEN`].
    pub fn next_line(&mut self) -> Result<bool, Error> {
        let (line, line_num) = (Rc::clone(&self.line), self.line_num);
        loop {
            if !self.read_physical_line()? {
                self.line = line;
                self.line_num = line_num;
                self.pos = self.line.len();
                return Ok(false);
            }
            if !self.line.trim().is_empty() {
                return Ok(true);
            }
        }
    }

    /// Return the next token, or `None` at end of input.
    ///
    /// Whitespace and `#` comments are skipped, across lines.
    ///
    /// # Errors
    ///
    /// Returns the lexical error, already reported to the diagnostic
    /// sink, or an I/O error from the reader.
    pub fn scan(&mut self) -> Result<Option<Token>, Error> {
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(b'\n' | b'#') => {
                    if !self.next_line()? {
                        return Ok(None);
                    }
                }
                Some(_) => break,
            }
        }

        let start = self.pos;
        let kind = match self.line.as_bytes()[start] {
            b'0'..=b'9' => self.read_number()?,
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.read_word(),
            b'"' => return self.read_str().map(Some),
            b'-' if self.peek_at(1) == Some(b'>') => {
                self.pos += 2;
                TokenKind::Arrow
            }
            c if c.is_ascii_punctuation() => {
                let ch = char::from(c);
                self.single(Modifiers::from_sigil(ch).map_or(TokenKind::Punct(ch), TokenKind::Mod))
            }
            _ => {
                let ch = self.peek_char().unwrap_or_default();
                let label = self.here(ch.len_utf8());
                return Err(self.fail(LexErrorKind::UnrecognizedCharacter(ch), label, None));
            }
        };

        let token = self.token(kind, start);
        tracing::trace!(
            line = token.span.line,
            column = token.span.column,
            kind = ?token.kind,
            "token"
        );
        Ok(Some(token))
    }

    /// Label at the end of the last line read, for end-of-file errors.
    #[must_use]
    pub fn eof_label(&self) -> Label {
        let text_len = self.line.trim_end_matches(['\n', '\r']).len();
        Label::new(
            Span::new(self.line_num, text_len + 1, 1),
            Rc::clone(&self.line),
        )
    }

    /// Hand a diagnostic to the sink.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.sink.emit(diagnostic);
    }

    fn read_physical_line(&mut self) -> Result<bool, Error> {
        if self.at_eof {
            return Ok(false);
        }
        let mut bytes = Vec::new();
        let limit = MAX_LINE_LEN as u64 + 1;
        if self.reader.by_ref().take(limit).read_until(b'\n', &mut bytes)? == 0 {
            self.at_eof = true;
            self.pos = self.line.len();
            return Ok(false);
        }
        if bytes.len() > MAX_LINE_LEN {
            self.line_num += 1;
            self.line = Rc::from(String::from_utf8_lossy(&bytes));
            self.pos = MAX_LINE_LEN;
            let label = self.here(1);
            return Err(self.fail(LexErrorKind::LineTooLong, label, None));
        }
        let mut buf = String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if self.line_num == 0 {
            if let Some(rest) = buf.strip_prefix('\u{feff}') {
                buf = rest.to_string();
            }
        }
        self.line_num += 1;
        self.line = Rc::from(buf);
        self.pos = 0;
        Ok(true)
    }

    fn read_number(&mut self) -> Result<TokenKind, Error> {
        let start = self.pos;
        let mut value: Option<i64> = Some(0);
        while let Some(d @ b'0'..=b'9') = self.peek() {
            value = value
                .and_then(|v| v.checked_mul(10))
                .and_then(|v| v.checked_add(i64::from(d - b'0')));
            self.pos += 1;
        }
        match value {
            Some(n) => Ok(TokenKind::Num(n)),
            None => {
                let label = self.label_from(start);
                Err(self.fail(LexErrorKind::IntegerOverflow, label, None))
            }
        }
    }

    fn read_word(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_') = self.peek() {
            self.pos += 1;
        }
        let lexeme = &self.line[start..self.pos];
        match self.symbols.get(lexeme) {
            Some(Reserved::Func(f)) => TokenKind::Func(f),
            Some(Reserved::Qual(q)) => TokenKind::Qual(q),
            Some(Reserved::Global(g)) => TokenKind::GlobalDef(g),
            None => TokenKind::Ident(lexeme.to_string()),
        }
    }

    /// Scan a double-quoted literal starting at the opening quote.
    ///
    /// `\"` and `\\` are escapes and a backslash before the line break
    /// joins the next physical line onto the literal. Content beyond
    /// [`MAX_LITERAL_LEN`] bytes is dropped with one warning.
    fn read_str(&mut self) -> Result<Token, Error> {
        let start = self.pos;
        let opening = self.here(1);
        let mut value = String::new();
        let mut truncated = false;
        self.pos += 1;

        loop {
            let Some(ch) = self.peek_char() else {
                return Err(self.unterminated(&opening));
            };
            match ch {
                '"' => {
                    self.pos += 1;
                    break;
                }
                '\n' => return Err(self.unterminated(&opening)),
                '\r' if self.peek_at(1) == Some(b'\n') => {
                    return Err(self.unterminated(&opening));
                }
                '\\' => match self.peek_at(1) {
                    Some(b'\n') => {
                        if !self.read_physical_line()? {
                            return Err(self.unterminated(&opening));
                        }
                    }
                    Some(b'\r') if self.peek_at(2) == Some(b'\n') => {
                        if !self.read_physical_line()? {
                            return Err(self.unterminated(&opening));
                        }
                    }
                    Some(escaped @ (b'"' | b'\\')) => {
                        self.push_literal(&mut value, char::from(escaped), &mut truncated);
                        self.pos += 2;
                    }
                    None => return Err(self.unterminated(&opening)),
                    Some(_) => {
                        self.push_literal(&mut value, '\\', &mut truncated);
                        self.pos += 1;
                    }
                },
                c => {
                    self.push_literal(&mut value, c, &mut truncated);
                    self.pos += c.len_utf8();
                }
            }
        }

        let token = if self.line_num == opening.span.line {
            self.token(TokenKind::StrLit(value), start)
        } else {
            let label = opening.through(&self.here(1));
            Token {
                kind: TokenKind::StrLit(value),
                span: label.span,
                source: label.source,
            }
        };
        Ok(token)
    }

    fn push_literal(&mut self, value: &mut String, ch: char, truncated: &mut bool) {
        if value.len() + ch.len_utf8() <= MAX_LITERAL_LEN {
            value.push(ch);
            return;
        }
        if !*truncated {
            *truncated = true;
            tracing::debug!(line = self.line_num, "string literal truncated");
            let label = self.here(1);
            let diagnostic = Diagnostic::warning(
                Rc::clone(&self.path),
                format!("string literal exceeding {MAX_LITERAL_LEN} characters truncated"),
                label,
            );
            self.emit(diagnostic);
        }
    }

    fn unterminated(&mut self, opening: &Label) -> Error {
        let label = self.here(1);
        let note = (opening.span.line != label.span.line).then(|| opening.through(&label));
        self.fail(LexErrorKind::UnterminatedString, label, note)
    }

    /// Report a fatal error to the sink and build the matching [`Error`].
    fn fail(&mut self, kind: LexErrorKind, label: Label, started_here: Option<Label>) -> Error {
        let span = label.span;
        let mut diagnostic = Diagnostic::error(Rc::clone(&self.path), kind.to_string(), label);
        if let Some(note) = started_here {
            diagnostic = diagnostic.with_note("started here", note);
        }
        self.emit(diagnostic);
        Error::Lex(LexError { kind, span })
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: Span::new(self.line_num, start + 1, self.pos - start),
            source: Rc::clone(&self.line),
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    /// Label of `len` bytes at the cursor, clamped to the line text.
    fn here(&self, len: usize) -> Label {
        let text_len = self.line.trim_end_matches(['\n', '\r']).len();
        Label::new(
            Span::new(self.line_num, self.pos.min(text_len) + 1, len),
            Rc::clone(&self.line),
        )
    }

    fn label_from(&self, start: usize) -> Label {
        Label::new(
            Span::new(self.line_num, start + 1, self.pos - start),
            Rc::clone(&self.line),
        )
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c != b'\n' && c.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.line.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.line.as_bytes().get(self.pos + offset).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.line.get(self.pos..).and_then(|rest| rest.chars().next())
    }
}
