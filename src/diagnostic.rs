//! Compiler-style diagnostics.
//!
//! Each diagnostic renders as a `path:line:col: severity: message`
//! header, an excerpt of the source line clipped to a fixed width with
//! the offending span highlighted, and a caret underline. Notes attached
//! to a diagnostic render the same way at their own location, which may
//! be an earlier line.

use std::fmt::Write as _;
use std::io;
use std::rc::Rc;

use anstyle::{AnsiColor, Color, Style};

use crate::token::Span;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
        }
    }
}

/// A span together with an owned copy of the line it points into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub span: Span,
    pub source: Rc<str>,
}

impl Label {
    #[must_use]
    pub const fn new(span: Span, source: Rc<str>) -> Self {
        Self { span, source }
    }

    /// Extend this label so it also covers `other`.
    ///
    /// Labels on different lines cannot be joined; the result then runs
    /// to the end of this label's line.
    #[must_use]
    pub fn through(&self, other: &Self) -> Self {
        let end = if other.span.line == self.span.line {
            other.span.end()
        } else {
            self.text().len()
        };
        let len = end.saturating_sub(self.span.offset()).max(self.span.len);
        Self::new(
            Span::new(self.span.line, self.span.column, len),
            Rc::clone(&self.source),
        )
    }

    /// The source line without its line terminator.
    #[must_use]
    pub fn text(&self) -> &str {
        self.source.trim_end_matches(['\n', '\r'])
    }
}

/// Secondary message anchored at its own location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub message: String,
    pub label: Label,
}

/// A message about a location in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub path: Rc<str>,
    pub label: Label,
    pub notes: Vec<Note>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        severity: Severity,
        path: Rc<str>,
        message: impl Into<String>,
        label: Label,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            path,
            label,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn error(path: Rc<str>, message: impl Into<String>, label: Label) -> Self {
        Self::new(Severity::Error, path, message, label)
    }

    #[must_use]
    pub fn warning(path: Rc<str>, message: impl Into<String>, label: Label) -> Self {
        Self::new(Severity::Warning, path, message, label)
    }

    #[must_use]
    pub fn note(path: Rc<str>, message: impl Into<String>, label: Label) -> Self {
        Self::new(Severity::Note, path, message, label)
    }

    /// Attach a note at another location.
    #[must_use]
    pub fn with_note(mut self, message: impl Into<String>, label: Label) -> Self {
        self.notes.push(Note {
            message: message.into(),
            label,
        });
        self
    }
}

/// Receives every diagnostic produced while parsing.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

const fn bold(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color))).bold()
}

const LOCATION: Style = bold(AnsiColor::White);
const ERROR: Style = bold(AnsiColor::Red);
const WARNING: Style = bold(AnsiColor::Magenta);
const NOTE: Style = bold(AnsiColor::Blue);

/// Turns diagnostics into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    color: bool,
    width: usize,
}

impl Renderer {
    /// Default excerpt width in columns.
    pub const DEFAULT_WIDTH: usize = 80;

    /// Renderer that emits no escape sequences.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            color: false,
            width: Self::DEFAULT_WIDTH,
        }
    }

    /// Renderer that highlights with ANSI colors.
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            color: true,
            width: Self::DEFAULT_WIDTH,
        }
    }

    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Set the excerpt width. Zero is treated as one.
    #[must_use]
    pub const fn with_width(mut self, width: usize) -> Self {
        self.width = if width == 0 { 1 } else { width };
        self
    }

    #[must_use]
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.render_site(
            &mut out,
            &diagnostic.path,
            diagnostic.severity,
            &diagnostic.message,
            &diagnostic.label,
        );
        for note in &diagnostic.notes {
            self.render_site(
                &mut out,
                &diagnostic.path,
                Severity::Note,
                &note.message,
                &note.label,
            );
        }
        out
    }

    const fn style(&self, style: Style) -> Style {
        if self.color { style } else { Style::new() }
    }

    fn render_site(
        &self,
        out: &mut String,
        path: &str,
        severity: Severity,
        message: &str,
        label: &Label,
    ) {
        let location = self.style(LOCATION);
        let accent = self.style(match severity {
            Severity::Error => ERROR,
            Severity::Warning => WARNING,
            Severity::Note => NOTE,
        });

        let _ = writeln!(
            out,
            "{location}{path}:{}:{}:{location:#} {accent}{}:{accent:#} {message}",
            label.span.line,
            label.span.column,
            severity.as_str(),
        );

        let excerpt = Excerpt::new(label.text(), label.span, self.width);
        let _ = writeln!(
            out,
            "{}{accent}{}{accent:#}{}",
            excerpt.before, excerpt.highlight, excerpt.after
        );
        let _ = writeln!(
            out,
            "{}{accent}^{}{accent:#}",
            excerpt.padding,
            "~".repeat(excerpt.caret_len - 1)
        );
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::plain()
    }
}

/// A window of one source line around a span.
#[derive(Debug, PartialEq, Eq)]
struct Excerpt<'a> {
    before: &'a str,
    highlight: &'a str,
    after: &'a str,
    padding: String,
    caret_len: usize,
}

impl<'a> Excerpt<'a> {
    /// Center a `width`-byte window on the start of `span`.
    ///
    /// The highlight is clipped to the window; the caret is always at
    /// least one column wide, even for a span past the end of the line.
    fn new(text: &'a str, span: Span, width: usize) -> Self {
        let col = floor_boundary(text, span.offset());
        let start = floor_boundary(text, col.saturating_sub(width / 2));
        let end = floor_boundary(text, start.saturating_add(width)).max(col);
        let hl_end = floor_boundary(text, span.end().min(end)).max(col);

        let highlight = &text[col..hl_end];
        let padding = text[start..col]
            .chars()
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();

        Self {
            before: &text[start..col],
            highlight,
            after: &text[hl_end..end],
            padding,
            caret_len: highlight.chars().count().max(1),
        }
    }
}

fn floor_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Sink that renders diagnostics and writes them out.
#[derive(Debug)]
pub struct Emitter<W> {
    writer: W,
    renderer: Renderer,
}

impl<W: io::Write> Emitter<W> {
    #[must_use]
    pub const fn new(writer: W, renderer: Renderer) -> Self {
        Self { writer, renderer }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl Emitter<io::Stderr> {
    #[must_use]
    pub fn stderr(renderer: Renderer) -> Self {
        Self::new(io::stderr(), renderer)
    }
}

impl<W: io::Write> DiagnosticSink for Emitter<W> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let text = self.renderer.render(&diagnostic);
        // A failing diagnostic stream must not abort the parse.
        let _ = self.writer.write_all(text.as_bytes());
        let _ = self.writer.flush();
    }
}
