//! Reserved words of the configuration language and the parse context
//! that owns them.

use std::collections::HashMap;
use std::fmt;

/// Operation names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Click,
    RClick,
    Jump,
    Key,
    Toggle,
    Quit,
    Exec,
}

/// Per-binding qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// Ignore auto-repeat presses while the key is held.
    NoRepeat,
}

/// Global declaration keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalDef {
    /// Restrict hotkeys to the listed windows.
    ActiveWindow,
}

/// A reserved word and the token role it plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reserved {
    Func(Function),
    Qual(Qualifier),
    Global(GlobalDef),
}

impl Function {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::RClick => "rclick",
            Self::Jump => "jump",
            Self::Key => "key",
            Self::Toggle => "toggle",
            Self::Quit => "quit",
            Self::Exec => "exec",
        }
    }
}

impl Qualifier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoRepeat => "norepeat",
        }
    }
}

impl GlobalDef {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ActiveWindow => "active_window",
        }
    }
}

impl Reserved {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Func(f) => f.as_str(),
            Self::Qual(q) => q.as_str(),
            Self::Global(g) => g.as_str(),
        }
    }
}

impl fmt::Display for Reserved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const RESERVED: [Reserved; 9] = [
    Reserved::Func(Function::Click),
    Reserved::Func(Function::RClick),
    Reserved::Func(Function::Jump),
    Reserved::Func(Function::Key),
    Reserved::Func(Function::Toggle),
    Reserved::Func(Function::Quit),
    Reserved::Func(Function::Exec),
    Reserved::Qual(Qualifier::NoRepeat),
    Reserved::Global(GlobalDef::ActiveWindow),
];

/// Lexeme to reserved-word table.
///
/// Lookups are case-sensitive: `Quit` is a plain identifier.
#[derive(Debug, Clone)]
pub struct Symbols {
    table: HashMap<&'static str, Reserved>,
}

impl Symbols {
    #[must_use]
    pub fn new() -> Self {
        let table = RESERVED.iter().map(|r| (r.as_str(), *r)).collect();
        Self { table }
    }

    #[must_use]
    pub fn get(&self, lexeme: &str) -> Option<Reserved> {
        self.table.get(lexeme).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared by every parse in a process.
///
/// Build one context at startup and pass it by reference to each
/// [`parse_file`](crate::parse_file) call, including reloads. Parsing
/// only reads from it.
#[derive(Debug, Clone, Default)]
pub struct Context {
    symbols: Symbols,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self {
            symbols: Symbols::new(),
        }
    }

    #[must_use]
    pub const fn symbols(&self) -> &Symbols {
        &self.symbols
    }
}
